fn main() {
    if let Err(err) = skybox_textures::run() {
        eprintln!("Application error: {err}");
        std::process::exit(1);
    }
}
