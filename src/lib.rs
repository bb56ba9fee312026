pub mod demo;
pub mod framework;
pub mod renderer;
pub mod settings;
pub mod ui;

use demo::SkyboxAndTexturesApp;

pub use framework::RunError;
pub use settings::DemoSettings;

pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

/// Load `settings.json` and run the demo until its window closes.
pub fn run() -> Result<(), RunError> {
    init_logging();
    run_with_settings(DemoSettings::load())
}

pub fn run_with_settings(settings: DemoSettings) -> Result<(), RunError> {
    log::info!("Starting {}", demo::APP_NAME);

    let app = SkyboxAndTexturesApp::new(settings.clone());
    let result = framework::run_app(app, settings);

    if let Err(ref err) = result {
        log::error!("Application error: {}", err);
    }
    log::info!("Application shutdown complete");

    result
}
