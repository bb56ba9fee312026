//! Scene meshes and textures. Every asset can come from a file named in the
//! settings; anything unset is generated here instead.

use glam::Vec3;

use crate::renderer::primitives::{plane_mesh, sphere_mesh};
use crate::renderer::texture::{
    box_filtered_chain, calculate_mip_levels, checkerboard, cube_face_direction, mip_extent,
};
use crate::renderer::{
    create_mesh_cube, create_mesh_from_obj, Mesh, MeshData, MipGeneration, MipLevel, Texture,
};
use crate::settings::{AssetSettings, DemoSettings};

pub const CUBE_HALF_EXTENT: f32 = 0.5;
pub const APPLE_OBJ_SCALE: f32 = 0.01;
pub const APPLE_FALLBACK_RADIUS: f32 = 0.5;
pub const PLANE_SCALE: f32 = 8.0;
pub const PLANE_HALF_EXTENT: f32 = 5.0;

const MODEL_TEXTURE_SIZE: u32 = 256;
const GROUND_TEXTURE_SIZE: u32 = 512;
const GROUND_CHECKER_SIZE: u32 = 32;
const SKY_FACE_SIZE: u32 = 256;

/// One colour per mip level, enough for textures up to 2048 texels.
const MIP_PALETTE: [[u8; 4]; 12] = [
    [255, 0, 0, 255],
    [255, 160, 0, 255],
    [255, 255, 0, 255],
    [0, 255, 0, 255],
    [0, 255, 255, 255],
    [0, 0, 255, 255],
    [255, 0, 255, 255],
    [255, 255, 255, 255],
    [128, 64, 0, 255],
    [0, 128, 128, 255],
    [128, 0, 128, 255],
    [64, 64, 64, 255],
];

pub struct SceneMeshes {
    /// Model 0 is the cube, which the sky also draws; model 1 is the apple.
    pub models: [Mesh; 2],
    pub ground: Mesh,
}

pub struct SceneTextures {
    pub models: [Texture; 2],
    pub ground: Vec<Texture>,
    pub sky: Texture,
}

pub fn load_meshes(device: &wgpu::Device, assets: &AssetSettings) -> Result<SceneMeshes, String> {
    let cube = create_mesh_cube(device, CUBE_HALF_EXTENT);

    let apple = match &assets.apple_model {
        Some(path) => create_mesh_from_obj(device, path, APPLE_OBJ_SCALE)?,
        None => {
            log::info!("No apple model configured, using a sphere");
            let (vertices, indices) = sphere_mesh(APPLE_FALLBACK_RADIUS, 32, 16);
            Mesh::from_data(device, &MeshData::new(vertices, indices), "Apple")
        }
    };

    let ground = match &assets.plane_model {
        Some(path) => create_mesh_from_obj(device, path, PLANE_SCALE)?,
        None => {
            log::info!("No plane model configured, using a built-in quad");
            let (vertices, indices) = plane_mesh(PLANE_HALF_EXTENT * PLANE_SCALE, 4);
            Mesh::from_data(device, &MeshData::new(vertices, indices), "Plane")
        }
    };

    Ok(SceneMeshes {
        models: [cube, apple],
        ground,
    })
}

pub fn load_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    assets: &AssetSettings,
) -> Result<SceneTextures, String> {
    let brick = match &assets.brick_texture {
        Some(path) => Texture::from_path(device, queue, path, true)?,
        None => {
            log::info!("No brick texture configured, generating a brick pattern");
            Texture::from_rgba8(
                device,
                queue,
                &brick_pattern(MODEL_TEXTURE_SIZE),
                true,
                MipGeneration::Gpu,
                Some("Brick"),
            )?
        }
    };

    let apple = match &assets.apple_texture {
        Some(path) => Texture::from_path(device, queue, path, true)?,
        None => {
            log::info!("No apple texture configured, generating an apple skin");
            Texture::from_rgba8(
                device,
                queue,
                &apple_skin(MODEL_TEXTURE_SIZE),
                true,
                MipGeneration::Gpu,
                Some("Apple"),
            )?
        }
    };

    log::info!(
        "Generating {} ground textures ({}x{})",
        DemoSettings::PLANE_TEXTURE_COUNT,
        GROUND_TEXTURE_SIZE,
        GROUND_TEXTURE_SIZE
    );
    let checker = ground_checker(GROUND_TEXTURE_SIZE);
    let ground = vec![
        Texture::from_rgba8(
            device,
            queue,
            &checker,
            true,
            MipGeneration::None,
            Some("Checker (no mips)"),
        )?,
        Texture::from_rgba8(
            device,
            queue,
            &checker,
            true,
            MipGeneration::Gpu,
            Some("Checker (GPU mips)"),
        )?,
        Texture::from_mip_chain(
            device,
            queue,
            &box_filtered_chain(checker.clone()),
            true,
            Some("Checker (CPU mips)"),
        )?,
        Texture::from_mip_chain(
            device,
            queue,
            &mip_level_colors(GROUND_TEXTURE_SIZE),
            true,
            Some("Mip levels"),
        )?,
    ];
    debug_assert_eq!(ground.len(), DemoSettings::PLANE_TEXTURE_COUNT);

    let sky = match &assets.skybox_faces {
        Some(paths) => Texture::cube_from_paths(device, queue, paths)?,
        None => {
            log::info!("No skybox faces configured, generating a desert sky");
            Texture::cube_from_faces(
                device,
                queue,
                &desert_sky_faces(SKY_FACE_SIZE),
                Some("Desert Sky"),
            )?
        }
    };

    Ok(SceneTextures {
        models: [brick, apple],
        ground,
        sky,
    })
}

/// Small integer hash for repeatable per-texel noise.
fn hash2(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x8da6_b343) ^ y.wrapping_mul(0xd816_3841);
    h ^= h >> 13;
    h = h.wrapping_mul(0xcb1a_b31f);
    h ^ (h >> 16)
}

fn shade(color: [u8; 3], factor: f32) -> [u8; 4] {
    let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
    [scale(color[0]), scale(color[1]), scale(color[2]), 255]
}

fn to_rgba(color: Vec3) -> [u8; 4] {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

pub fn ground_checker(size: u32) -> MipLevel {
    checkerboard(
        size,
        GROUND_CHECKER_SIZE,
        [230, 230, 230, 255],
        [40, 40, 40, 255],
    )
}

/// Running-bond brick wall: bricks are a quarter of the texture wide and an
/// eighth tall, every other row shifted by half a brick.
pub fn brick_pattern(size: u32) -> MipLevel {
    const MORTAR: [u8; 3] = [205, 198, 186];
    const BRICK: [u8; 3] = [156, 64, 42];

    let brick_w = (size / 4).max(2);
    let brick_h = (size / 8).max(2);
    let mortar = (size / 64).max(1);
    let mut data = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        let row = y / brick_h;
        let offset = if row % 2 == 1 { brick_w / 2 } else { 0 };
        for x in 0..size {
            let bx = (x + offset) % size;
            let column = bx / brick_w;
            let in_mortar = y % brick_h < mortar || bx % brick_w < mortar;
            let texel = if in_mortar {
                shade(MORTAR, 0.95 + (hash2(x, y) % 10) as f32 / 100.0)
            } else {
                let per_brick = 0.8 + (hash2(column, row) % 40) as f32 / 100.0;
                let grain = 0.95 + (hash2(x, y) % 10) as f32 / 100.0;
                shade(BRICK, per_brick * grain)
            };
            data.extend_from_slice(&texel);
        }
    }

    MipLevel::new(size, size, data)
}

/// Red skin with coarse mottling and a green patch around the stem (top rows).
pub fn apple_skin(size: u32) -> MipLevel {
    let red = Vec3::new(0.72, 0.08, 0.09);
    let dark = Vec3::new(0.45, 0.03, 0.05);
    let green = Vec3::new(0.55, 0.65, 0.18);
    let cell = (size / 16).max(1);
    let mut data = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        let v = y as f32 / size as f32;
        for x in 0..size {
            let mottle = (hash2(x / cell, y / cell) % 100) as f32 / 100.0;
            let speck = (hash2(x, y) % 100) as f32 / 400.0;
            let mut color = red.lerp(dark, mottle * 0.6) + Vec3::splat(speck * 0.2);
            let stem = (1.0 - v / 0.15).clamp(0.0, 1.0);
            color = color.lerp(green, stem);
            data.extend_from_slice(&to_rgba(color));
        }
    }

    MipLevel::new(size, size, data)
}

/// A full mip chain where every level is one flat colour, so the selected
/// level is visible on screen.
pub fn mip_level_colors(size: u32) -> Vec<MipLevel> {
    (0..calculate_mip_levels(size, size))
        .map(|level| {
            let extent = mip_extent(size, level);
            MipLevel::solid(extent, extent, MIP_PALETTE[level as usize % MIP_PALETTE.len()])
        })
        .collect()
}

/// Sand below the horizon, a hazy band just above it, deepening blue toward
/// the zenith.
pub fn desert_sky_color(direction: Vec3) -> [u8; 4] {
    let sand_light = Vec3::new(0.84, 0.72, 0.52);
    let sand_dark = Vec3::new(0.62, 0.48, 0.32);
    let haze = Vec3::new(0.93, 0.89, 0.80);
    let horizon_blue = Vec3::new(0.62, 0.76, 0.90);
    let zenith = Vec3::new(0.16, 0.36, 0.70);

    let y = direction.normalize_or_zero().y;
    let color = if y < 0.0 {
        sand_light.lerp(sand_dark, (-y * 3.0).min(1.0))
    } else if y < 0.08 {
        haze.lerp(horizon_blue, y / 0.08)
    } else {
        horizon_blue.lerp(zenith, ((y - 0.08) / 0.92).sqrt())
    };
    to_rgba(color)
}

pub fn desert_sky_faces(size: u32) -> [MipLevel; 6] {
    std::array::from_fn(|face| {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            let v = (y as f32 + 0.5) / size as f32 * 2.0 - 1.0;
            for x in 0..size {
                let u = (x as f32 + 0.5) / size as f32 * 2.0 - 1.0;
                data.extend_from_slice(&desert_sky_color(cube_face_direction(face, u, v)));
            }
        }
        MipLevel::new(size, size, data)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brick_has_mortar_lines_and_brick_faces() {
        let brick = brick_pattern(64);
        let mortar = brick.pixel(0, 0);
        let face = brick.pixel(8, 4);
        assert!(mortar[0] > 180 && mortar[2] > 160);
        assert!(face[0] > face[2] * 2, "brick face {:?} should be red", face);
    }

    #[test]
    fn brick_rows_are_staggered() {
        let size = 64;
        let brick = brick_pattern(size);
        // Vertical joint at x=0 in even rows, shifted half a brick in odd rows.
        let even_row = (size / 8) / 2;
        let odd_row = even_row + size / 8;
        assert!(brick.pixel(0, even_row)[2] > 150);
        assert!(brick.pixel(0, odd_row)[2] < 100);
    }

    #[test]
    fn apple_is_red_below_the_stem() {
        let apple = apple_skin(64);
        let body = apple.pixel(10, 40);
        assert!(body[0] > body[1] && body[0] > body[2]);
        let stem = apple.pixel(10, 0);
        assert!(stem[1] > stem[0] / 2);
    }

    #[test]
    fn mip_colors_cover_the_whole_chain() {
        let chain = mip_level_colors(512);
        assert_eq!(chain.len(), 10);
        assert_eq!(chain[0].width, 512);
        assert_eq!(chain[9].width, 1);
        assert!(chain
            .iter()
            .all(|level| level.data.len() == (level.width * level.height * 4) as usize));
    }

    #[test]
    fn every_mip_level_has_its_own_colour() {
        for size in [GROUND_TEXTURE_SIZE, 2048] {
            let chain = mip_level_colors(size);
            for (a, level_a) in chain.iter().enumerate() {
                for (b, level_b) in chain.iter().enumerate().skip(a + 1) {
                    assert_ne!(
                        level_a.pixel(0, 0),
                        level_b.pixel(0, 0),
                        "mip {a} and mip {b} share a colour at size {size}"
                    );
                }
            }
        }
    }

    #[test]
    fn desert_sky_is_sand_below_and_blue_above() {
        let ground = desert_sky_color(-Vec3::Y);
        let zenith = desert_sky_color(Vec3::Y);
        assert!(ground[0] > ground[2]);
        assert!(zenith[2] > zenith[0]);
    }

    #[test]
    fn top_face_is_sky_and_bottom_face_is_sand() {
        let faces = desert_sky_faces(8);
        assert!(faces.iter().all(|f| f.width == 8 && f.height == 8));
        let top = faces[2].pixel(4, 4);
        let bottom = faces[3].pixel(4, 4);
        assert!(top[2] > top[0]);
        assert!(bottom[0] > bottom[2]);
    }

    #[test]
    fn checker_alternates_by_cell() {
        let checker = ground_checker(128);
        assert_ne!(checker.pixel(0, 0), checker.pixel(GROUND_CHECKER_SIZE, 0));
        assert_eq!(
            checker.pixel(0, 0),
            checker.pixel(GROUND_CHECKER_SIZE, GROUND_CHECKER_SIZE)
        );
    }
}
