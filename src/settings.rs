use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoSettings {
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub present_mode: PresentModeSetting,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub assets: AssetSettings,
    /// Ground texture selected at startup.
    #[serde(default)]
    pub plane_texture: usize,
    /// Ground sampler selected at startup.
    #[serde(default)]
    pub sampler_state: usize,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            present_mode: PresentModeSetting::default(),
            camera: CameraSettings::default(),
            assets: AssetSettings::default(),
            plane_texture: 0,
            sampler_state: 0,
        }
    }
}

impl DemoSettings {
    pub const SETTINGS_FILE: &'static str = "settings.json";
    pub const PLANE_TEXTURE_COUNT: usize = 4;
    pub const SAMPLER_STATE_COUNT: usize = 4;

    pub fn load() -> Self {
        Self::load_from_path(Self::SETTINGS_FILE)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(settings) => {
                    info!("Loaded demo settings from {:?}", path);
                    settings
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default settings.",
                        path, err
                    );
                    DemoSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("Settings file {:?} not found. Using default settings.", path);
                DemoSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default settings.",
                    path, err
                );
                DemoSettings::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<DemoSettings>(contents).map(DemoSettings::validate)
    }

    fn validate(mut self) -> Self {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            warn!("Resolution must be greater than zero. Using default resolution.");
            self.resolution = Resolution::default();
        }

        if !(self.camera.move_speed > 0.0) {
            warn!("Camera move speed must be positive. Using default value.");
            self.camera.move_speed = CameraSettings::default().move_speed;
        }

        if !(self.camera.look_sensitivity > 0.0) {
            warn!("Camera look sensitivity must be positive. Using default value.");
            self.camera.look_sensitivity = CameraSettings::default().look_sensitivity;
        }

        if self.plane_texture >= Self::PLANE_TEXTURE_COUNT {
            warn!(
                "Plane texture {} out of range 0..{}. Using 0.",
                self.plane_texture,
                Self::PLANE_TEXTURE_COUNT
            );
            self.plane_texture = 0;
        }

        if self.sampler_state >= Self::SAMPLER_STATE_COUNT {
            warn!(
                "Sampler state {} out of range 0..{}. Using 0.",
                self.sampler_state,
                Self::SAMPLER_STATE_COUNT
            );
            self.sampler_state = 0;
        }

        self
    }

    pub fn present_mode(&self, available: &[wgpu::PresentMode]) -> wgpu::PresentMode {
        let desired = self.present_mode.to_wgpu();
        if available.contains(&desired) {
            return desired;
        }

        warn!(
            "Requested present mode {:?} is not supported. Falling back to FIFO.",
            desired
        );

        if available.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            available
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// World units per second.
    #[serde(default = "CameraSettings::default_move_speed")]
    pub move_speed: f32,
    /// Radians per pixel of mouse motion.
    #[serde(default = "CameraSettings::default_look_sensitivity")]
    pub look_sensitivity: f32,
}

impl CameraSettings {
    const fn default_move_speed() -> f32 {
        4.0
    }

    const fn default_look_sensitivity() -> f32 {
        0.003
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: Self::default_move_speed(),
            look_sensitivity: Self::default_look_sensitivity(),
        }
    }
}

/// Optional asset files. Anything left unset is generated procedurally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetSettings {
    /// Directory holding `mesh.wgsl`, `uv.wgsl`, `skybox.wgsl` and
    /// `reflection.wgsl`.
    #[serde(default)]
    pub shader_dir: Option<PathBuf>,
    #[serde(default)]
    pub apple_model: Option<PathBuf>,
    #[serde(default)]
    pub plane_model: Option<PathBuf>,
    #[serde(default)]
    pub brick_texture: Option<PathBuf>,
    #[serde(default)]
    pub apple_texture: Option<PathBuf>,
    /// Cube faces ordered +X, -X, +Y, -Y, +Z, -Z.
    #[serde(default)]
    pub skybox_faces: Option<[PathBuf; 6]>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeSetting {
    #[default]
    Fifo,
    FifoRelaxed,
    Immediate,
    Mailbox,
    AutoVsync,
    AutoNoVsync,
}

impl PresentModeSetting {
    fn to_wgpu(&self) -> wgpu::PresentMode {
        match self {
            PresentModeSetting::Fifo => wgpu::PresentMode::Fifo,
            PresentModeSetting::FifoRelaxed => wgpu::PresentMode::FifoRelaxed,
            PresentModeSetting::Immediate => wgpu::PresentMode::Immediate,
            PresentModeSetting::Mailbox => wgpu::PresentMode::Mailbox,
            PresentModeSetting::AutoVsync => wgpu::PresentMode::AutoVsync,
            PresentModeSetting::AutoNoVsync => wgpu::PresentMode::AutoNoVsync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_replaces_invalid_values_with_defaults() {
        let invalid = DemoSettings {
            resolution: Resolution {
                width: 0,
                height: 720,
            },
            camera: CameraSettings {
                move_speed: -1.0,
                look_sensitivity: f32::NAN,
            },
            plane_texture: 9,
            sampler_state: 4,
            ..DemoSettings::default()
        };

        let validated = invalid.validate();

        assert_eq!(validated.resolution.width, Resolution::default().width);
        assert_eq!(validated.camera.move_speed, 4.0);
        assert_eq!(validated.camera.look_sensitivity, 0.003);
        assert_eq!(validated.plane_texture, 0);
        assert_eq!(validated.sampler_state, 0);
    }

    #[test]
    fn validate_preserves_valid_values() {
        let valid = DemoSettings {
            resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            plane_texture: 3,
            sampler_state: 2,
            ..DemoSettings::default()
        };

        let validated = valid.clone().validate();

        assert_eq!(validated.resolution.width, 1920);
        assert_eq!(validated.resolution.height, 1080);
        assert_eq!(validated.plane_texture, 3);
        assert_eq!(validated.sampler_state, 2);
    }

    #[test]
    fn empty_json_gives_defaults() {
        let settings = DemoSettings::from_json("{}").unwrap();
        assert_eq!(settings.resolution.width, 1280);
        assert!(settings.assets.apple_model.is_none());
        assert!(settings.assets.skybox_faces.is_none());
        assert!(matches!(settings.present_mode, PresentModeSetting::Fifo));
    }

    #[test]
    fn json_asset_paths_are_read() {
        let json = r#"{
            "present_mode": "mailbox",
            "camera": { "move_speed": 10.0 },
            "assets": {
                "apple_model": "Assets/Models/apple.obj",
                "skybox_faces": ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"]
            }
        }"#;
        let settings = DemoSettings::from_json(json).unwrap();
        assert!(matches!(settings.present_mode, PresentModeSetting::Mailbox));
        assert_eq!(settings.camera.move_speed, 10.0);
        assert_eq!(settings.camera.look_sensitivity, 0.003);
        assert_eq!(
            settings.assets.apple_model,
            Some(PathBuf::from("Assets/Models/apple.obj"))
        );
        let faces = settings.assets.skybox_faces.unwrap();
        assert_eq!(faces[5], PathBuf::from("nz.png"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DemoSettings::from_json("{ \"resolution\": 3 }").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = DemoSettings::load_from_path("no/such/settings.json");
        assert_eq!(settings.plane_texture, 0);
        assert_eq!(settings.resolution.height, 720);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ \"resolution\": { \"width\": ").unwrap();

        let settings = DemoSettings::load_from_path(&path);
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            serde_json::to_value(DemoSettings::default()).unwrap()
        );
    }

    #[test]
    fn present_mode_returns_desired_when_available() {
        let settings = DemoSettings {
            present_mode: PresentModeSetting::Mailbox,
            ..DemoSettings::default()
        };
        let available = [wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox];
        assert_eq!(settings.present_mode(&available), wgpu::PresentMode::Mailbox);
    }

    #[test]
    fn present_mode_falls_back_to_fifo_when_desired_missing() {
        let settings = DemoSettings {
            present_mode: PresentModeSetting::Immediate,
            ..DemoSettings::default()
        };
        let available = [wgpu::PresentMode::Fifo];
        assert_eq!(settings.present_mode(&available), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn present_mode_uses_first_available_when_fifo_missing() {
        let settings = DemoSettings {
            present_mode: PresentModeSetting::Mailbox,
            ..DemoSettings::default()
        };
        let available = [wgpu::PresentMode::Immediate];
        assert_eq!(
            settings.present_mode(&available),
            wgpu::PresentMode::Immediate
        );
    }
}
