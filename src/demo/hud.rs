use crate::framework::{Camera, FrameTime};

use super::controls::DemoControls;

/// Seconds between window title refreshes.
const TITLE_INTERVAL: f32 = 0.5;

/// Debug readout shown in the title bar and, with `egui`, an overlay window.
#[derive(Debug, Default)]
pub struct Hud {
    lines: Vec<String>,
    last_title_update: Option<f32>,
}

impl Hud {
    pub fn refresh(&mut self, camera: &Camera, controls: &DemoControls, time: &FrameTime) {
        let eye = camera.eye;
        let forward = camera.forward();
        self.lines.clear();
        self.lines.push(format!("{:.0} fps", time.fps));
        self.lines.push(format!("Eye: ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z));
        self.lines.push(format!(
            "Look: ({:.2}, {:.2}, {:.2})",
            forward.x, forward.y, forward.z
        ));
        self.lines.push(format!("Plane texture: {}", controls.plane_texture_name()));
        self.lines.push(format!("Sampler: {}", controls.sampler_preset().name()));
        self.lines.push(format!("Shading: {}", controls.shading.name()));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The new window title, at most twice a second.
    pub fn title_update(&mut self, app_name: &str, elapsed: f32) -> Option<String> {
        if let Some(last) = self.last_title_update {
            if elapsed - last < TITLE_INTERVAL {
                return None;
            }
        }
        self.last_title_update = Some(elapsed);
        Some(format!("{} | {}", app_name, self.lines.join(" | ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::controls::ShadingMode;

    #[test]
    fn lines_describe_camera_and_controls() {
        let mut hud = Hud::default();
        let controls = DemoControls {
            plane_texture: 3,
            sampler_state: 0,
            shading: ShadingMode::Textured,
        };
        let time = FrameTime {
            fps: 59.6,
            ..FrameTime::default()
        };
        hud.refresh(&Camera::default(), &controls, &time);

        let lines = hud.lines();
        assert_eq!(lines[0], "60 fps");
        assert_eq!(lines[1], "Eye: (0.00, 0.00, 3.00)");
        assert!(lines.iter().any(|l| l == "Plane texture: Mip levels"));
        assert!(lines.iter().any(|l| l == "Sampler: point"));
        assert!(lines.iter().any(|l| l == "Shading: Textured"));
    }

    #[test]
    fn title_is_throttled() {
        let mut hud = Hud::default();
        hud.refresh(&Camera::default(), &DemoControls::default(), &FrameTime::default());

        assert!(hud.title_update("Demo", 0.0).is_some());
        assert!(hud.title_update("Demo", 0.3).is_none());
        let title = hud.title_update("Demo", 0.6).unwrap();
        assert!(title.starts_with("Demo | "));
    }
}
