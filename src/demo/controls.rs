use winit::keyboard::KeyCode;

use crate::framework::InputState;
use crate::renderer::SamplerPreset;
use crate::settings::DemoSettings;

pub const PLANE_TEXTURE_NAMES: [&str; DemoSettings::PLANE_TEXTURE_COUNT] = [
    "Checkerboard",
    "Checkerboard (GPU mips)",
    "Checkerboard (CPU mips)",
    "Mip levels",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    /// Instances mirror the sky cube map.
    #[default]
    Reflective,
    /// Instances use their own diffuse texture.
    Textured,
}

impl ShadingMode {
    pub fn toggled(self) -> Self {
        match self {
            ShadingMode::Reflective => ShadingMode::Textured,
            ShadingMode::Textured => ShadingMode::Reflective,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShadingMode::Reflective => "Reflective",
            ShadingMode::Textured => "Textured",
        }
    }
}

/// The runtime-switchable parts of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DemoControls {
    pub plane_texture: usize,
    pub sampler_state: usize,
    pub shading: ShadingMode,
}

impl DemoControls {
    pub fn from_settings(settings: &DemoSettings) -> Self {
        let mut controls = Self::default();
        controls.set_plane_texture(settings.plane_texture);
        controls.set_sampler_state(settings.sampler_state);
        controls
    }

    pub fn set_plane_texture(&mut self, index: usize) {
        self.plane_texture = index.min(DemoSettings::PLANE_TEXTURE_COUNT - 1);
    }

    pub fn set_sampler_state(&mut self, index: usize) {
        self.sampler_state = index.min(DemoSettings::SAMPLER_STATE_COUNT - 1);
    }

    pub fn cycle_plane_texture(&mut self) {
        self.plane_texture = (self.plane_texture + 1) % DemoSettings::PLANE_TEXTURE_COUNT;
    }

    pub fn cycle_sampler_state(&mut self) {
        self.sampler_state = (self.sampler_state + 1) % DemoSettings::SAMPLER_STATE_COUNT;
    }

    pub fn sampler_preset(&self) -> SamplerPreset {
        SamplerPreset::ALL[self.sampler_state]
    }

    pub fn plane_texture_name(&self) -> &'static str {
        PLANE_TEXTURE_NAMES[self.plane_texture]
    }

    /// Apply T/F/M presses. Returns true if anything changed.
    pub fn apply_input(&mut self, input: &InputState) -> bool {
        let before = *self;
        if input.was_pressed(KeyCode::KeyT) {
            self.cycle_plane_texture();
        }
        if input.was_pressed(KeyCode::KeyF) {
            self.cycle_sampler_state();
        }
        if input.was_pressed(KeyCode::KeyM) {
            self.shading = self.shading.toggled();
        }

        let changed = *self != before;
        if changed {
            log::info!(
                "Plane texture: {}, sampler: {}, shading: {}",
                self.plane_texture_name(),
                self.sampler_preset().name(),
                self.shading.name()
            );
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    fn press(key: KeyCode) -> InputState {
        let mut input = InputState::default();
        input.handle_key(key, ElementState::Pressed, false);
        input
    }

    #[test]
    fn texture_and_sampler_wrap_around() {
        let mut controls = DemoControls::default();
        for _ in 0..DemoSettings::PLANE_TEXTURE_COUNT {
            controls.cycle_plane_texture();
        }
        assert_eq!(controls.plane_texture, 0);

        controls.set_sampler_state(3);
        controls.cycle_sampler_state();
        assert_eq!(controls.sampler_state, 0);
    }

    #[test]
    fn setters_clamp_out_of_range_indices() {
        let mut controls = DemoControls::default();
        controls.set_plane_texture(17);
        controls.set_sampler_state(99);
        assert_eq!(controls.plane_texture, 3);
        assert_eq!(controls.sampler_state, 3);
        assert_eq!(controls.sampler_preset(), SamplerPreset::Anisotropic);
    }

    #[test]
    fn keys_drive_the_controls() {
        let mut controls = DemoControls::default();
        assert!(controls.apply_input(&press(KeyCode::KeyT)));
        assert_eq!(controls.plane_texture, 1);

        assert!(controls.apply_input(&press(KeyCode::KeyF)));
        assert_eq!(controls.sampler_state, 1);

        assert!(controls.apply_input(&press(KeyCode::KeyM)));
        assert_eq!(controls.shading, ShadingMode::Textured);

        assert!(!controls.apply_input(&InputState::default()));
    }

    #[test]
    fn startup_values_come_from_settings() {
        let settings = DemoSettings {
            plane_texture: 2,
            sampler_state: 1,
            ..DemoSettings::default()
        };
        let controls = DemoControls::from_settings(&settings);
        assert_eq!(controls.plane_texture, 2);
        assert_eq!(controls.sampler_preset(), SamplerPreset::Bilinear);
        assert_eq!(controls.shading, ShadingMode::Reflective);
    }
}
