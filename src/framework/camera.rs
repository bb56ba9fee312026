use glam::{Mat4, Vec3};

use super::input::InputState;
use crate::settings::CameraSettings;
use winit::keyboard::KeyCode;

/// Keeps pitch away from the poles where `look_to` degenerates.
const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// First-person camera described by an eye position and yaw/pitch angles.
///
/// Right-handed, +Y up, clip depth 0..1. Yaw 0 looks down +X and grows
/// toward +Z.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    yaw: f32,
    pitch: f32,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

impl Camera {
    /// A default-lens camera at `eye` looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            eye,
            ..Self::default()
        };
        camera.look_at(target);
        camera
    }

    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.eye).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH);
        self.yaw = dir.z.atan2(dir.x);
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn forward(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, self.forward(), Vec3::Y)
    }

    pub fn proj_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, self.aspect, self.near, self.far)
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        self.proj_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            fov_y_radians: 60f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

/// WASD + Q/E fly movement, right-mouse drag to look, Shift to go faster.
#[derive(Clone, Copy, Debug)]
pub struct FlyCameraController {
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub boost: f32,
}

impl FlyCameraController {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            move_speed: settings.move_speed,
            look_sensitivity: settings.look_sensitivity,
            boost: 4.0,
        }
    }

    pub fn update(&self, camera: &mut Camera, input: &InputState, dt: f32) {
        if input.look_held() {
            let delta = input.mouse_delta();
            camera.rotate(
                delta.x * self.look_sensitivity,
                -delta.y * self.look_sensitivity,
            );
        }

        let forward = camera.forward();
        let right = camera.right();
        let mut motion = Vec3::ZERO;
        let bindings = [
            (KeyCode::KeyW, forward),
            (KeyCode::KeyS, -forward),
            (KeyCode::KeyD, right),
            (KeyCode::KeyA, -right),
            (KeyCode::KeyE, Vec3::Y),
            (KeyCode::KeyQ, -Vec3::Y),
        ];
        for (key, direction) in bindings {
            if input.is_held(key) {
                motion += direction;
            }
        }

        if motion == Vec3::ZERO {
            return;
        }

        let mut speed = self.move_speed;
        if input.is_held(KeyCode::ShiftLeft) || input.is_held(KeyCode::ShiftRight) {
            speed *= self.boost;
        }
        camera.eye += motion.normalize() * speed * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    #[test]
    fn view_proj_is_invertible() {
        let mut cam = Camera::default();
        cam.set_aspect(16.0 / 9.0);
        let vp = cam.view_proj_matrix();
        let id = vp * vp.inverse();
        assert!(id.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut cam = Camera {
            eye: Vec3::new(10.0, 5.0, 7.0),
            ..Camera::default()
        };
        let target = Vec3::new(3.0, 0.5, 0.0);
        cam.look_at(target);
        let expected = (target - cam.eye).normalize();
        assert!(cam.forward().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let mut cam = Camera {
            eye: Vec3::new(10.0, 5.0, 7.0),
            ..Camera::default()
        };
        cam.look_at(Vec3::new(3.0, 0.5, 0.0));
        let clip = cam.view_proj_matrix() * Vec3::new(3.0, 0.5, 0.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let mut cam = Camera::default();
        cam.rotate(0.0, 10.0);
        assert!(cam.pitch() <= MAX_PITCH);
        assert!(cam.forward().y < 1.0);
        cam.rotate(0.0, -20.0);
        assert!(cam.pitch() >= -MAX_PITCH);
    }

    #[test]
    fn straight_down_look_at_stays_finite() {
        let mut cam = Camera::default();
        cam.look_at(cam.eye - Vec3::Y);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn controller_moves_along_forward() {
        let mut cam = Camera::default();
        let start = cam.eye;
        let mut input = InputState::default();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed, false);

        let controller = FlyCameraController::new(&CameraSettings::default());
        controller.update(&mut cam, &input, 0.5);

        let moved = cam.eye - start;
        assert!((moved.length() - 2.0).abs() < 1e-5);
        assert!(moved.normalize().abs_diff_eq(cam.forward(), 1e-5));
    }

    #[test]
    fn controller_ignores_mouse_without_look_button() {
        let mut cam = Camera::default();
        let yaw = cam.yaw();
        let mut input = InputState::default();
        input.handle_mouse_motion(100.0, 0.0);

        FlyCameraController::new(&CameraSettings::default()).update(&mut cam, &input, 0.016);
        assert_eq!(cam.yaw(), yaw);
    }
}
