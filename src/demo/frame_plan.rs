//! The fixed draw sequence of one frame, computed without touching the GPU.

use glam::{Mat4, Vec3, Vec4};

use super::controls::{DemoControls, ShadingMode};
use super::uniforms::{ExtraData, PerDrawData, PerFrameData};
use crate::framework::Camera;

pub const MODEL_TYPES: usize = 2;
pub const INSTANCES_PER_MODEL: usize = 5;
pub const GRID_SPACING: f32 = 1.5;
pub const INSTANCE_BASE_HEIGHT: f32 = 1.0;
pub const GROUND_UV_SCALE: f32 = 200.0;
/// Animation clock advance per update.
pub const TIME_STEP: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Mesh,
    Uv,
    Skybox,
    Reflection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshSlot {
    Model(usize),
    Ground,
}

/// Texture and sampler bound at group 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialBinding {
    /// A model's diffuse texture with the basic sampler.
    ModelTexture(usize),
    /// The sky cube map with the basic sampler.
    SkyCube,
    /// One of the ground textures with one of the ground samplers.
    Ground { texture: usize, sampler: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub shader: ShaderKind,
    pub mesh: MeshSlot,
    pub material: MaterialBinding,
    pub model: Mat4,
    pub mvp: Mat4,
}

impl DrawCall {
    pub fn constants(&self, eye: Vec3) -> PerDrawData {
        PerDrawData::new(self.mvp, self.model, eye)
    }
}

/// Camera state the plan is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub view: Mat4,
    pub proj: Mat4,
    pub eye: Vec3,
}

impl ViewState {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix(),
            proj: camera.proj_matrix(),
            eye: camera.eye,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view
    }

    /// The view matrix with its translation column reset, so the sky stays
    /// centred on the camera.
    pub fn view_without_translation(&self) -> Mat4 {
        let mut view = self.view;
        view.w_axis = Vec4::W;
        view
    }
}

#[derive(Debug, Clone)]
pub struct FramePlan {
    pub per_frame: PerFrameData,
    pub extra: ExtraData,
    pub eye: Vec3,
    pub draws: Vec<DrawCall>,
}

pub fn instance_transform(model_type: usize, instance: usize) -> Mat4 {
    Mat4::from_translation(Vec3::new(
        instance as f32 * GRID_SPACING,
        model_type as f32 * GRID_SPACING + INSTANCE_BASE_HEIGHT,
        0.0,
    ))
}

/// Instances first (model 0 then model 1), then the ground, then the sky.
pub fn plan_frame(view: &ViewState, controls: &DemoControls, time: f32) -> FramePlan {
    let view_proj = view.view_proj();
    let mut draws = Vec::with_capacity(MODEL_TYPES * INSTANCES_PER_MODEL + 2);

    for model_type in 0..MODEL_TYPES {
        let (shader, material) = match controls.shading {
            ShadingMode::Reflective => (ShaderKind::Reflection, MaterialBinding::SkyCube),
            ShadingMode::Textured => (ShaderKind::Mesh, MaterialBinding::ModelTexture(model_type)),
        };
        for instance in 0..INSTANCES_PER_MODEL {
            let model = instance_transform(model_type, instance);
            draws.push(DrawCall {
                shader,
                mesh: MeshSlot::Model(model_type),
                material,
                model,
                mvp: view_proj * model,
            });
        }
    }

    draws.push(DrawCall {
        shader: ShaderKind::Uv,
        mesh: MeshSlot::Ground,
        material: MaterialBinding::Ground {
            texture: controls.plane_texture,
            sampler: controls.sampler_state,
        },
        model: Mat4::IDENTITY,
        mvp: view_proj,
    });

    draws.push(DrawCall {
        shader: ShaderKind::Skybox,
        mesh: MeshSlot::Model(0),
        material: MaterialBinding::SkyCube,
        model: Mat4::IDENTITY,
        mvp: view.proj * view.view_without_translation(),
    });

    FramePlan {
        per_frame: PerFrameData::new(view.proj, view.view, time),
        extra: ExtraData::new(GROUND_UV_SCALE),
        eye: view.eye,
        draws,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_at(eye: Vec3) -> ViewState {
        ViewState::from_camera(&Camera::looking_at(eye, Vec3::new(3.0, 0.5, 0.0)))
    }

    #[test]
    fn view_without_translation_keeps_rotation() {
        let view = view_at(Vec3::new(10.0, 5.0, 7.0));
        let stripped = view.view_without_translation();
        assert_eq!(stripped.x_axis, view.view.x_axis);
        assert_eq!(stripped.z_axis, view.view.z_axis);
        assert_eq!(stripped.w_axis, Vec4::W);
    }

    #[test]
    fn textured_mode_binds_each_models_texture() {
        let controls = DemoControls {
            shading: ShadingMode::Textured,
            ..DemoControls::default()
        };
        let plan = plan_frame(&view_at(Vec3::new(10.0, 5.0, 7.0)), &controls, 0.0);
        assert_eq!(plan.draws[0].shader, ShaderKind::Mesh);
        assert_eq!(plan.draws[0].material, MaterialBinding::ModelTexture(0));
        assert_eq!(plan.draws[5].material, MaterialBinding::ModelTexture(1));
    }

    #[test]
    fn ground_binding_follows_controls() {
        let controls = DemoControls {
            plane_texture: 3,
            sampler_state: 2,
            ..DemoControls::default()
        };
        let plan = plan_frame(&view_at(Vec3::ONE), &controls, 0.0);
        let ground = plan.draws[MODEL_TYPES * INSTANCES_PER_MODEL];
        assert_eq!(
            ground.material,
            MaterialBinding::Ground {
                texture: 3,
                sampler: 2
            }
        );
    }

    #[test]
    fn per_draw_constants_carry_the_eye() {
        let eye = Vec3::new(10.0, 5.0, 7.0);
        let plan = plan_frame(&view_at(eye), &DemoControls::default(), 0.0);
        let constants = plan.draws[0].constants(plan.eye);
        assert_eq!(constants.eye_position, eye.to_array());
    }
}
