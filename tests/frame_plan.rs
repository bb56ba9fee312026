//! The per-frame draw sequence of the skybox and textures demo.
//!
//! Conventions used in this codebase:
//! - Right-handed world, +Y up, camera looks down its forward vector.
//! - Clip depth range is [0, 1]; the sky is pinned to depth 1.
//! - Matrices are column-major and uploaded without transposing.
//!
use glam::{Mat4, Vec3, Vec4};

use skybox_textures::demo::controls::{DemoControls, ShadingMode};
use skybox_textures::demo::frame_plan::{
    instance_transform, plan_frame, MaterialBinding, MeshSlot, ShaderKind, ViewState,
    GRID_SPACING, GROUND_UV_SCALE, INSTANCES_PER_MODEL, MODEL_TYPES,
};
use skybox_textures::demo::{STARTUP_EYE, STARTUP_TARGET};
use skybox_textures::framework::Camera;

fn startup_view() -> ViewState {
    ViewState::from_camera(&Camera::looking_at(STARTUP_EYE, STARTUP_TARGET))
}

fn approx_eq4(a: Vec4, b: Vec4, eps: f32) -> bool {
    (a - b).abs().max_element() <= eps
}

#[test]
fn frame_issues_instances_then_ground_then_sky() {
    let plan = plan_frame(&startup_view(), &DemoControls::default(), 0.0);
    let instance_count = MODEL_TYPES * INSTANCES_PER_MODEL;

    assert_eq!(plan.draws.len(), instance_count + 2);
    for (i, draw) in plan.draws[..instance_count].iter().enumerate() {
        assert_eq!(draw.mesh, MeshSlot::Model(i / INSTANCES_PER_MODEL));
        assert_eq!(draw.shader, ShaderKind::Reflection);
        assert_eq!(draw.material, MaterialBinding::SkyCube);
    }
    assert_eq!(plan.draws[instance_count].shader, ShaderKind::Uv);
    assert_eq!(plan.draws[instance_count].mesh, MeshSlot::Ground);
    assert_eq!(plan.draws[instance_count + 1].shader, ShaderKind::Skybox);
    assert_eq!(plan.draws[instance_count + 1].mesh, MeshSlot::Model(0));
}

#[test]
fn instances_sit_on_a_grid_above_the_ground() {
    let view = startup_view();
    let plan = plan_frame(&view, &DemoControls::default(), 0.0);

    for model_type in 0..MODEL_TYPES {
        for instance in 0..INSTANCES_PER_MODEL {
            let draw = plan.draws[model_type * INSTANCES_PER_MODEL + instance];
            let expected = Vec3::new(
                instance as f32 * GRID_SPACING,
                model_type as f32 * GRID_SPACING + 1.0,
                0.0,
            );
            assert_eq!(draw.model.w_axis.truncate(), expected);
            assert_eq!(draw.model, instance_transform(model_type, instance));
            assert!(draw.mvp.abs_diff_eq(view.view_proj() * draw.model, 1e-5));
        }
    }
}

#[test]
fn ground_uses_identity_model_and_tiled_uvs() {
    let view = startup_view();
    let plan = plan_frame(&view, &DemoControls::default(), 0.0);
    let ground = plan.draws[MODEL_TYPES * INSTANCES_PER_MODEL];

    assert_eq!(ground.model, Mat4::IDENTITY);
    assert!(ground.mvp.abs_diff_eq(view.view_proj(), 1e-6));
    assert_eq!(plan.extra.uv_scale, GROUND_UV_SCALE);
    assert_eq!(GROUND_UV_SCALE, 200.0);
}

#[test]
fn sky_ignores_camera_translation() {
    let near = startup_view();
    // Same orientation, different position.
    let offset = Vec3::new(500.0, -20.0, 300.0);
    let far_camera = Camera::looking_at(STARTUP_EYE + offset, STARTUP_TARGET + offset);
    let far = ViewState::from_camera(&far_camera);

    let sky_near = plan_frame(&near, &DemoControls::default(), 0.0).draws[11];
    let sky_far = plan_frame(&far, &DemoControls::default(), 0.0).draws[11];
    assert!(sky_near.mvp.abs_diff_eq(sky_far.mvp, 1e-4));
}

#[test]
fn sky_cube_corners_project_to_the_far_plane_after_xyww() {
    let plan = plan_frame(&startup_view(), &DemoControls::default(), 0.0);
    let sky = plan.draws[11];

    // The forward-facing corner of the unit cube around the camera.
    let view = startup_view();
    let forward = view.view.inverse().transform_vector3(-Vec3::Z);
    let corner = (forward.normalize() * 0.5).extend(1.0);
    let clip = sky.mvp * corner;
    let pinned = Vec4::new(clip.x, clip.y, clip.w, clip.w);
    assert!(clip.w > 0.0);
    assert!(approx_eq4(pinned / pinned.w, Vec4::new(0.0, 0.0, 1.0, 1.0), 1e-4));
}

#[test]
fn per_frame_data_carries_camera_and_time() {
    let view = startup_view();
    let plan = plan_frame(&view, &DemoControls::default(), 0.25);

    assert_eq!(plan.per_frame.projection, view.proj.to_cols_array_2d());
    assert_eq!(plan.per_frame.view, view.view.to_cols_array_2d());
    assert_eq!(plan.per_frame.time, 0.25);
    assert_eq!(plan.eye, STARTUP_EYE);
}

#[test]
fn textured_shading_switches_instance_materials_only() {
    let controls = DemoControls {
        shading: ShadingMode::Textured,
        plane_texture: 1,
        sampler_state: 3,
    };
    let plan = plan_frame(&startup_view(), &controls, 0.0);

    assert!(plan.draws[..5]
        .iter()
        .all(|d| d.shader == ShaderKind::Mesh && d.material == MaterialBinding::ModelTexture(0)));
    assert!(plan.draws[5..10]
        .iter()
        .all(|d| d.material == MaterialBinding::ModelTexture(1)));
    assert_eq!(
        plan.draws[10].material,
        MaterialBinding::Ground {
            texture: 1,
            sampler: 3
        }
    );
    assert_eq!(plan.draws[11].material, MaterialBinding::SkyCube);
}
