//! The skybox and textures demo: a sky cube map, a tiled ground plane with
//! switchable textures and samplers, and two rows of instanced meshes.

pub mod assets;
pub mod controls;
pub mod frame_plan;
pub mod hud;
pub mod pipelines;
pub mod uniforms;

use glam::Vec3;
use winit::dpi::PhysicalSize;

use crate::framework::{Frame, FrameworkApp, Systems};
use crate::renderer::{
    create_basic_sampler, ConstantBuffer, DynamicConstantBuffer, Mesh, SamplerPreset,
};
use crate::settings::DemoSettings;

use assets::{SceneMeshes, SceneTextures};
use controls::DemoControls;
use frame_plan::{plan_frame, MaterialBinding, MeshSlot, ViewState, GROUND_UV_SCALE, TIME_STEP};
use hud::Hud;
use pipelines::{material_bind_group, DemoPipelines};
use uniforms::{ExtraData, PerDrawData, PerFrameData};

pub const APP_NAME: &str = "Skybox and Textures";
pub const STARTUP_EYE: Vec3 = Vec3::new(10.0, 5.0, 7.0);
pub const STARTUP_TARGET: Vec3 = Vec3::new(3.0, 0.5, 0.0);

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// Every GPU resource the demo creates in `on_init`.
struct GpuScene {
    pipelines: DemoPipelines,
    per_frame: ConstantBuffer<PerFrameData>,
    extra: ConstantBuffer<ExtraData>,
    per_draw: DynamicConstantBuffer<PerDrawData>,
    frame_group: wgpu::BindGroup,
    meshes: SceneMeshes,
    model_groups: [wgpu::BindGroup; 2],
    sky_group: wgpu::BindGroup,
    /// Indexed by ground texture, then ground sampler.
    ground_groups: Vec<Vec<wgpu::BindGroup>>,
    _textures: SceneTextures,
}

impl GpuScene {
    fn mesh(&self, slot: MeshSlot) -> &Mesh {
        match slot {
            MeshSlot::Model(index) => &self.meshes.models[index],
            MeshSlot::Ground => &self.meshes.ground,
        }
    }

    fn material(&self, binding: MaterialBinding) -> &wgpu::BindGroup {
        match binding {
            MaterialBinding::ModelTexture(index) => &self.model_groups[index],
            MaterialBinding::SkyCube => &self.sky_group,
            MaterialBinding::Ground { texture, sampler } => &self.ground_groups[texture][sampler],
        }
    }
}

pub struct SkyboxAndTexturesApp {
    settings: DemoSettings,
    controls: DemoControls,
    hud: Hud,
    time: f32,
    view: Option<ViewState>,
    scene: Option<GpuScene>,
}

impl SkyboxAndTexturesApp {
    pub fn new(settings: DemoSettings) -> Self {
        let controls = DemoControls::from_settings(&settings);
        Self {
            settings,
            controls,
            hud: Hud::default(),
            time: 0.0,
            view: None,
            scene: None,
        }
    }

    pub fn controls(&self) -> &DemoControls {
        &self.controls
    }

    /// Animation clock, advanced once per update.
    pub fn time(&self) -> f32 {
        self.time
    }

    fn create_scene(&self, systems: &Systems) -> Result<GpuScene, String> {
        let gpu = &systems.gpu;
        let device = &gpu.device;
        let asset_settings = &self.settings.assets;

        let per_draw = DynamicConstantBuffer::new(
            device,
            "PerDraw",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let pipelines = DemoPipelines::new(
            device,
            gpu.color_format(),
            per_draw.bind_layout(),
            asset_settings.shader_dir.as_deref(),
        )?;

        let per_frame = ConstantBuffer::new(device, "PerFrame", &PerFrameData::default());
        let extra = ConstantBuffer::new(device, "Extra", &ExtraData::new(GROUND_UV_SCALE));
        let frame_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BindGroup"),
            layout: &pipelines.frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: per_frame.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: extra.binding(),
                },
            ],
        });

        let meshes = assets::load_meshes(device, asset_settings)?;
        let textures = assets::load_textures(device, &gpu.queue, asset_settings)?;

        let basic_sampler = create_basic_sampler(device, wgpu::AddressMode::Repeat);
        let ground_samplers: Vec<wgpu::Sampler> = SamplerPreset::ALL
            .iter()
            .map(|preset| preset.create(device))
            .collect();

        let model_groups = std::array::from_fn(|index| {
            material_bind_group(
                device,
                &pipelines.texture_layout,
                &textures.models[index].view,
                &basic_sampler,
                &format!("Model {index} Material"),
            )
        });
        let sky_group = material_bind_group(
            device,
            &pipelines.cube_layout,
            &textures.sky.view,
            &basic_sampler,
            "Sky Material",
        );
        let ground_groups = textures
            .ground
            .iter()
            .enumerate()
            .map(|(texture_index, texture)| {
                ground_samplers
                    .iter()
                    .zip(SamplerPreset::ALL)
                    .map(|(sampler, preset)| {
                        material_bind_group(
                            device,
                            &pipelines.texture_layout,
                            &texture.view,
                            sampler,
                            &format!("Ground {texture_index} / {}", preset.name()),
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(GpuScene {
            pipelines,
            per_frame,
            extra,
            per_draw,
            frame_group,
            meshes,
            model_groups,
            sky_group,
            ground_groups,
            _textures: textures,
        })
    }
}

impl FrameworkApp for SkyboxAndTexturesApp {
    fn name(&self) -> &str {
        APP_NAME
    }

    fn on_init(&mut self, systems: &mut Systems) -> Result<(), String> {
        systems.camera.eye = STARTUP_EYE;
        systems.camera.look_at(STARTUP_TARGET);

        self.scene = Some(self.create_scene(systems)?);
        self.time = 0.0;
        self.view = Some(ViewState::from_camera(&systems.camera));

        log::info!(
            "Scene ready: ground texture '{}', sampler '{}'",
            self.controls.plane_texture_name(),
            self.controls.sampler_preset().name()
        );
        Ok(())
    }

    fn on_update(&mut self, systems: &mut Systems) {
        self.controls.apply_input(&systems.input);
        self.time += TIME_STEP;
        self.view = Some(ViewState::from_camera(&systems.camera));

        self.hud.refresh(&systems.camera, &self.controls, &systems.time);
        if let Some(title) = self.hud.title_update(APP_NAME, systems.time.elapsed) {
            systems.window.set_title(&title);
        }
    }

    fn on_render(&mut self, systems: &mut Systems, frame: &mut Frame<'_>) {
        let (Some(scene), Some(view)) = (self.scene.as_mut(), self.view.as_ref()) else {
            return;
        };
        let gpu = &systems.gpu;

        let plan = plan_frame(view, &self.controls, self.time);
        log::trace!("Frame plan: {} draws", plan.draws.len());

        scene.per_frame.push(&gpu.queue, &plan.per_frame);
        scene.extra.push(&gpu.queue, &plan.extra);

        scene.per_draw.begin_frame();
        let offsets: Vec<u32> = plan
            .draws
            .iter()
            .map(|draw| scene.per_draw.push(&draw.constants(plan.eye)))
            .collect();
        scene.per_draw.flush(&gpu.device, &gpu.queue);

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &gpu.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_bind_group(0, &scene.frame_group, &[]);
        for (draw, offset) in plan.draws.iter().zip(offsets) {
            scene.pipelines.get(draw.shader).bind(&mut rpass);
            rpass.set_bind_group(1, scene.per_draw.bind_group(), &[offset]);
            rpass.set_bind_group(2, scene.material(draw.material), &[]);
            let mesh = scene.mesh(draw.mesh);
            mesh.bind(&mut rpass);
            mesh.draw(&mut rpass);
        }
    }

    fn on_resize(&mut self, systems: &mut Systems, size: PhysicalSize<u32>) {
        self.view = Some(ViewState::from_camera(&systems.camera));
        log::debug!("Resized to {}x{}", size.width, size.height);
    }

    #[cfg(feature = "egui")]
    fn ui(&mut self, ctx: &egui::Context) {
        egui::Window::new(APP_NAME)
            .default_pos([10.0, 10.0])
            .show(ctx, |ui| {
                for line in self.hud.lines() {
                    ui.label(line);
                }
                ui.separator();

                let mut plane_texture = self.controls.plane_texture;
                let slider = egui::Slider::new(
                    &mut plane_texture,
                    0..=DemoSettings::PLANE_TEXTURE_COUNT - 1,
                )
                .text("Plane Texture");
                if ui.add(slider).changed() {
                    self.controls.set_plane_texture(plane_texture);
                }

                let mut sampler_state = self.controls.sampler_state;
                let slider = egui::Slider::new(
                    &mut sampler_state,
                    0..=DemoSettings::SAMPLER_STATE_COUNT - 1,
                )
                .text("Sampler State");
                if ui.add(slider).changed() {
                    self.controls.set_sampler_state(sampler_state);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_app_starts_from_settings() {
        let settings = DemoSettings {
            plane_texture: 2,
            sampler_state: 3,
            ..DemoSettings::default()
        };
        let app = SkyboxAndTexturesApp::new(settings);
        assert_eq!(app.controls().plane_texture, 2);
        assert_eq!(app.controls().sampler_preset(), SamplerPreset::Anisotropic);
        assert_eq!(app.time(), 0.0);
        assert_eq!(app.name(), APP_NAME);
    }
}
