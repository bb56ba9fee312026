//! Bind group layouts and the four shader sets the demo draws with.
//!
//! Group 0 holds the per-frame and extra constants, group 1 the per-draw
//! slot (dynamic offset), group 2 one texture and its sampler.

use std::path::Path;

use super::frame_plan::ShaderKind;
use super::uniforms::{ExtraData, PerFrameData};
use crate::renderer::depth::DEPTH_FORMAT;
use crate::renderer::{
    ConstantBuffer, DepthMode, RasterState, ShaderSet, ShaderSetDesc, ShaderSource,
};

const MESH_WGSL: &str = include_str!("../shader/mesh.wgsl");
const UV_WGSL: &str = include_str!("../shader/uv.wgsl");
const SKYBOX_WGSL: &str = include_str!("../shader/skybox.wgsl");
const REFLECTION_WGSL: &str = include_str!("../shader/reflection.wgsl");

impl ShaderKind {
    pub const ALL: [ShaderKind; 4] = [
        ShaderKind::Mesh,
        ShaderKind::Uv,
        ShaderKind::Skybox,
        ShaderKind::Reflection,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ShaderKind::Mesh => "mesh.wgsl",
            ShaderKind::Uv => "uv.wgsl",
            ShaderKind::Skybox => "skybox.wgsl",
            ShaderKind::Reflection => "reflection.wgsl",
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            ShaderKind::Mesh => MESH_WGSL,
            ShaderKind::Uv => UV_WGSL,
            ShaderKind::Skybox => SKYBOX_WGSL,
            ShaderKind::Reflection => REFLECTION_WGSL,
        }
    }

    /// Samples a cube map rather than a 2D texture.
    pub fn uses_cube_map(self) -> bool {
        matches!(self, ShaderKind::Skybox | ShaderKind::Reflection)
    }

    pub fn desc(self, shader_dir: Option<&Path>) -> ShaderSetDesc {
        let source = match shader_dir {
            Some(dir) => ShaderSource::File(dir.join(self.file_name())),
            None => ShaderSource::Embedded {
                name: self.file_name(),
                code: self.embedded(),
            },
        };
        match self {
            ShaderKind::Mesh => ShaderSetDesc::vs_ps("Mesh", source, "vs_mesh", "fs_mesh"),
            ShaderKind::Uv => ShaderSetDesc::vs_ps("Uv", source, "vs_uv", "fs_uv"),
            ShaderKind::Skybox => ShaderSetDesc::vs_ps("Skybox", source, "vs_skybox", "fs_skybox"),
            ShaderKind::Reflection => {
                ShaderSetDesc::vs_ps("Reflection", source, "vs_reflection", "fs_reflection")
            }
        }
    }

    /// The sky is seen from inside the cube and sits on the far plane.
    pub fn raster_state(self, color_format: wgpu::TextureFormat) -> RasterState {
        let (depth, cull_mode) = match self {
            ShaderKind::Skybox => (DepthMode::ReadOnlyFar, None),
            _ => (DepthMode::ReadWrite, Some(wgpu::Face::Back)),
        };
        RasterState {
            color_format,
            depth_format: DEPTH_FORMAT,
            depth,
            cull_mode,
        }
    }
}

pub fn frame_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let visibility = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Frame BindLayout"),
        entries: &[
            ConstantBuffer::<PerFrameData>::layout_entry(0, visibility),
            ConstantBuffer::<ExtraData>::layout_entry(1, visibility),
        ],
    })
}

pub fn material_layout(
    device: &wgpu::Device,
    view_dimension: wgpu::TextureViewDimension,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(match view_dimension {
            wgpu::TextureViewDimension::Cube => "Cube Material BindLayout",
            _ => "Material BindLayout",
        }),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

pub fn material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

pub struct DemoPipelines {
    pub frame_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pub cube_layout: wgpu::BindGroupLayout,
    sets: Vec<ShaderSet>,
}

impl DemoPipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        draw_layout: &wgpu::BindGroupLayout,
        shader_dir: Option<&Path>,
    ) -> Result<Self, String> {
        let frame_layout = frame_layout(device);
        let texture_layout = material_layout(device, wgpu::TextureViewDimension::D2);
        let cube_layout = material_layout(device, wgpu::TextureViewDimension::Cube);

        let texture_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Textured PipelineLayout"),
                bind_group_layouts: &[&frame_layout, draw_layout, &texture_layout],
                push_constant_ranges: &[],
            });
        let cube_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Cube PipelineLayout"),
                bind_group_layouts: &[&frame_layout, draw_layout, &cube_layout],
                push_constant_ranges: &[],
            });

        let mut sets = Vec::with_capacity(ShaderKind::ALL.len());
        for kind in ShaderKind::ALL {
            let layout = if kind.uses_cube_map() {
                &cube_pipeline_layout
            } else {
                &texture_pipeline_layout
            };
            sets.push(ShaderSet::new(
                device,
                &kind.desc(shader_dir),
                layout,
                &kind.raster_state(color_format),
            )?);
        }

        Ok(Self {
            frame_layout,
            texture_layout,
            cube_layout,
            sets,
        })
    }

    pub fn get(&self, kind: ShaderKind) -> &ShaderSet {
        &self.sets[kind as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn all_is_in_discriminant_order() {
        for (index, kind) in ShaderKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
        }
    }

    #[test]
    fn shader_dir_switches_to_files() {
        let desc = ShaderKind::Skybox.desc(Some(Path::new("shaders")));
        assert_eq!(desc.source, ShaderSource::File(PathBuf::from("shaders/skybox.wgsl")));
        assert_eq!(desc.vs_entry, "vs_skybox");
        assert_eq!(desc.fs_entry, "fs_skybox");
    }

    #[test]
    fn embedded_sources_define_their_entry_points() {
        for kind in ShaderKind::ALL {
            let desc = kind.desc(None);
            let code = desc.source.load().unwrap();
            assert!(code.contains(&format!("fn {}", desc.vs_entry)), "{:?}", kind);
            assert!(code.contains(&format!("fn {}", desc.fs_entry)), "{:?}", kind);
        }
    }

    #[test]
    fn only_the_sky_skips_culling_and_depth_writes() {
        let format = wgpu::TextureFormat::Bgra8UnormSrgb;
        let sky = ShaderKind::Skybox.raster_state(format);
        assert_eq!(sky.depth, DepthMode::ReadOnlyFar);
        assert_eq!(sky.cull_mode, None);

        for kind in [ShaderKind::Mesh, ShaderKind::Uv, ShaderKind::Reflection] {
            let state = kind.raster_state(format);
            assert_eq!(state.depth, DepthMode::ReadWrite);
            assert_eq!(state.cull_mode, Some(wgpu::Face::Back));
        }
    }
}
