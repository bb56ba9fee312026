use std::borrow::Cow;
use std::path::PathBuf;

use super::pipeline_builder::PipelineBuilder;
use super::vertex::MeshVertex;

/// Where a shader set's WGSL comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderSource {
    /// Source compiled into the binary.
    Embedded { name: &'static str, code: &'static str },
    /// Source read verbatim from disk at startup.
    File(PathBuf),
}

impl ShaderSource {
    pub fn load(&self) -> Result<Cow<'static, str>, String> {
        match self {
            ShaderSource::Embedded { code, .. } => Ok(Cow::Borrowed(code)),
            ShaderSource::File(path) => {
                log::info!("Loading shader: {:?}", path);
                std::fs::read_to_string(path)
                    .map(Cow::Owned)
                    .map_err(|err| format!("Failed to read shader {:?}: {}", path, err))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ShaderSource::Embedded { name, .. } => format!("<embedded {name}>"),
            ShaderSource::File(path) => path.display().to_string(),
        }
    }
}

/// A vertex + fragment entry point pair in one WGSL module.
#[derive(Debug, Clone)]
pub struct ShaderSetDesc {
    pub label: &'static str,
    pub source: ShaderSource,
    pub vs_entry: &'static str,
    pub fs_entry: &'static str,
}

impl ShaderSetDesc {
    pub fn vs_ps(
        label: &'static str,
        source: ShaderSource,
        vs_entry: &'static str,
        fs_entry: &'static str,
    ) -> Self {
        Self {
            label,
            source,
            vs_entry,
            fs_entry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    /// Depth test `Less` and write.
    ReadWrite,
    /// Depth test `LessEqual` without writing; used for geometry pinned to
    /// the far plane.
    ReadOnlyFar,
}

#[derive(Debug, Clone, Copy)]
pub struct RasterState {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
    pub depth: DepthMode,
    pub cull_mode: Option<wgpu::Face>,
}

/// Compiled shaders plus the fixed-function state they draw with.
pub struct ShaderSet {
    pipeline: wgpu::RenderPipeline,
}

impl ShaderSet {
    /// Compile `desc` against the [`MeshVertex`] layout. Validation errors
    /// from the shader or the pipeline come back as `Err`.
    pub fn new(
        device: &wgpu::Device,
        desc: &ShaderSetDesc,
        layout: &wgpu::PipelineLayout,
        raster: &RasterState,
    ) -> Result<Self, String> {
        let code = desc.source.load()?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(code),
        });

        let (depth_write, depth_compare) = match raster.depth {
            DepthMode::ReadWrite => (true, wgpu::CompareFunction::Less),
            DepthMode::ReadOnlyFar => (false, wgpu::CompareFunction::LessEqual),
        };

        let pipeline = PipelineBuilder::new(device, layout, &module)
            .with_label(desc.label)
            .with_vertex_entry(desc.vs_entry)
            .with_fragment_entry(desc.fs_entry)
            .with_vertex_buffer(MeshVertex::layout())
            .with_color_target(raster.color_format, Some(wgpu::BlendState::REPLACE))
            .with_depth_stencil(raster.depth_format, depth_write, depth_compare)
            .with_cull_mode(raster.cull_mode)
            .build();

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(format!(
                "Shader set '{}' ({}) failed to compile: {}",
                desc.label,
                desc.source.describe(),
                err
            ));
        }

        log::info!(
            "Compiled shader set '{}' from {} ({} / {})",
            desc.label,
            desc.source.describe(),
            desc.vs_entry,
            desc.fs_entry
        );

        Ok(Self { pipeline })
    }

    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_source_borrows_without_io() {
        let source = ShaderSource::Embedded {
            name: "test.wgsl",
            code: "@vertex fn vs() {}",
        };
        assert!(matches!(source.load(), Ok(Cow::Borrowed(_))));
        assert_eq!(source.describe(), "<embedded test.wgsl>");
    }

    #[test]
    fn missing_shader_file_is_an_error() {
        let source = ShaderSource::File(PathBuf::from("no/such/shader.wgsl"));
        let err = source.load().unwrap_err();
        assert!(err.contains("shader.wgsl"));
    }
}
