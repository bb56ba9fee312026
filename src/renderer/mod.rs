//! The helpers an app builds its scene from: GPU context, meshes, textures,
//! samplers, constant buffers and shader sets.

pub mod constant_buffer;
pub mod context;
pub mod depth;
pub mod mesh;
pub mod pipeline_builder;
pub mod primitives;
pub mod sampler;
pub mod shader_set;
pub mod texture;
pub mod vertex;

pub use constant_buffer::{ConstantBuffer, DynamicConstantBuffer};
pub use context::GpuContext;
pub use depth::Depth;
pub use mesh::{create_mesh_cube, create_mesh_from_obj, Mesh, MeshData};
pub use sampler::{create_basic_sampler, SamplerPreset};
pub use shader_set::{DepthMode, RasterState, ShaderSet, ShaderSetDesc, ShaderSource};
pub use texture::{MipGeneration, MipLevel, Texture};
pub use vertex::MeshVertex;
