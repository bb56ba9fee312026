use std::path::Path;

use wgpu::util::DeviceExt;

use super::primitives;
use super::vertex::MeshVertex;

/// CPU-side geometry, ready to upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Load every model in a Wavefront OBJ file into one mesh, multiplying
    /// positions by `scale`. Missing normals point up, missing uvs are zero.
    pub fn from_obj(path: impl AsRef<Path>, scale: f32) -> Result<Self, String> {
        let path = path.as_ref();
        let load_options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };

        let (models, _materials) = tobj::load_obj(path, &load_options)
            .map_err(|e| format!("Failed to load OBJ {:?}: {}", path, e))?;

        if models.is_empty() {
            return Err(format!("OBJ {:?} contains no models", path));
        }

        let mut data = MeshData::default();
        for model in &models {
            let mesh = &model.mesh;
            if mesh.positions.len() % 3 != 0 {
                return Err(format!(
                    "OBJ {:?}: model '{}' has a truncated position array",
                    path, model.name
                ));
            }

            let base = data.vertices.len() as u32;
            let count = mesh.positions.len() / 3;
            for i in 0..count {
                let p = &mesh.positions[i * 3..i * 3 + 3];
                let normal = mesh
                    .normals
                    .get(i * 3..i * 3 + 3)
                    .map(|n| [n[0], n[1], n[2]])
                    .unwrap_or([0.0, 1.0, 0.0]);
                // OBJ puts v = 0 at the bottom of the image.
                let uv = mesh
                    .texcoords
                    .get(i * 2..i * 2 + 2)
                    .map(|t| [t[0], 1.0 - t[1]])
                    .unwrap_or([0.0, 0.0]);

                data.vertices.push(MeshVertex {
                    pos: [p[0] * scale, p[1] * scale, p[2] * scale],
                    normal,
                    uv,
                });
            }

            data.indices
                .extend(mesh.indices.iter().map(|&index| base + index));
        }

        log::info!(
            "Loaded OBJ {:?}: {} models, {} vertices, {} triangles",
            path,
            models.len(),
            data.vertices.len(),
            data.indices.len() / 3
        );

        Ok(data)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Vertex and index buffers for one drawable mesh.
#[derive(Debug)]
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    pub fn from_data(device: &wgpu::Device, data: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertices")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Indices")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }

    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

pub fn create_mesh_cube(device: &wgpu::Device, half_extent: f32) -> Mesh {
    let (vertices, indices) = primitives::cube_mesh(half_extent);
    Mesh::from_data(device, &MeshData::new(vertices, indices), "Cube")
}

pub fn create_mesh_from_obj(
    device: &wgpu::Device,
    path: impl AsRef<Path>,
    scale: f32,
) -> Result<Mesh, String> {
    let path = path.as_ref();
    let data = MeshData::from_obj(path, scale)?;
    if data.indices.is_empty() {
        return Err(format!("OBJ {:?} has no faces", path));
    }
    let label = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Obj");
    Ok(Mesh::from_data(device, &data, label))
}
