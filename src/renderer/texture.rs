// renderer/texture.rs (2D and cube textures, with mipmaps)

use std::path::{Path, PathBuf};

use glam::Vec3;

/// One tightly packed RGBA8 image level.
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl MipLevel {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let data = color
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self::new(width, height, data)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Whether the rest of the mip chain is built on the GPU after upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipGeneration {
    None,
    Gpu,
}

struct TextureUpload<'a> {
    label: Option<&'a str>,
    /// One mip chain per array layer, all with the same shape.
    layers: Vec<&'a [MipLevel]>,
    mips: MipGeneration,
    is_srgb: bool,
    view_dimension: wgpu::TextureViewDimension,
}

#[derive(Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    /// Load a colour texture from any format the `image` crate decodes and
    /// build its mip chain on the GPU.
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        is_srgb: bool,
    ) -> Result<Self, String> {
        let path = path.as_ref();
        log::info!("Loading texture: {:?}", path);
        let image = load_rgba(path)?;
        Self::from_rgba8(
            device,
            queue,
            &image,
            is_srgb,
            MipGeneration::Gpu,
            path.to_str(),
        )
    }

    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &MipLevel,
        is_srgb: bool,
        mips: MipGeneration,
        label: Option<&str>,
    ) -> Result<Self, String> {
        Self::upload(
            device,
            queue,
            TextureUpload {
                label,
                layers: vec![std::slice::from_ref(image)],
                mips,
                is_srgb,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
        )
    }

    /// Upload a complete, caller-built mip chain level by level.
    pub fn from_mip_chain(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        chain: &[MipLevel],
        is_srgb: bool,
        label: Option<&str>,
    ) -> Result<Self, String> {
        Self::upload(
            device,
            queue,
            TextureUpload {
                label,
                layers: vec![chain],
                mips: MipGeneration::None,
                is_srgb,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
        )
    }

    /// Build a cube map from six square faces ordered +X, -X, +Y, -Y, +Z, -Z.
    pub fn cube_from_faces(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[MipLevel; 6],
        label: Option<&str>,
    ) -> Result<Self, String> {
        validate_cube_faces(faces)?;

        Self::upload(
            device,
            queue,
            TextureUpload {
                label,
                layers: faces.iter().map(std::slice::from_ref).collect(),
                mips: MipGeneration::Gpu,
                is_srgb: true,
                view_dimension: wgpu::TextureViewDimension::Cube,
            },
        )
    }

    pub fn cube_from_paths(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        paths: &[PathBuf; 6],
    ) -> Result<Self, String> {
        let mut faces = Vec::with_capacity(6);
        for path in paths {
            log::info!("Loading cube face: {:?}", path);
            faces.push(load_rgba(path)?);
        }
        let faces: [MipLevel; 6] = faces
            .try_into()
            .map_err(|_| "Cube map needs exactly six faces".to_string())?;
        Self::cube_from_faces(device, queue, &faces, Some("SkyboxCubeMap"))
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        upload: TextureUpload<'_>,
    ) -> Result<Self, String> {
        let name = upload.label.unwrap_or("texture");
        let first_chain = upload
            .layers
            .first()
            .copied()
            .ok_or_else(|| format!("{name}: no image layers"))?;
        let base = first_chain
            .first()
            .ok_or_else(|| format!("{name}: empty mip chain"))?;
        let (width, height) = (base.width, base.height);
        if width == 0 || height == 0 {
            return Err(format!("{name}: zero-sized image"));
        }

        let provided_levels = first_chain.len() as u32;
        if upload.mips == MipGeneration::Gpu && provided_levels > 1 {
            return Err(format!(
                "{name}: cannot generate mips on top of {provided_levels} provided levels"
            ));
        }
        validate_chains(name, &upload.layers, width, height)?;

        let mip_level_count = match upload.mips {
            MipGeneration::Gpu => calculate_mip_levels(width, height),
            MipGeneration::None => provided_levels,
        };
        let layer_count = upload.layers.len() as u32;
        let (texture_format, view_format) = formats_for_color_space(upload.is_srgb);

        let mut view_formats = Vec::new();
        if let Some(format) = view_format {
            view_formats.push(format);
        }

        let mut usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
        if upload.mips == MipGeneration::Gpu {
            usage |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: upload.label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: layer_count,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format,
            usage,
            view_formats: &view_formats,
        });

        for (layer, chain) in upload.layers.iter().enumerate() {
            for (level, mip) in chain.iter().enumerate() {
                queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &texture,
                        mip_level: level as u32,
                        origin: wgpu::Origin3d {
                            x: 0,
                            y: 0,
                            z: layer as u32,
                        },
                        aspect: wgpu::TextureAspect::All,
                    },
                    &mip.data,
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * mip.width),
                        rows_per_image: Some(mip.height),
                    },
                    wgpu::Extent3d {
                        width: mip.width,
                        height: mip.height,
                        depth_or_array_layers: 1,
                    },
                );
            }
        }

        if upload.mips == MipGeneration::Gpu {
            generate_mipmaps(
                device,
                queue,
                &texture,
                mip_level_count,
                layer_count,
                texture_format,
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: upload.label,
            format: view_format.or(Some(texture_format)),
            dimension: Some(upload.view_dimension),
            ..Default::default()
        });

        log::debug!(
            "Created texture {}: {}x{} x{} layers, {} mips",
            name,
            width,
            height,
            layer_count,
            mip_level_count
        );

        Ok(Self { texture, view })
    }
}

/// Cube faces must be square and share one size. Returns that size.
pub fn validate_cube_faces(faces: &[MipLevel; 6]) -> Result<u32, String> {
    let size = faces[0].width;
    match faces
        .iter()
        .position(|f| f.width != size || f.height != size)
    {
        Some(bad) => Err(format!(
            "Cube face {} is {}x{}, expected {}x{}",
            bad, faces[bad].width, faces[bad].height, size, size
        )),
        None => Ok(size),
    }
}

fn validate_chains(
    name: &str,
    layers: &[&[MipLevel]],
    width: u32,
    height: u32,
) -> Result<(), String> {
    let levels = layers[0].len();
    for (layer, chain) in layers.iter().enumerate() {
        if chain.len() != levels {
            return Err(format!(
                "{name}: layer {layer} has {} mip levels, expected {levels}",
                chain.len()
            ));
        }
        for (level, mip) in chain.iter().enumerate() {
            let expected = (
                mip_extent(width, level as u32),
                mip_extent(height, level as u32),
            );
            if (mip.width, mip.height) != expected {
                return Err(format!(
                    "{name}: layer {layer} mip {level} is {}x{}, expected {}x{}",
                    mip.width, mip.height, expected.0, expected.1
                ));
            }
            if mip.data.len() != mip.expected_len() {
                return Err(format!(
                    "{name}: layer {layer} mip {level} has {} bytes, expected {}",
                    mip.data.len(),
                    mip.expected_len()
                ));
            }
        }
    }
    Ok(())
}

pub fn load_rgba(path: &Path) -> Result<MipLevel, String> {
    let img = image::open(path).map_err(|e| format!("Failed to load image {:?}: {}", path, e))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(MipLevel::new(width, height, rgba.into_raw()))
}

/// Calculate the number of mip levels for a given texture size
pub fn calculate_mip_levels(width: u32, height: u32) -> u32 {
    let max_dimension = width.max(height).max(1);
    u32::BITS - max_dimension.leading_zeros()
}

/// Size of one axis at the given mip level.
pub fn mip_extent(size: u32, level: u32) -> u32 {
    (size >> level).max(1)
}

/// Texture and view formats for a colour texture. Storage stays linear so
/// the mip blit can render into it.
fn formats_for_color_space(is_srgb: bool) -> (wgpu::TextureFormat, Option<wgpu::TextureFormat>) {
    if is_srgb {
        (
            wgpu::TextureFormat::Rgba8Unorm,
            Some(wgpu::TextureFormat::Rgba8UnormSrgb),
        )
    } else {
        (wgpu::TextureFormat::Rgba8Unorm, None)
    }
}

pub fn checkerboard(size: u32, checker_size: u32, color1: [u8; 4], color2: [u8; 4]) -> MipLevel {
    let checker_size = checker_size.max(1);
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    for y in 0..size {
        for x in 0..size {
            let checker_x = (x / checker_size) % 2;
            let checker_y = (y / checker_size) % 2;
            let color = if (checker_x + checker_y) % 2 == 0 {
                color1
            } else {
                color2
            };
            let idx = ((y * size + x) * 4) as usize;
            pixels[idx..idx + 4].copy_from_slice(&color);
        }
    }

    MipLevel::new(size, size, pixels)
}

/// Halve an image with a 2x2 box filter. Odd edges reuse the last texel.
pub fn downsample_box(src: &MipLevel) -> MipLevel {
    let width = mip_extent(src.width, 1);
    let height = mip_extent(src.height, 1);
    let mut data = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height {
        for x in 0..width {
            let x0 = (x * 2).min(src.width - 1);
            let x1 = (x * 2 + 1).min(src.width - 1);
            let y0 = (y * 2).min(src.height - 1);
            let y1 = (y * 2 + 1).min(src.height - 1);
            let taps = [
                src.pixel(x0, y0),
                src.pixel(x1, y0),
                src.pixel(x0, y1),
                src.pixel(x1, y1),
            ];
            for channel in 0..4 {
                let sum: u32 = taps.iter().map(|t| t[channel] as u32).sum();
                data.push(((sum + 2) / 4) as u8);
            }
        }
    }

    MipLevel::new(width, height, data)
}

/// Full mip chain built on the CPU, base level first.
pub fn box_filtered_chain(base: MipLevel) -> Vec<MipLevel> {
    let levels = calculate_mip_levels(base.width, base.height) as usize;
    let mut chain = Vec::with_capacity(levels);
    chain.push(base);
    while chain.len() < levels {
        let next = downsample_box(&chain[chain.len() - 1]);
        chain.push(next);
    }
    chain
}

/// Direction through the texel at (`u`, `v`) in -1..1 on the given cube
/// face, following the layer order and orientation wgpu samples with.
pub fn cube_face_direction(face: usize, u: f32, v: f32) -> Vec3 {
    match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    }
}

/// Generate mipmaps for every array layer using GPU rendering
fn generate_mipmaps(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    mip_level_count: u32,
    layer_count: u32,
    format: wgpu::TextureFormat,
) {
    if mip_level_count <= 1 {
        return;
    }

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Blit Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("blit.wgsl").into()),
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Blit Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
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
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Blit Pipeline Layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Blit Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Mip Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Mipmap Generator"),
    });

    let level_view = |layer: u32, mip: u32, usage: wgpu::TextureUsages| {
        texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Mip Level"),
            format: Some(format),
            dimension: Some(wgpu::TextureViewDimension::D2),
            aspect: wgpu::TextureAspect::All,
            base_mip_level: mip,
            mip_level_count: Some(1),
            base_array_layer: layer,
            array_layer_count: Some(1),
            usage: Some(usage),
        })
    };

    for layer in 0..layer_count {
        for target_mip in 1..mip_level_count {
            let src_view = level_view(layer, target_mip - 1, wgpu::TextureUsages::TEXTURE_BINDING);
            let dst_view = level_view(layer, target_mip, wgpu::TextureUsages::RENDER_ATTACHMENT);

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Mip Bind Group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&src_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mipmap Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &dst_view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&pipeline);
            rpass.set_bind_group(0, &bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
    }

    queue.submit(Some(encoder.finish()));
}
