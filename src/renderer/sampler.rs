/// Filtering setups offered for the ground plane, in the order the
/// "Sampler State" control cycles through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerPreset {
    Point,
    Bilinear,
    Trilinear,
    Anisotropic,
}

impl SamplerPreset {
    pub const ALL: [SamplerPreset; 4] = [
        SamplerPreset::Point,
        SamplerPreset::Bilinear,
        SamplerPreset::Trilinear,
        SamplerPreset::Anisotropic,
    ];

    pub const MAX_ANISOTROPY: u16 = 16;

    pub fn name(self) -> &'static str {
        match self {
            SamplerPreset::Point => "point",
            SamplerPreset::Bilinear => "bilinear",
            SamplerPreset::Trilinear => "trilinear",
            SamplerPreset::Anisotropic => "anisotropic x16",
        }
    }

    pub fn descriptor(self) -> wgpu::SamplerDescriptor<'static> {
        let (filter, mipmap_filter, anisotropy_clamp) = match self {
            SamplerPreset::Point => (wgpu::FilterMode::Nearest, wgpu::FilterMode::Nearest, 1),
            SamplerPreset::Bilinear => (wgpu::FilterMode::Linear, wgpu::FilterMode::Nearest, 1),
            SamplerPreset::Trilinear => (wgpu::FilterMode::Linear, wgpu::FilterMode::Linear, 1),
            // Anisotropy requires every filter to be linear.
            SamplerPreset::Anisotropic => (
                wgpu::FilterMode::Linear,
                wgpu::FilterMode::Linear,
                Self::MAX_ANISOTROPY,
            ),
        };

        wgpu::SamplerDescriptor {
            label: Some(self.name()),
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter,
            anisotropy_clamp,
            ..basic_sampler_descriptor(wgpu::AddressMode::Repeat)
        }
    }

    pub fn create(self, device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&self.descriptor())
    }
}

/// Linear min/mag/mip filtering over the full lod range with one address
/// mode on every axis.
pub fn basic_sampler_descriptor(
    address_mode: wgpu::AddressMode,
) -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("BasicSampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        lod_min_clamp: 0.0,
        lod_max_clamp: 32.0,
        ..Default::default()
    }
}

pub fn create_basic_sampler(
    device: &wgpu::Device,
    address_mode: wgpu::AddressMode,
) -> wgpu::Sampler {
    device.create_sampler(&basic_sampler_descriptor(address_mode))
}
