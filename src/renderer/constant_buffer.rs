//! Uniform buffers holding one plain-old-data struct.
//!
//! [`ConstantBuffer`] holds a single value that is rewritten before the pass
//! that reads it. [`DynamicConstantBuffer`] holds one slot per draw: every
//! draw stages its data, the frame uploads all slots at once, and each draw
//! binds its own slot through a dynamic offset. Queue writes only land at
//! submit, so a single slot rewritten between draws of one pass would leave
//! every draw reading the last value.

use std::marker::PhantomData;
use std::mem;
use std::num::NonZeroU64;

use bytemuck::Pod;

const INITIAL_DYNAMIC_SLOTS: u32 = 16;

pub fn align_to(value: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    value.div_ceil(alignment) * alignment
}

pub struct ConstantBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    _marker: PhantomData<T>,
}

impl<T: Pod> ConstantBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str, initial: &T) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: mem::size_of::<T>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });
        buffer
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytemuck::bytes_of(initial));
        buffer.unmap();

        Self {
            buffer,
            _marker: PhantomData,
        }
    }

    pub fn push(&self, queue: &wgpu::Queue, data: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(data));
    }

    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    pub fn layout_entry(
        binding: u32,
        visibility: wgpu::ShaderStages,
    ) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(mem::size_of::<T>() as u64),
            },
            count: None,
        }
    }
}

/// CPU side of a dynamic buffer: packs values at a fixed, aligned stride.
#[derive(Debug, Clone)]
pub struct UniformStaging<T: Pod> {
    stride: u64,
    bytes: Vec<u8>,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformStaging<T> {
    pub fn new(offset_alignment: u32) -> Self {
        Self {
            stride: align_to(mem::size_of::<T>() as u64, offset_alignment as u64),
            bytes: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn len(&self) -> u32 {
        (self.bytes.len() as u64 / self.stride) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Append a value and return the dynamic offset that selects it.
    pub fn push(&mut self, value: &T) -> u32 {
        let offset = self.bytes.len() as u64;
        self.bytes.extend_from_slice(bytemuck::bytes_of(value));
        self.bytes.resize((offset + self.stride) as usize, 0);
        offset as u32
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Slot count needed to hold `required` slots: unchanged while they fit,
/// otherwise at least double.
pub fn grown_capacity(required: u32, capacity: u32) -> u32 {
    if required <= capacity {
        capacity
    } else {
        required.max(capacity.saturating_mul(2))
    }
}

pub struct DynamicConstantBuffer<T: Pod> {
    label: String,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    bind_layout: wgpu::BindGroupLayout,
    capacity: u32,
    staging: UniformStaging<T>,
}

impl<T: Pod> DynamicConstantBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str, visibility: wgpu::ShaderStages) -> Self {
        let staging = UniformStaging::new(device.limits().min_uniform_buffer_offset_alignment);
        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} BindLayout")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(mem::size_of::<T>() as u64),
                },
                count: None,
            }],
        });

        let (buffer, bind_group) =
            Self::allocate(device, label, &bind_layout, INITIAL_DYNAMIC_SLOTS, staging.stride());

        Self {
            label: label.to_string(),
            buffer,
            bind_group,
            bind_layout,
            capacity: INITIAL_DYNAMIC_SLOTS,
            staging,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        capacity: u32,
        stride: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} BindGroup")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(mem::size_of::<T>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    pub fn bind_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn begin_frame(&mut self) {
        self.staging.clear();
    }

    pub fn push(&mut self, value: &T) -> u32 {
        self.staging.push(value)
    }

    /// Upload every staged slot, growing the buffer first if needed.
    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let new_capacity = grown_capacity(self.staging.len(), self.capacity);
        if new_capacity != self.capacity {
            log::info!(
                "Growing {} buffer: {} -> {} slots",
                self.label,
                self.capacity,
                new_capacity
            );
            let (buffer, bind_group) = Self::allocate(
                device,
                &self.label,
                &self.bind_layout,
                new_capacity,
                self.staging.stride(),
            );
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = new_capacity;
        }

        if !self.staging.is_empty() {
            queue.write_buffer(&self.buffer, 0, self.staging.bytes());
        }
    }
}
