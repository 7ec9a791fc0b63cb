use std::num::NonZeroU64;

use glam::{Mat3, Mat4, Vec3};

use bv_core::pass::ColorPassPlan;
use bv_core::transform::InstanceTransform;

/// Per-frame data for the lit and marker shaders. 3×3 matrices travel as
/// 4×4 because WGSL pads `mat3x3` columns to 16 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub light_space: [[f32; 4]; 4],
    pub light_dir_matrix: [[f32; 4]; 4],
    pub light_dir: [f32; 4],
    pub light_color: [f32; 4],
    pub point_light: [f32; 4],
}

impl Globals {
    pub fn from_plan(plan: &ColorPassPlan) -> Self {
        Self {
            projection: plan.projection.to_cols_array_2d(),
            view: plan.view.to_cols_array_2d(),
            light_space: plan.light_space.to_cols_array_2d(),
            light_dir_matrix: pad_mat3(plan.light_direction_matrix),
            light_dir: extend(plan.light_direction, 0.0),
            light_color: extend(plan.light_color, 1.0),
            point_light: extend(plan.point_light, 1.0),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowGlobals {
    pub light_space: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub fn depth_only(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    pub fn lit(transform: &InstanceTransform) -> Self {
        Self {
            model: transform.model.to_cols_array_2d(),
            normal: pad_mat3(transform.normal),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniforms {
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

fn pad_mat3(m: Mat3) -> [[f32; 4]; 4] {
    Mat4::from_mat3(m).to_cols_array_2d()
}

fn extend(v: Vec3, w: f32) -> [f32; 4] {
    v.extend(w).to_array()
}

pub fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

pub const OBJECT_SIZE: u64 = std::mem::size_of::<ObjectUniforms>() as u64;

/// Bind group layout entry for a uniform read through a dynamic offset.
pub fn dynamic_object_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size: NonZeroU64::new(OBJECT_SIZE),
        },
        count: None,
    }
}

pub fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// One uniform buffer holding an [`ObjectUniforms`] slot per draw, each slot
/// starting on the device's dynamic offset alignment.
pub struct ObjectBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

impl ObjectBuffer {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &'static str,
        capacity: usize,
    ) -> Self {
        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride = align_to(OBJECT_SIZE, alignment);
        let capacity = capacity.max(1);
        let (buffer, bind_group) = Self::allocate(device, layout, label, stride, capacity);

        Self {
            label,
            buffer,
            bind_group,
            stride,
            capacity,
            staging: Vec::new(),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(OBJECT_SIZE),
                }),
            }],
        });

        (buffer, bind_group)
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn offset(&self, slot: usize) -> u32 {
        (self.stride * slot as u64) as u32
    }

    /// Upload one slot per entry, growing the buffer if needed.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        objects: &[ObjectUniforms],
    ) {
        if objects.len() > self.capacity {
            self.capacity = objects.len().next_power_of_two();
            log::debug!("growing {} to {} slots", self.label, self.capacity);
            let (buffer, bind_group) =
                Self::allocate(device, layout, self.label, self.stride, self.capacity);
            self.buffer = buffer;
            self.bind_group = bind_group;
        }

        pack_slots(&mut self.staging, objects, self.stride as usize);
        if !self.staging.is_empty() {
            queue.write_buffer(&self.buffer, 0, &self.staging);
        }
    }
}

/// Lay `objects` out `stride` bytes apart, zero-filling the gaps.
pub fn pack_slots(out: &mut Vec<u8>, objects: &[ObjectUniforms], stride: usize) {
    out.clear();
    out.resize(stride * objects.len(), 0);
    for (slot, object) in objects.iter().enumerate() {
        let start = slot * stride;
        out[start..start + OBJECT_SIZE as usize].copy_from_slice(bytemuck::bytes_of(object));
    }
}
