use std::collections::HashMap;
use std::ops::Range;

use glam::Vec3;
use image::RgbaImage;
use wgpu::util::DeviceExt;

use bv_core::scene::MeshId;

use crate::texture::{linear_sampler, Texture};
use crate::uniforms::MaterialUniforms;
use crate::vertex::Vertex;

#[derive(Clone, Debug)]
pub struct MaterialData {
    pub color: [f32; 4],
    pub texture: Option<RgbaImage>,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            color: [1.0; 4],
            texture: None,
        }
    }
}

/// A contiguous index range drawn with one material.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshPart {
    pub indices: Range<u32>,
    pub material: usize,
}

/// CPU-side mesh ready for upload.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub parts: Vec<MeshPart>,
    pub materials: Vec<MaterialData>,
}

impl MeshData {
    /// Axis-aligned box with outward, counter-clockwise faces.
    pub fn cuboid(min: Vec3, max: Vec3, color: [f32; 4]) -> Self {
        let center = (min + max) * 0.5;
        let half = (max - min) * 0.5;

        // (normal, u, v) with u x v == normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            for (su, sv) in corners {
                let offset = (normal + u * su + v * sv) * half;
                vertices.push(Vertex {
                    position: (center + offset).to_array(),
                    normal: normal.to_array(),
                    uv: [(su + 1.0) * 0.5, (1.0 - sv) * 0.5],
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        let count = indices.len() as u32;
        Self {
            vertices,
            indices,
            parts: vec![MeshPart {
                indices: 0..count,
                material: 0,
            }],
            materials: vec![MaterialData {
                color,
                texture: None,
            }],
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Smooth per-vertex normals for meshes that ship without them.
pub fn compute_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accum = vec![Vec3::ZERO; vertices.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from_array(vertices[a].position);
        let pb = Vec3::from_array(vertices[b].position);
        let pc = Vec3::from_array(vertices[c].position);
        let n = (pb - pa).cross(pc - pa);
        accum[a] += n;
        accum[b] += n;
        accum[c] += n;
    }
    for (vertex, n) in vertices.iter_mut().zip(accum) {
        vertex.normal = n.normalize_or(Vec3::Y).to_array();
    }
}

pub struct GpuMaterial {
    pub bind_group: wgpu::BindGroup,
    _texture: Texture,
    _uniforms: wgpu::Buffer,
}

pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub parts: Vec<MeshPart>,
    pub materials: Vec<GpuMaterial>,
}

impl GpuMesh {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_layout: &wgpu::BindGroupLayout,
        data: &MeshData,
        label: &str,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let sampler = linear_sampler(device, "material sampler");
        let materials = data
            .materials
            .iter()
            .map(|material| {
                let texture = match &material.texture {
                    Some(image) => Texture::from_image(device, queue, image, label),
                    None => Texture::white(device, queue),
                };
                let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::bytes_of(&MaterialUniforms {
                        color: material.color,
                    }),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(label),
                    layout: material_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&texture.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: uniforms.as_entire_binding(),
                        },
                    ],
                });
                GpuMaterial {
                    bind_group,
                    _texture: texture,
                    _uniforms: uniforms,
                }
            })
            .collect();

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.index_count(),
            parts: data.parts.clone(),
            materials,
        }
    }

    /// Depth-only draw: one call over every index, materials ignored.
    pub fn draw_depth(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    /// Lit draw: binds each part's material at `material_group`.
    pub fn draw_lit(&self, pass: &mut wgpu::RenderPass<'_>, material_group: u32) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for part in &self.parts {
            let Some(material) = self.materials.get(part.material) else {
                continue;
            };
            pass.set_bind_group(material_group, &material.bind_group, &[]);
            pass.draw_indexed(part.indices.clone(), 0, 0..1);
        }
    }
}

/// Every mesh the scene references, uploaded once at startup.
#[derive(Default)]
pub struct MeshLibrary {
    meshes: HashMap<MeshId, GpuMesh>,
}

impl MeshLibrary {
    pub fn insert(&mut self, id: MeshId, mesh: GpuMesh) {
        self.meshes.insert(id, mesh);
    }

    pub fn get(&self, id: MeshId) -> Option<&GpuMesh> {
        self.meshes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
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
            crate::uniforms::uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
        ],
    })
}
