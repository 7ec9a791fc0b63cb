use bv_core::pass::ShadowPassPlan;

use crate::mesh::MeshLibrary;
use crate::texture::DEPTH_FORMAT;
use crate::uniforms::{dynamic_object_entry, uniform_entry, ObjectBuffer, ObjectUniforms, ShadowGlobals};
use crate::vertex::Vertex;

/// Off-screen depth target written by the shadow pass and sampled by the
/// color pass of the same frame.
pub struct ShadowMap {
    pub size: u32,
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl ShadowMap {
    pub fn new(device: &wgpu::Device, size: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Lookups outside the map are handled in the shader, which treats
        // them as lit.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            size,
            _texture: texture,
            view,
            sampler,
        }
    }
}

pub struct ShadowPass {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    objects: ObjectBuffer,
    staged: Vec<ObjectUniforms>,
}

impl ShadowPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Depth Map Shader"),
            source: wgpu::ShaderSource::Wgsl(DEPTH_SHADER.into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Globals Layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Object Layout"),
            entries: &[dynamic_object_entry(0, wgpu::ShaderStages::VERTEX)],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shadow Globals"),
            size: std::mem::size_of::<ShadowGlobals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Globals"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let objects = ObjectBuffer::new(device, &object_layout, "Shadow Objects", 16);

        Self {
            pipeline,
            globals_buffer,
            globals_bind_group,
            object_layout,
            objects,
            staged: Vec::new(),
        }
    }

    /// Upload the light transform and one model matrix per caster.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, plan: &ShadowPassPlan) {
        let globals = ShadowGlobals {
            light_space: plan.light_space.to_cols_array_2d(),
        };
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        self.staged.clear();
        self.staged
            .extend(plan.draws.iter().map(|draw| ObjectUniforms::depth_only(draw.model)));
        self.objects.write(device, queue, &self.object_layout, &self.staged);
    }

    /// Clear the depth target and draw every caster into it. The pass ends
    /// when this returns, releasing the target for sampling.
    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &ShadowMap,
        plan: &ShadowPassPlan,
        meshes: &MeshLibrary,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &target.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let size = target.size as f32;
        pass.set_viewport(0.0, 0.0, size, size, 0.0, 1.0);
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.globals_bind_group, &[]);

        for (slot, draw) in plan.draws.iter().enumerate() {
            let Some(mesh) = meshes.get(draw.mesh) else {
                continue;
            };
            pass.set_bind_group(1, self.objects.bind_group(), &[self.objects.offset(slot)]);
            mesh.draw_depth(&mut pass);
        }
    }
}

const DEPTH_SHADER: &str = r#"
struct ShadowGlobals {
    light_space: mat4x4<f32>,
}

struct Object {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> shadow: ShadowGlobals;

@group(1) @binding(0)
var<uniform> object: Object;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return shadow.light_space * object.model * vec4<f32>(position, 1.0);
}
"#;
