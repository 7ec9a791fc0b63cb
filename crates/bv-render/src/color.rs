//! Camera-view pass: the lit scene, sampling the shadow map, followed by the
//! light marker.

use std::collections::HashMap;

use bv_core::frame::RenderMode;
use bv_core::pass::ColorPassPlan;

use crate::mesh::MeshLibrary;
use crate::shadow::ShadowMap;
use crate::texture::DEPTH_FORMAT;
use crate::uniforms::{dynamic_object_entry, uniform_entry, Globals, ObjectBuffer, ObjectUniforms};
use crate::vertex::Vertex;

/// Features a render mode needs from the adapter.
pub fn required_features(mode: RenderMode) -> wgpu::Features {
    match mode {
        RenderMode::Fill => wgpu::Features::empty(),
        RenderMode::Wireframe => wgpu::Features::POLYGON_MODE_LINE,
        RenderMode::Points => wgpu::Features::POLYGON_MODE_POINT,
    }
}

fn polygon_mode(mode: RenderMode) -> wgpu::PolygonMode {
    match mode {
        RenderMode::Fill => wgpu::PolygonMode::Fill,
        RenderMode::Wireframe => wgpu::PolygonMode::Line,
        RenderMode::Points => wgpu::PolygonMode::Point,
    }
}

pub struct ColorPass {
    lit_pipelines: HashMap<RenderMode, wgpu::RenderPipeline>,
    marker_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    objects: ObjectBuffer,
    staged: Vec<ObjectUniforms>,
}

impl ColorPass {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        material_layout: &wgpu::BindGroupLayout,
        shadow_map: &ShadowMap,
        features: wgpu::Features,
    ) -> Self {
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Layout"),
            entries: &[dynamic_object_entry(0, wgpu::ShaderStages::VERTEX)],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals"),
            layout: &globals_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        });

        let lit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Lit Shader"),
            source: wgpu::ShaderSource::Wgsl(format!("{GLOBALS_WGSL}{LIT_WGSL}").into()),
        });
        let marker_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Marker Shader"),
            source: wgpu::ShaderSource::Wgsl(format!("{GLOBALS_WGSL}{MARKER_WGSL}").into()),
        });

        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lit Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &object_layout, material_layout],
            push_constant_ranges: &[],
        });
        let marker_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Marker Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let mut lit_pipelines = HashMap::new();
        for mode in [RenderMode::Fill, RenderMode::Wireframe, RenderMode::Points] {
            if !features.contains(required_features(mode)) {
                log::info!("{} rendering not available on this adapter", mode.label());
                continue;
            }
            let pipeline = create_pipeline(
                device,
                &lit_layout,
                &lit_shader,
                surface_format,
                polygon_mode(mode),
                "Lit Pipeline",
            );
            lit_pipelines.insert(mode, pipeline);
        }

        let marker_pipeline = create_pipeline(
            device,
            &marker_layout,
            &marker_shader,
            surface_format,
            wgpu::PolygonMode::Fill,
            "Marker Pipeline",
        );

        let objects = ObjectBuffer::new(device, &object_layout, "Scene Objects", 16);

        Self {
            lit_pipelines,
            marker_pipeline,
            globals_buffer,
            globals_bind_group,
            object_layout,
            objects,
            staged: Vec::new(),
        }
    }

    pub fn supports(&self, mode: RenderMode) -> bool {
        self.lit_pipelines.contains_key(&mode)
    }

    /// Upload globals and one object slot per lit draw; the marker takes the
    /// slot after the last draw.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, plan: &ColorPassPlan) {
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::from_plan(plan)),
        );

        self.staged.clear();
        self.staged
            .extend(plan.draws.iter().map(|draw| ObjectUniforms::lit(&draw.transform)));
        self.staged.push(ObjectUniforms::depth_only(plan.marker.model));
        self.objects.write(device, queue, &self.object_layout, &self.staged);
    }

    /// Draw into an open pass whose viewport already covers the window.
    pub fn record(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        plan: &ColorPassPlan,
        meshes: &MeshLibrary,
        mode: RenderMode,
    ) {
        let pipeline = self
            .lit_pipelines
            .get(&mode)
            .or_else(|| self.lit_pipelines.get(&RenderMode::Fill));
        if let Some(pipeline) = pipeline {
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for (slot, draw) in plan.draws.iter().enumerate() {
                let Some(mesh) = meshes.get(draw.mesh) else {
                    continue;
                };
                pass.set_bind_group(1, self.objects.bind_group(), &[self.objects.offset(slot)]);
                mesh.draw_lit(pass, 2);
            }
        }

        if let Some(marker) = meshes.get(plan.marker.mesh) {
            pass.set_pipeline(&self.marker_pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_bind_group(
                1,
                self.objects.bind_group(),
                &[self.objects.offset(plan.draws.len())],
            );
            marker.draw_depth(pass);
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    polygon_mode: wgpu::PolygonMode,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            // Several models ship with inconsistent winding.
            cull_mode: None,
            polygon_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

const GLOBALS_WGSL: &str = r#"
struct Globals {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    light_space: mat4x4<f32>,
    light_dir_matrix: mat4x4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    point_light: vec4<f32>,
}

struct Object {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: Globals;
@group(0) @binding(1)
var shadow_map: texture_depth_2d;
@group(0) @binding(2)
var shadow_sampler: sampler_comparison;

@group(1) @binding(0)
var<uniform> object: Object;
"#;

const LIT_WGSL: &str = r#"
struct Material {
    color: vec4<f32>,
}

@group(2) @binding(0)
var material_texture: texture_2d<f32>;
@group(2) @binding(1)
var material_sampler: sampler;
@group(2) @binding(2)
var<uniform> material: Material;

const AMBIENT: f32 = 0.2;
const SPECULAR: f32 = 0.5;
const SHININESS: f32 = 32.0;

struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) view_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) light_space: vec4<f32>,
}

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VertexOutput {
    let world = object.model * vec4<f32>(position, 1.0);
    let view_position = globals.view * world;
    let normal_matrix = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz,
    );

    var out: VertexOutput;
    out.clip = globals.projection * view_position;
    out.view_position = view_position.xyz;
    out.normal = normal_matrix * normal;
    out.uv = uv;
    out.light_space = globals.light_space * world;
    return out;
}

// 1.0 when lit, 0.0 when occluded. Anything outside the light frustum is lit.
fn shadow_factor(light_space: vec4<f32>, n_dot_l: f32) -> f32 {
    let ndc = light_space.xyz / light_space.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5);
    let bias = max(0.005 * (1.0 - n_dot_l), 0.0005);
    let lit = textureSampleCompareLevel(shadow_map, shadow_sampler, uv, ndc.z - bias);

    let outside = any(uv < vec2<f32>(0.0)) || any(uv > vec2<f32>(1.0)) || ndc.z > 1.0;
    return select(lit, 1.0, outside);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(material_texture, material_sampler, in.uv) * material.color;
    if base.a < 0.1 {
        discard;
    }

    let n = normalize(in.normal);
    let view_dir = normalize(-in.view_position);
    let light_color = globals.light_color.rgb;

    // directional
    let l = normalize((globals.light_dir_matrix * vec4<f32>(globals.light_dir.xyz, 0.0)).xyz);
    let n_dot_l = max(dot(n, l), 0.0);
    let half_dir = normalize(l + view_dir);
    let spec = pow(max(dot(n, half_dir), 0.0), SHININESS) * SPECULAR;
    let shadow = shadow_factor(in.light_space, n_dot_l);
    var color = (AMBIENT + shadow * (n_dot_l + spec)) * light_color;

    // lamp
    let lamp = (globals.view * vec4<f32>(globals.point_light.xyz, 1.0)).xyz;
    let to_lamp = lamp - in.view_position;
    let dist = length(to_lamp);
    let pl = to_lamp / max(dist, 1e-4);
    let attenuation = 1.0 / (1.0 + 0.7 * dist + 1.8 * dist * dist);
    let lamp_diffuse = max(dot(n, pl), 0.0);
    let lamp_spec = pow(max(dot(n, normalize(pl + view_dir)), 0.0), SHININESS) * SPECULAR;
    color += attenuation * (AMBIENT + lamp_diffuse + lamp_spec) * light_color;

    return vec4<f32>(min(color, vec3<f32>(1.0)) * base.rgb, base.a);
}
"#;

const MARKER_WGSL: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return globals.projection * globals.view * object.model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(globals.light_color.rgb, 1.0);
}
"#;
