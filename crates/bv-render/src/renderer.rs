use bv_core::config::ViewerConfig;
use bv_core::error::Result;
use bv_core::frame::{FrameState, RenderMode};
use bv_core::scene::MeshId;

use crate::assets::AssetLoader;
use crate::color::ColorPass;
use crate::gpu::Gpu;
use crate::mesh::{material_layout, GpuMesh, MeshLibrary};
use crate::shadow::{ShadowMap, ShadowPass};
use crate::skybox::Skybox;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

/// Owns every GPU resource of the scene and records the two passes of a
/// frame: depth from the light, then the lit view that samples it.
pub struct SceneRenderer {
    meshes: MeshLibrary,
    shadow_map: ShadowMap,
    shadow_pass: ShadowPass,
    color_pass: ColorPass,
    skybox: Skybox,
}

impl SceneRenderer {
    pub fn new(gpu: &Gpu, config: &ViewerConfig) -> Result<Self> {
        let loader = AssetLoader::new(&config.assets);
        let material_layout = material_layout(&gpu.device);

        let mut meshes = MeshLibrary::default();
        for id in MeshId::ALL {
            let data = loader.load_mesh(id)?;
            let label = format!("{id:?}");
            meshes.insert(
                id,
                GpuMesh::upload(&gpu.device, &gpu.queue, &material_layout, &data, &label),
            );
        }
        log::info!("{} meshes resident", meshes.len());

        let mut resolution = config.shadow.resolution;
        if resolution > gpu.max_texture_size {
            log::warn!(
                "Shadow map of {resolution}px exceeds the device limit, using {}px",
                gpu.max_texture_size
            );
            resolution = gpu.max_texture_size;
        }
        let shadow_map = ShadowMap::new(&gpu.device, resolution);
        let shadow_pass = ShadowPass::new(&gpu.device);
        let color_pass = ColorPass::new(
            &gpu.device,
            gpu.config.format,
            &material_layout,
            &shadow_map,
            gpu.features,
        );

        let faces = loader.load_skybox()?;
        let skybox = Skybox::new(&gpu.device, &gpu.queue, gpu.config.format, &faces);

        Ok(Self {
            meshes,
            shadow_map,
            shadow_pass,
            color_pass,
            skybox,
        })
    }

    pub fn supports(&self, mode: RenderMode) -> bool {
        self.color_pass.supports(mode)
    }

    /// Switch the frame to `requested` if the device can draw it. Returns
    /// whether the mode is now active.
    pub fn apply_render_mode(&self, state: &mut FrameState, requested: RenderMode) -> bool {
        if state.render_mode == requested {
            return true;
        }
        if !self.supports(requested) {
            log::warn!(
                "{} rendering is not supported by this device, staying in {}",
                requested.label(),
                state.render_mode.label()
            );
            return false;
        }
        log::info!("Render mode: {}", requested.label());
        state.render_mode = requested;
        true
    }

    /// Record the shadow pass and the color pass of one frame into
    /// `encoder`, drawing into `target`.
    pub fn render_scene(
        &mut self,
        gpu: &Gpu,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        state: &FrameState,
    ) {
        let shadow_plan = state.shadow_plan();
        let color_plan = state.color_plan();

        self.shadow_pass
            .prepare(&gpu.device, &gpu.queue, &shadow_plan);
        self.color_pass.prepare(&gpu.device, &gpu.queue, &color_plan);
        self.skybox.prepare(&gpu.queue, &color_plan);

        self.shadow_pass
            .record(encoder, &self.shadow_map, &shadow_plan, &self.meshes);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Color Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &gpu.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let size = gpu.size();
        pass.set_viewport(0.0, 0.0, size.width as f32, size.height as f32, 0.0, 1.0);
        self.color_pass
            .record(&mut pass, &color_plan, &self.meshes, state.render_mode);
        self.skybox.record(&mut pass);
    }
}
