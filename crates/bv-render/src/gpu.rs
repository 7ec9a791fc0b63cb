//! Surface, device and the window-sized depth buffer.

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use bv_core::error::{Error, Result};

use crate::texture::Texture;

/// Optional features the viewer makes use of when the adapter has them.
pub const OPTIONAL_FEATURES: [wgpu::Features; 2] = [
    wgpu::Features::POLYGON_MODE_LINE,
    wgpu::Features::POLYGON_MODE_POINT,
];

pub struct Gpu {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub depth: Texture,
    pub features: wgpu::Features,
    pub max_texture_size: u32,
}

impl Gpu {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::RenderError(format!("surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::RenderError(format!("no suitable adapter: {e}")))?;

        let info = adapter.get_info();
        log::info!("Using {} ({:?})", info.name, info.backend);

        let mut features = wgpu::Features::empty();
        for feature in OPTIONAL_FEATURES {
            if adapter.features().contains(feature) {
                features |= feature;
            }
        }
        let limits = adapter.limits();
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("bivouac-device"),
                required_features: features,
                required_limits: wgpu::Limits::default().using_resolution(limits.clone()),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
            })
            .await
            .map_err(|e| Error::RenderError(format!("device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| Error::RenderError("surface has no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth = Texture::depth(&device, config.width, config.height, "Window Depth");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth,
            features,
            max_texture_size: limits.max_texture_dimension_2d,
        })
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    /// Reconfigure the surface and rebuild the depth buffer. Zero sizes are
    /// ignored; the surface keeps its last valid configuration.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = Texture::depth(&self.device, size.width, size.height, "Window Depth");
    }
}
