use std::sync::Arc;

use anyhow::Context as _;
use egui_wgpu::wgpu;
use egui_winit::State as EguiState;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{DeviceEvent, DeviceId, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

use bv_core::config::ViewerConfig;
use bv_core::frame::FrameState;
use bv_render::{Gpu, SceneRenderer};

use crate::hud::Hud;
use crate::input::{InputState, KeyAction};

/// Window plus everything that lives on the GPU. Created on the first
/// `resumed`, dropped with the app.
struct Viewer {
    window: Arc<Window>,
    gpu: Gpu,
    renderer: SceneRenderer,
    egui_state: EguiState,
    egui_renderer: egui_wgpu::Renderer,
}

impl Viewer {
    fn new(event_loop: &ActiveEventLoop, config: &ViewerConfig) -> anyhow::Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("creating the window")?,
        );
        capture_cursor(&window);

        let gpu = pollster::block_on(Gpu::new(window.clone())).context("initialising wgpu")?;
        let renderer = SceneRenderer::new(&gpu, config).context("loading the scene")?;

        let egui_ctx = egui::Context::default();
        let egui_state = EguiState::new(
            egui_ctx,
            egui::ViewportId::ROOT,
            &*window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        Ok(Self {
            window,
            gpu,
            renderer,
            egui_state,
            egui_renderer,
        })
    }
}

fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        log::warn!("Could not capture the cursor: {e}");
    }
    window.set_cursor_visible(false);
}

pub struct App {
    config: ViewerConfig,
    state: FrameState,
    input: InputState,
    hud: Hud,
    viewer: Option<Viewer>,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: ViewerConfig) -> Self {
        let state = FrameState::new(&config);
        Self {
            config,
            state,
            input: InputState::default(),
            hud: Hud::default(),
            viewer: None,
            error: None,
        }
    }

    /// The error that ended the event loop, if any.
    pub fn finish(self) -> anyhow::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            log::debug!("Window minimised");
            return;
        }
        log::info!("Resized to {}x{}", size.width, size.height);
        viewer.gpu.resize(size);
        self.state.resize(size.width, size.height);
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        let size = viewer.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }

        let output = match viewer.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                viewer.gpu.resize(size);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("Skipping frame: {e:?}");
                return;
            }
        };
        // Input accumulates until a frame is actually drawn.
        self.hud.tick();
        let snapshot = self.input.take_snapshot();
        if let Some(mode) = snapshot.render_mode {
            viewer.renderer.apply_render_mode(&mut self.state, mode);
        }
        self.state.process_movement(&snapshot);

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = viewer
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        viewer
            .renderer
            .render_scene(&viewer.gpu, &mut encoder, &view, &self.state);

        // --- HUD --------------------------------------------------------------

        let raw_input = viewer.egui_state.take_egui_input(&viewer.window);
        let full_output = viewer
            .egui_state
            .egui_ctx()
            .run(raw_input, |ctx| self.hud.draw(ctx, &self.state));
        viewer
            .egui_state
            .handle_platform_output(&viewer.window, full_output.platform_output);

        let paint_jobs = viewer
            .egui_state
            .egui_ctx()
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [viewer.gpu.config.width, viewer.gpu.config.height],
            pixels_per_point: viewer.window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            viewer
                .egui_renderer
                .update_texture(&viewer.gpu.device, &viewer.gpu.queue, *id, delta);
        }
        viewer.egui_renderer.update_buffers(
            &viewer.gpu.device,
            &viewer.gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen,
        );

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            viewer
                .egui_renderer
                .render(&mut pass.forget_lifetime(), &paint_jobs, &screen);
        }

        for id in &full_output.textures_delta.free {
            viewer.egui_renderer.free_texture(id);
        }

        viewer.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match Viewer::new(event_loop, &self.config) {
            Ok(viewer) => {
                let size = viewer.window.inner_size();
                if size.width > 0 && size.height > 0 {
                    self.state.resize(size.width, size.height);
                }
                self.viewer = Some(viewer);
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(viewer) = self.viewer.as_mut() {
            // egui only needs to observe; the viewer keeps every key
            let _ = viewer.egui_state.on_window_event(&viewer.window, &event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match self.input.key(code, state) {
                KeyAction::Exit => event_loop.exit(),
                KeyAction::ToggleHud => self.hud.toggle(),
                KeyAction::None => {}
            },
            WindowEvent::Focused(false) => self.input.clear(),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self.viewer.is_none() {
            return;
        }
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.mouse_motion(dx, dy);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = &self.viewer {
            viewer.window.request_redraw();
        }
    }
}
