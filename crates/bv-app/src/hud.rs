use std::time::{Duration, Instant};

use egui::{Color32, Context, RichText};

use bv_core::animation::{Heading, PatrolId};
use bv_core::frame::FrameState;

/// F1 debug overlay. Hidden until toggled.
pub struct Hud {
    pub visible: bool,
    last_frame: Instant,
    frame_time: Duration,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            visible: false,
            last_frame: Instant::now(),
            frame_time: Duration::ZERO,
        }
    }
}

impl Hud {
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::debug!("HUD {}", if self.visible { "shown" } else { "hidden" });
    }

    /// Record the time since the previous call.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.frame_time = now - self.last_frame;
        self.last_frame = now;
    }

    pub fn draw(&self, ctx: &Context, state: &FrameState) {
        if !self.visible {
            return;
        }

        egui::Window::new("bivouac")
            .resizable(false)
            .collapsible(false)
            .default_pos([12.0, 12.0])
            .show(ctx, |ui| {
                let ms = self.frame_time.as_secs_f32() * 1000.0;
                let fps = if ms > 0.0 { 1000.0 / ms } else { 0.0 };
                ui.label(RichText::new(format!("{ms:.2} ms ({fps:.0} fps)")).color(Color32::LIGHT_GREEN));
                ui.separator();

                let p = state.camera.position();
                ui.label(format!("position  [{:.2}, {:.2}, {:.2}]", p.x, p.y, p.z));
                ui.label(format!(
                    "yaw {:.1}°  pitch {:.1}°",
                    state.look.yaw, state.look.pitch
                ));
                ui.label(format!("mode  {}", state.render_mode.label()));
                ui.separator();

                for patrol in state.animator.patrols() {
                    let name = match patrol.id {
                        PatrolId::Dog => "dog",
                        PatrolId::Soldier => "soldier",
                    };
                    let arrow = match patrol.heading() {
                        Heading::Advancing => "+",
                        Heading::Reversing => "-",
                    };
                    ui.label(format!(
                        "{name:<8} {:>6.2} {arrow}",
                        patrol.oscillator.position()
                    ));
                }

                ui.separator();
                ui.label(RichText::new("WASD move · P/O/I fill/wire/points · Esc quit").weak());
            });
    }
}
