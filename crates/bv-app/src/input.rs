use std::collections::HashSet;

use glam::Vec2;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use bv_core::collision::MovementKeys;
use bv_core::frame::{InputSnapshot, RenderMode};

/// What a key press asks of the window layer, beyond movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Exit,
    ToggleHud,
}

pub fn render_mode_for(code: KeyCode) -> Option<RenderMode> {
    match code {
        KeyCode::KeyP => Some(RenderMode::Fill),
        KeyCode::KeyO => Some(RenderMode::Wireframe),
        KeyCode::KeyI => Some(RenderMode::Points),
        _ => None,
    }
}

/// Keyboard and raw mouse state gathered between two frames.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    look_delta: Vec2,
    render_mode: Option<RenderMode>,
}

impl InputState {
    pub fn key(&mut self, code: KeyCode, state: ElementState) -> KeyAction {
        if state == ElementState::Released {
            self.held.remove(&code);
            return KeyAction::None;
        }

        // held keys repeat; only the first press triggers actions
        if !self.held.insert(code) {
            return KeyAction::None;
        }
        if let Some(mode) = render_mode_for(code) {
            self.render_mode = Some(mode);
        }
        match code {
            KeyCode::Escape => KeyAction::Exit,
            KeyCode::F1 => KeyAction::ToggleHud,
            _ => KeyAction::None,
        }
    }

    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        self.look_delta += Vec2::new(dx as f32, dy as f32);
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.look_delta = Vec2::ZERO;
    }

    pub fn movement(&self) -> MovementKeys {
        MovementKeys {
            forward: self.held.contains(&KeyCode::KeyW),
            backward: self.held.contains(&KeyCode::KeyS),
            left: self.held.contains(&KeyCode::KeyA),
            right: self.held.contains(&KeyCode::KeyD),
        }
    }

    /// Snapshot for this frame. Mouse motion and mode requests are consumed;
    /// held keys carry over.
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            movement: self.movement(),
            look_delta: std::mem::take(&mut self.look_delta),
            render_mode: self.render_mode.take(),
        }
    }
}
