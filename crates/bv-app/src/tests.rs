#[cfg(test)]
mod tests {
    use glam::Vec2;
    use winit::event::ElementState;
    use winit::keyboard::KeyCode;

    use bv_core::frame::RenderMode;

    use crate::hud::Hud;
    use crate::input::{render_mode_for, InputState, KeyAction};

    #[test]
    fn test_wasd_maps_to_movement() {
        let mut input = InputState::default();
        input.key(KeyCode::KeyW, ElementState::Pressed);
        input.key(KeyCode::KeyD, ElementState::Pressed);

        let keys = input.movement();
        assert!(keys.forward && keys.right);
        assert!(!keys.backward && !keys.left);

        input.key(KeyCode::KeyW, ElementState::Released);
        assert!(!input.movement().forward);
        assert!(input.movement().right);
    }

    #[test]
    fn test_snapshot_consumes_motion_but_keeps_held_keys() {
        let mut input = InputState::default();
        input.key(KeyCode::KeyS, ElementState::Pressed);
        input.mouse_motion(3.0, -1.5);
        input.mouse_motion(1.0, 0.5);

        let first = input.take_snapshot();
        assert_eq!(first.look_delta, Vec2::new(4.0, -1.0));
        assert!(first.movement.backward);

        let second = input.take_snapshot();
        assert_eq!(second.look_delta, Vec2::ZERO);
        assert!(second.movement.backward);
    }

    #[test]
    fn test_render_mode_keys() {
        assert_eq!(render_mode_for(KeyCode::KeyP), Some(RenderMode::Fill));
        assert_eq!(render_mode_for(KeyCode::KeyO), Some(RenderMode::Wireframe));
        assert_eq!(render_mode_for(KeyCode::KeyI), Some(RenderMode::Points));
        assert_eq!(render_mode_for(KeyCode::KeyW), None);

        let mut input = InputState::default();
        input.key(KeyCode::KeyO, ElementState::Pressed);
        assert_eq!(input.take_snapshot().render_mode, Some(RenderMode::Wireframe));
        assert_eq!(input.take_snapshot().render_mode, None);
    }

    #[test]
    fn test_actions_fire_once_per_press() {
        let mut input = InputState::default();
        assert_eq!(input.key(KeyCode::F1, ElementState::Pressed), KeyAction::ToggleHud);
        // key repeat
        assert_eq!(input.key(KeyCode::F1, ElementState::Pressed), KeyAction::None);
        assert_eq!(input.key(KeyCode::F1, ElementState::Released), KeyAction::None);
        assert_eq!(input.key(KeyCode::F1, ElementState::Pressed), KeyAction::ToggleHud);

        assert_eq!(input.key(KeyCode::Escape, ElementState::Pressed), KeyAction::Exit);
    }

    #[test]
    fn test_focus_loss_releases_keys() {
        let mut input = InputState::default();
        input.key(KeyCode::KeyA, ElementState::Pressed);
        input.mouse_motion(5.0, 5.0);
        input.clear();

        let snapshot = input.take_snapshot();
        assert!(!snapshot.movement.left);
        assert_eq!(snapshot.look_delta, Vec2::ZERO);
    }

    #[test]
    fn test_undrawn_frames_keep_pending_input() {
        let mut input = InputState::default();
        input.mouse_motion(2.0, 1.0);
        input.key(KeyCode::KeyI, ElementState::Pressed);
        // a frame whose surface could not be acquired takes nothing
        input.mouse_motion(2.0, 1.0);

        let snapshot = input.take_snapshot();
        assert_eq!(snapshot.look_delta, Vec2::new(4.0, 2.0));
        assert_eq!(snapshot.render_mode, Some(RenderMode::Points));
    }

    #[test]
    fn test_hud_hidden_by_default() {
        let mut hud = Hud::default();
        assert!(!hud.visible);
        hud.toggle();
        assert!(hud.visible);
    }
}
