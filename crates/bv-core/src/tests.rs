#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{Mat3, Mat4, Vec2, Vec3};

    use crate::animation::{Heading, Oscillator, PatrolId, SceneAnimator};
    use crate::camera::{Camera, MoveDirection, PITCH_LIMIT};
    use crate::collision::{default_zones, LastMove, MovementController, MovementKeys};
    use crate::config::ViewerConfig;
    use crate::frame::{FrameState, InputSnapshot};
    use crate::light::Light;
    use crate::look::{clamp_pitch, LookController};
    use crate::scene::{MeshId, SceneTable};
    use crate::transform::{compose, normal_matrix, rotation_only, TransformOp};
    use crate::Error;

    fn start_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 1.0, 3.0), Vec3::new(0.0, 0.0, -10.0), Vec3::Y)
    }

    fn assert_orthonormal(camera: &Camera) {
        let (f, r, u) = (camera.front(), camera.right(), camera.up());
        assert_relative_eq!(f.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(r.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(u.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(f.dot(r), 0.0, epsilon = 1e-5);
        assert_relative_eq!(f.dot(u), 0.0, epsilon = 1e-5);
        assert_relative_eq!(r.dot(u), 0.0, epsilon = 1e-5);
        // right-handed: right x up points backwards along front
        assert!(r.cross(u).dot(f) < 0.0);
    }

    #[test]
    fn test_pitch_clamp() {
        for pitch in [-400.0, -90.0, -89.5, 89.01, 90.0, 1234.0] {
            let clamped = clamp_pitch(pitch);
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&clamped));
        }
        assert_eq!(clamp_pitch(12.5), 12.5);
    }

    #[test]
    fn test_basis_stays_orthonormal() {
        let mut camera = start_camera();
        assert_orthonormal(&camera);

        let mut look = LookController::from_camera(&camera, 0.1);
        for (dx, dy) in [(50.0, -900.0), (-3000.0, 2000.0), (7.0, 13.0), (0.5, -0.25)] {
            look.apply(&mut camera, dx, dy);
            assert!(look.pitch.abs() <= PITCH_LIMIT);
            assert_orthonormal(&camera);
        }

        for (pitch, yaw) in [(89.0, 0.0), (-89.0, 720.0), (30.0, -1234.5)] {
            camera.rotate(pitch, yaw);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn test_view_matrix_round_trip() {
        let mut camera = start_camera();
        camera.rotate(-20.0, 35.0);
        camera.move_by(MoveDirection::Left, 2.5);

        let view = camera.view_matrix();
        let identity = view * view.inverse();
        assert!(identity.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_move_keeps_target_in_front() {
        let mut camera = start_camera();
        for direction in [
            MoveDirection::Forward,
            MoveDirection::Right,
            MoveDirection::Backward,
            MoveDirection::Left,
        ] {
            let front = camera.front();
            camera.move_by(direction, 0.37);
            assert_eq!(camera.target(), camera.position() + camera.front());
            assert_eq!(camera.front(), front);
        }
    }

    #[test]
    fn test_move_forward_from_start() {
        let mut camera = start_camera();
        let before = camera.position();
        let front = camera.front();

        camera.move_by(MoveDirection::Forward, 0.1);

        assert_relative_eq!(camera.position().z, before.z + 0.1 * front.z, epsilon = 1e-6);
        assert!(camera.position().z < before.z);
        assert_relative_eq!(camera.target().z, camera.position().z + front.z, epsilon = 1e-6);
    }

    #[test]
    fn test_look_controller_starts_from_camera_front() {
        let camera = start_camera();
        let look = LookController::from_camera(&camera, 0.1);

        let mut rotated = camera.clone();
        rotated.rotate(look.pitch, look.yaw);
        assert!(rotated.front().abs_diff_eq(camera.front(), 1e-5));
    }

    #[test]
    fn test_oscillator_period() {
        let (bound, step) = (3.0, 0.03);
        let mut osc = Oscillator::new(-bound, Heading::Advancing, bound, step);
        let range = 2.0 * bound;
        let frames = (2.0 * range / step).round() as usize;

        for _ in 0..frames / 2 {
            osc.advance();
        }
        assert_eq!(osc.position(), bound);
        assert_eq!(osc.heading(), Heading::Reversing);

        for _ in 0..frames / 2 {
            osc.advance();
        }
        assert_eq!(osc.position(), -bound);
        assert_eq!(osc.heading(), Heading::Advancing);
    }

    #[test]
    fn test_oscillator_stays_in_range() {
        let mut osc = Oscillator::new(2.0, Heading::Advancing, 5.0, 0.02);
        for _ in 0..5000 {
            osc.advance();
            assert!(osc.position().abs() <= osc.bound());
        }
    }

    #[test]
    fn test_oscillator_step_is_fixed_off_grid() {
        let mut animator = SceneAnimator::default();
        let mut last = animator.patrol(PatrolId::Dog).unwrap().oscillator.position();
        let mut turns = 0;

        for _ in 0..1000 {
            let heading = animator.patrol(PatrolId::Dog).unwrap().heading();
            animator.advance();
            let osc = &animator.patrol(PatrolId::Dog).unwrap().oscillator;
            assert_relative_eq!((osc.position() - last).abs(), 0.03, epsilon = 1e-4);
            assert!(osc.position().abs() <= osc.bound());
            if osc.heading() != heading {
                turns += 1;
            }
            last = osc.position();
        }
        assert!(turns >= 4);
    }

    #[test]
    fn test_collision_pushes_camera_out() {
        let mut camera = Camera::new(
            Vec3::new(0.0, 1.0, -3.55),
            Vec3::new(0.0, 1.0, -4.55),
            Vec3::Y,
        );
        let mut controller = MovementController::new(0.1, default_zones());
        let zones = default_zones();
        let tanks = &zones[0];

        controller.process(
            &mut camera,
            MovementKeys {
                forward: true,
                ..Default::default()
            },
        );

        assert!(!tanks.contains(camera.position()));
        assert_relative_eq!(camera.position().z, -3.55, epsilon = 1e-5);
        assert_eq!(controller.last_move(), Some(LastMove::new(MoveDirection::Forward)));
    }

    #[test]
    fn test_resolve_from_inside_zone() {
        let mut camera = Camera::new(
            Vec3::new(0.0, 1.0, -3.65),
            Vec3::new(0.0, 1.0, -4.65),
            Vec3::Y,
        );
        let controller = MovementController::new(0.1, default_zones());
        assert!(controller.zones()[0].contains(camera.position()));

        controller.resolve(&mut camera, LastMove::new(MoveDirection::Forward));

        assert!(!controller.zones()[0].contains(camera.position()));
        assert!(camera.position().z > -3.6);
    }

    #[test]
    fn test_only_last_direction_is_reversed() {
        let mut camera = Camera::new(
            Vec3::new(0.05, 1.0, -3.55),
            Vec3::new(0.05, 1.0, -4.55),
            Vec3::Y,
        );
        let mut controller = MovementController::new(0.1, default_zones());

        // Right was the last key processed, so forward stays applied.
        controller.process(
            &mut camera,
            MovementKeys {
                forward: true,
                right: true,
                ..Default::default()
            },
        );

        assert_eq!(controller.last_move(), Some(LastMove::new(MoveDirection::Right)));
        assert_relative_eq!(camera.position().x, 0.05, epsilon = 1e-5);
        assert_relative_eq!(camera.position().z, -3.65, epsilon = 1e-5);
    }

    #[test]
    fn test_zone_boundary_is_outside() {
        let zones = default_zones();
        let tanks = &zones[0];
        assert!(!tanks.contains(Vec3::new(-2.7, 1.0, -5.0)));
        assert!(!tanks.contains(Vec3::new(0.0, 0.0, -5.0)));
        assert!(tanks.contains(Vec3::new(0.0, 0.01, -5.0)));
    }

    #[test]
    fn test_light_space_covers_anchor() {
        let light = Light::default();
        let ndc = light.space_matrix().project_point3(light.anchor);

        for c in ndc.to_array() {
            assert!((-1.0..=1.0).contains(&c), "{ndc} outside clip volume");
        }
    }

    #[test]
    fn test_normal_matrix_needs_inverse_transpose() {
        let scene = SceneTable::default();
        let barricade = scene.get("barricade").unwrap();
        let model = barricade.model_matrix(&SceneAnimator::default());

        let naive = Mat3::from_mat4(model);
        let normal = normal_matrix(Mat4::IDENTITY, model);
        assert!(!normal.abs_diff_eq(naive, 1e-3));
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let tangent = Vec3::new(1.0, 1.0, 0.0);
        let normal = Vec3::new(1.0, -1.0, 0.0);

        let t = Mat3::from_mat4(model) * tangent;
        let naive = Mat3::from_mat4(model) * normal;
        let corrected = normal_matrix(Mat4::IDENTITY, model) * normal;

        assert!(t.dot(naive).abs() > 1.0);
        assert_relative_eq!(t.dot(corrected), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_compose_applies_last_op_first() {
        let m = compose(&[TransformOp::translate(1.0, 0.0, 0.0), TransformOp::uniform_scale(2.0)]);
        let p = m.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_skybox_view_has_no_translation() {
        let mut camera = start_camera();
        camera.move_by(MoveDirection::Forward, 5.0);
        let sky = rotation_only(camera.view_matrix());
        assert_eq!(sky.w_axis, glam::Vec4::W);
    }

    #[test]
    fn test_shadow_casters_subset() {
        let scene = SceneTable::default();
        let casters: Vec<MeshId> = scene.shadow_casters().map(|i| i.mesh).collect();
        assert_eq!(
            casters,
            vec![
                MeshId::Tank1,
                MeshId::Tank2,
                MeshId::Tank3,
                MeshId::Barracks,
                MeshId::M4,
                MeshId::Barricade,
                MeshId::Ground,
            ]
        );
    }

    #[test]
    fn test_patrol_drives_translation_and_heading() {
        let scene = SceneTable::default();
        let dog = scene.get("dog").unwrap();
        let mut animator = SceneAnimator::default();

        let start = dog.model_matrix(&animator).w_axis.truncate();
        assert!(start.abs_diff_eq(Vec3::new(-3.0, 0.0, -1.0), 1e-6));

        // 133 steps of 0.03 reach 2.99; the 134th would pass 3.0 and turns back
        for _ in 0..134 {
            animator.advance();
        }
        let patrol = animator.patrol(PatrolId::Dog).unwrap();
        assert_eq!(patrol.heading(), Heading::Reversing);

        let turned = dog.model_matrix(&animator);
        assert_relative_eq!(turned.w_axis.z, 2.96, epsilon = 1e-3);
        assert!(!Mat3::from_mat4(turned).abs_diff_eq(Mat3::from_mat4(dog.model_matrix(&SceneAnimator::default())), 1e-3));
    }

    #[test]
    fn test_frame_plans() {
        let state = FrameState::new(&ViewerConfig::default());
        let shadow = state.shadow_plan();
        let color = state.color_plan();

        assert_eq!(shadow.draws.len(), 7);
        assert_eq!(color.draws.len(), state.scene.instances().len());
        assert_eq!(shadow.light_space, color.light_space);
        assert_eq!(color.marker.mesh, MeshId::LightCube);
        assert_eq!(color.skybox_view.w_axis, glam::Vec4::W);
    }

    #[test]
    fn test_process_movement() {
        let mut state = FrameState::new(&ViewerConfig::default());
        let before = state.camera.position();
        let dog_before = state.animator.patrol(PatrolId::Dog).unwrap().translation();

        state.process_movement(&InputSnapshot {
            movement: MovementKeys {
                backward: true,
                ..Default::default()
            },
            look_delta: Vec2::new(10.0, 0.0),
            render_mode: None,
        });

        assert!(state.camera.position() != before);
        assert!(state.animator.patrol(PatrolId::Dog).unwrap().translation() != dog_before);
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let config = ViewerConfig::from_toml("[camera]\nspeed = 0.5\n").unwrap();
        assert_eq!(config.camera.speed, 0.5);
        assert_eq!(config.camera.sensitivity, 0.1);
        assert_eq!(config.shadow.resolution, 2048);
        assert_eq!(config.window.width, 1024);
        assert!(!config.assets.placeholders);
    }

    #[test]
    fn test_config_rejects_bad_planes() {
        let err = ViewerConfig::from_toml("[camera]\nnear = 10.0\nfar = 1.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = ViewerConfig::from_toml("[shadow]\nresolution = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_config_rejects_vertical_view() {
        for source in [
            "[camera]\nposition = [0.0, 1.0, 0.0]\ntarget = [0.0, 5.0, 0.0]\n",
            "[camera]\nposition = [2.0, 1.0, 2.0]\ntarget = [2.0, -4.0, 2.0]\n",
        ] {
            let err = ViewerConfig::from_toml(source).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)));
        }

        let config = ViewerConfig::from_toml("[camera]\nposition = [0.0, 1.0, 0.0]\ntarget = [0.0, 5.0, -1.0]\n").unwrap();
        let state = FrameState::new(&config);
        assert!(!state.camera.right().is_nan());
        assert!(!state.camera.view_matrix().is_nan());
    }

    #[test]
    fn test_resize_updates_projection() {
        let mut state = FrameState::new(&ViewerConfig::default());
        state.resize(1920, 1080);
        let expected = Mat4::perspective_rh(45f32.to_radians(), 1920.0 / 1080.0, 0.1, 200.0);
        assert!(state.color_plan().projection.abs_diff_eq(expected, 1e-6));

        state.resize(0, 0);
        assert!(state.color_plan().projection.abs_diff_eq(expected, 1e-6));
        state.resize(1920, 0);
        assert_relative_eq!(state.projection.aspect_ratio, 1920.0 / 1080.0);
    }
}
