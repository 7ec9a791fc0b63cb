use glam::{Vec2, Vec3};

use crate::animation::SceneAnimator;
use crate::camera::{Camera, Projection};
use crate::collision::{default_zones, MovementController, MovementKeys};
use crate::config::ViewerConfig;
use crate::light::Light;
use crate::look::LookController;
use crate::pass::{ColorPassPlan, ShadowPassPlan};
use crate::scene::SceneTable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    #[default]
    Fill,
    Wireframe,
    Points,
}

impl RenderMode {
    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Fill => "fill",
            RenderMode::Wireframe => "wireframe",
            RenderMode::Points => "points",
        }
    }
}

/// What the window layer observed since the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub movement: MovementKeys,
    pub look_delta: Vec2,
    pub render_mode: Option<RenderMode>,
}

/// All mutable scene state, owned by the frame loop and passed explicitly.
#[derive(Clone, Debug)]
pub struct FrameState {
    pub camera: Camera,
    pub look: LookController,
    pub projection: Projection,
    pub movement: MovementController,
    pub animator: SceneAnimator,
    pub light: Light,
    pub scene: SceneTable,
    pub render_mode: RenderMode,
}

impl FrameState {
    pub fn new(config: &ViewerConfig) -> Self {
        let camera_cfg = &config.camera;
        let camera = Camera::new(camera_cfg.position(), camera_cfg.target(), Vec3::Y);
        let look = LookController::from_camera(&camera, camera_cfg.sensitivity);

        Self {
            camera,
            look,
            projection: camera_cfg.projection(config.window.width, config.window.height),
            movement: MovementController::new(camera_cfg.speed, default_zones()),
            animator: SceneAnimator::default(),
            light: Light::default(),
            scene: SceneTable::default(),
            render_mode: RenderMode::default(),
        }
    }

    /// Look, walk, collide, then step the patrols. Render mode requests are
    /// left to the caller, which knows what the backend supports.
    pub fn process_movement(&mut self, input: &InputSnapshot) {
        self.look
            .apply(&mut self.camera, input.look_delta.x, input.look_delta.y);
        self.movement.process(&mut self.camera, input.movement);
        self.animator.advance();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    pub fn shadow_plan(&self) -> ShadowPassPlan {
        ShadowPassPlan::build(&self.scene, &self.animator, &self.light)
    }

    pub fn color_plan(&self) -> ColorPassPlan {
        ColorPassPlan::build(
            &self.scene,
            &self.animator,
            &self.camera,
            &self.projection,
            &self.light,
        )
    }
}
