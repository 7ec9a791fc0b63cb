use glam::{Mat4, Vec3};

/// Direction toward the sun. Scaled by [`MARKER_DISTANCE`] it is also where
/// the light marker cube is drawn.
pub const LIGHT_DIRECTION: Vec3 = Vec3::new(1.0, 8.0, -15.0);
pub const LIGHT_COLOR: Vec3 = Vec3::ONE;
pub const POINT_LIGHT_POSITION: Vec3 = Vec3::new(2.0, 1.2, -2.3);

/// Point the light camera looks at, roughly the middle of the camp.
pub const SCENE_ANCHOR: Vec3 = Vec3::new(-1.0, 0.0, 10.0);

pub const MARKER_DISTANCE: f32 = 1.0;
pub const MARKER_SCALE: f32 = 0.05;

/// Orthographic volume of the shadow camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowFrustum {
    pub half_width: f32,
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowFrustum {
    fn default() -> Self {
        Self {
            half_width: 40.0,
            half_height: 8.0,
            near: 1.0,
            far: 35.0,
        }
    }
}

/// The scene's single directional light plus the lamp's point light.
#[derive(Clone, Debug)]
pub struct Light {
    pub direction: Vec3,
    pub color: Vec3,
    pub point_position: Vec3,
    pub anchor: Vec3,
    pub frustum: ShadowFrustum,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: LIGHT_DIRECTION,
            color: LIGHT_COLOR,
            point_position: POINT_LIGHT_POSITION,
            anchor: SCENE_ANCHOR,
            frustum: ShadowFrustum::default(),
        }
    }
}

impl Light {
    /// `projection * view` of the shadow camera.
    pub fn space_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.direction, self.anchor, Vec3::Y);
        let f = &self.frustum;
        let projection = Mat4::orthographic_rh(
            -f.half_width,
            f.half_width,
            -f.half_height,
            f.half_height,
            f.near,
            f.far,
        );
        projection * view
    }

    pub fn marker_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.direction * MARKER_DISTANCE)
            * Mat4::from_scale(Vec3::splat(MARKER_SCALE))
    }
}
