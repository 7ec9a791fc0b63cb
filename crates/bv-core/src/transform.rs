use glam::{Mat3, Mat4, Vec3};

/// One step of a placement chain. Steps are composed left to right, each
/// post-multiplied onto the running matrix, so the last step is applied to
/// the mesh first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    Translate(Vec3),
    Rotate { axis: Vec3, degrees: f32 },
    Scale(Vec3),
}

impl TransformOp {
    pub const fn translate(x: f32, y: f32, z: f32) -> Self {
        Self::Translate(Vec3::new(x, y, z))
    }

    pub const fn rotate_x(degrees: f32) -> Self {
        Self::Rotate { axis: Vec3::X, degrees }
    }

    pub const fn rotate_y(degrees: f32) -> Self {
        Self::Rotate { axis: Vec3::Y, degrees }
    }

    pub const fn rotate_z(degrees: f32) -> Self {
        Self::Rotate { axis: Vec3::Z, degrees }
    }

    pub const fn uniform_scale(factor: f32) -> Self {
        Self::Scale(Vec3::splat(factor))
    }

    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Translate(offset) => Mat4::from_translation(offset),
            Self::Rotate { axis, degrees } => {
                Mat4::from_axis_angle(axis.normalize(), degrees.to_radians())
            }
            Self::Scale(factors) => Mat4::from_scale(factors),
        }
    }
}

pub fn compose(ops: &[TransformOp]) -> Mat4 {
    ops.iter().fold(Mat4::IDENTITY, |acc, op| acc * op.matrix())
}

/// Inverse-transpose of the upper-left 3×3 of `view * model`.
///
/// Normals transformed by the plain model matrix stop being perpendicular
/// to their surfaces once the model carries non-uniform scale.
pub fn normal_matrix(view: Mat4, model: Mat4) -> Mat3 {
    Mat3::from_mat4(view * model).inverse().transpose()
}

/// Rotates the world-space light direction into view space.
pub fn light_direction_matrix(view: Mat4) -> Mat3 {
    Mat3::from_mat4(view.inverse().transpose())
}

/// View matrix with its translation dropped, for drawing the skybox.
pub fn rotation_only(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

/// Model and normal matrix for one instance in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceTransform {
    pub model: Mat4,
    pub normal: Mat3,
}

impl InstanceTransform {
    pub fn new(view: Mat4, model: Mat4) -> Self {
        Self {
            model,
            normal: normal_matrix(view, model),
        }
    }
}
