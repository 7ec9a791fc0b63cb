use glam::{Mat4, Vec3};

/// World up axis used to rebuild the camera basis after a rotation.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Pitch limit in degrees. At ±90° the front vector becomes parallel to
/// [`WORLD_UP`] and the right vector degenerates.
pub const PITCH_LIMIT: f32 = 89.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveDirection {
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// First-person camera with an orthonormal right-handed basis.
///
/// `target` is always `position + front`; the view matrix looks from
/// `position` toward `target` with `up` as the reference axis.
#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let front = (target - position).normalize();
        let right = front.cross(up).normalize();
        let up = right.cross(front).normalize();

        Self {
            position,
            target: position + front,
            front,
            right,
            up,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Translate along the front or right axis. The basis is left untouched.
    pub fn move_by(&mut self, direction: MoveDirection, speed: f32) {
        match direction {
            MoveDirection::Forward => self.position += self.front * speed,
            MoveDirection::Backward => self.position -= self.front * speed,
            MoveDirection::Right => self.position += self.right * speed,
            MoveDirection::Left => self.position -= self.right * speed,
        }
        self.target = self.position + self.front;
    }

    /// Rebuild the basis from spherical angles in degrees.
    ///
    /// Pitch is not clamped here; callers keep it inside
    /// `[-PITCH_LIMIT, PITCH_LIMIT]` (see [`crate::look::LookController`]).
    pub fn rotate(&mut self, pitch: f32, yaw: f32) {
        let (pitch, yaw) = (pitch.to_radians(), yaw.to_radians());
        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );

        self.front = front.normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
        self.target = self.position + self.front;
    }

    /// Yaw and pitch in degrees that reproduce the current front vector.
    pub fn angles(&self) -> (f32, f32) {
        let pitch = self.front.y.clamp(-1.0, 1.0).asin().to_degrees();
        let yaw = self.front.z.atan2(self.front.x).to_degrees();
        (yaw, pitch)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }
}

/// Perspective projection parameters shared by the lit and marker shaders.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }
}
