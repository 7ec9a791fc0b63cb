use crate::camera::{Camera, PITCH_LIMIT};

/// Accumulates mouse motion into yaw/pitch and feeds the camera.
#[derive(Clone, Debug)]
pub struct LookController {
    pub yaw: f32,
    pub pitch: f32,
    pub sensitivity: f32,
}

impl LookController {
    /// Start from the camera's current orientation so the first motion
    /// event does not snap the view.
    pub fn from_camera(camera: &Camera, sensitivity: f32) -> Self {
        let (yaw, pitch) = camera.angles();
        Self {
            yaw,
            pitch: clamp_pitch(pitch),
            sensitivity,
        }
    }

    /// Apply a raw cursor delta. Screen y grows downward, so a positive
    /// `dy` lowers the pitch.
    pub fn apply(&mut self, camera: &mut Camera, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        self.yaw += dx * self.sensitivity;
        self.pitch = clamp_pitch(self.pitch - dy * self.sensitivity);
        camera.rotate(self.pitch, self.yaw);
    }
}

pub fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
}
