use glam::Vec3;

use crate::camera::{Camera, MoveDirection};

/// Axis-aligned exclusion volume around a static prop.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionZone {
    pub name: &'static str,
    pub min: Vec3,
    pub max: Vec3,
}

impl CollisionZone {
    pub const fn new(name: &'static str, min: Vec3, max: Vec3) -> Self {
        Self { name, min, max }
    }

    /// Strict containment on all three axes; points on a face are outside.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpgt(self.min).all() && point.cmplt(self.max).all()
    }
}

pub fn default_zones() -> Vec<CollisionZone> {
    vec![
        CollisionZone::new(
            "tanks",
            Vec3::new(-2.7, 0.0, -7.6),
            Vec3::new(4.85, 2.5, -3.6),
        ),
        CollisionZone::new(
            "barracks",
            Vec3::new(-16.7, 0.0, 1.1),
            Vec3::new(-5.9, 5.78, 7.0),
        ),
    ]
}

/// Movement keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementKeys {
    /// Held directions in the fixed processing order.
    pub fn held(&self) -> impl Iterator<Item = MoveDirection> {
        [
            (self.forward, MoveDirection::Forward),
            (self.backward, MoveDirection::Backward),
            (self.left, MoveDirection::Left),
            (self.right, MoveDirection::Right),
        ]
        .into_iter()
        .filter_map(|(held, direction)| held.then_some(direction))
    }
}

/// The most recent step taken and the step that undoes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastMove {
    pub pressed: MoveDirection,
    pub reverse: MoveDirection,
}

impl LastMove {
    pub fn new(pressed: MoveDirection) -> Self {
        Self {
            pressed,
            reverse: pressed.opposite(),
        }
    }
}

/// Applies held keys to the camera, then pushes it back out of any
/// exclusion zone it ended up in.
///
/// Only the last applied direction is remembered, so with several keys held
/// the push-back undoes that one step and nothing else.
#[derive(Clone, Debug)]
pub struct MovementController {
    pub speed: f32,
    zones: Vec<CollisionZone>,
    last_move: Option<LastMove>,
}

impl MovementController {
    pub fn new(speed: f32, zones: Vec<CollisionZone>) -> Self {
        Self {
            speed,
            zones,
            last_move: None,
        }
    }

    pub fn zones(&self) -> &[CollisionZone] {
        &self.zones
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn process(&mut self, camera: &mut Camera, keys: MovementKeys) {
        let mut moved = None;
        for direction in keys.held() {
            camera.move_by(direction, self.speed);
            moved = Some(LastMove::new(direction));
        }

        if let Some(last) = moved {
            self.last_move = Some(last);
            self.resolve(camera, last);
        }
    }

    /// One push-back per zone containing the post-move position.
    pub fn resolve(&self, camera: &mut Camera, last: LastMove) {
        let position = camera.position();
        for zone in &self.zones {
            if zone.contains(position) && last.pressed != last.reverse {
                log::debug!("blocked by {} at {position}", zone.name);
                camera.move_by(last.reverse, self.speed);
            }
        }
    }
}
