use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Advancing,
    Reversing,
}

impl Heading {
    pub fn flipped(self) -> Self {
        match self {
            Heading::Advancing => Heading::Reversing,
            Heading::Reversing => Heading::Advancing,
        }
    }
}

/// Accumulated float error that still counts as landing on a bound.
const LANDING_TOLERANCE: f32 = 1e-4;

/// One-dimensional triangle wave between `-bound` and `+bound`.
///
/// Every frame moves by exactly one step. A step that lands on a bound flips
/// the heading there; a step that would overshoot it is taken in the other
/// direction instead. Starting a whole number of steps from a bound, a full
/// cycle takes `2 * range / step` frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Oscillator {
    position: f32,
    heading: Heading,
    bound: f32,
    step: f32,
}

impl Oscillator {
    pub fn new(start: f32, heading: Heading, bound: f32, step: f32) -> Self {
        let bound = bound.abs();
        Self {
            position: start.clamp(-bound, bound),
            heading,
            bound,
            step: step.abs(),
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn bound(&self) -> f32 {
        self.bound
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn advance(&mut self) {
        let sign = match self.heading {
            Heading::Advancing => 1.0,
            Heading::Reversing => -1.0,
        };
        let limit = self.bound * sign;
        let next = self.position + self.step * sign;
        let overshoot = (next - limit) * sign;

        if overshoot > LANDING_TOLERANCE {
            self.position -= self.step * sign;
            self.heading = self.heading.flipped();
        } else if overshoot >= -LANDING_TOLERANCE {
            self.position = limit;
            self.heading = self.heading.flipped();
        } else {
            self.position = next;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatrolId {
    Dog,
    Soldier,
}

/// An oscillator laid out in the world: `anchor + axis * position`.
#[derive(Clone, Debug)]
pub struct Patrol {
    pub id: PatrolId,
    pub anchor: Vec3,
    pub axis: Vec3,
    pub oscillator: Oscillator,
}

impl Patrol {
    pub fn translation(&self) -> Vec3 {
        self.anchor + self.axis * self.oscillator.position()
    }

    pub fn heading(&self) -> Heading {
        self.oscillator.heading()
    }
}

#[derive(Clone, Debug)]
pub struct SceneAnimator {
    patrols: Vec<Patrol>,
}

impl Default for SceneAnimator {
    fn default() -> Self {
        Self::new(vec![
            Patrol {
                id: PatrolId::Dog,
                anchor: Vec3::new(-3.0, 0.0, 0.0),
                axis: Vec3::Z,
                oscillator: Oscillator::new(-1.0, Heading::Advancing, 3.0, 0.03),
            },
            Patrol {
                id: PatrolId::Soldier,
                anchor: Vec3::new(0.0, 0.0, -3.0),
                axis: Vec3::X,
                oscillator: Oscillator::new(2.0, Heading::Advancing, 5.0, 0.02),
            },
        ])
    }
}

impl SceneAnimator {
    pub fn new(patrols: Vec<Patrol>) -> Self {
        Self { patrols }
    }

    pub fn advance(&mut self) {
        for patrol in &mut self.patrols {
            patrol.oscillator.advance();
        }
    }

    pub fn patrol(&self, id: PatrolId) -> Option<&Patrol> {
        self.patrols.iter().find(|p| p.id == id)
    }

    pub fn patrols(&self) -> &[Patrol] {
        &self.patrols
    }
}
