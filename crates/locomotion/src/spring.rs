use serde::{Deserialize, Serialize};

/// Scalar spring-damper pulling a radial offset toward a target.
///
/// Integrated with semi-implicit Euler (velocity first), which stays stable
/// while `dt^2 k + 2 dt c < 4`; `LocomotionConfig::validate` enforces this at
/// `max_step` and the controller never steps longer than that.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RadialSpring {
    pub offset: f32,
    pub velocity: f32,
}

impl RadialSpring {
    pub fn at_rest(offset: f32) -> Self {
        Self {
            offset,
            velocity: 0.0,
        }
    }

    pub fn step(&mut self, target: f32, dt: f32, stiffness: f32, damping: f32) {
        let accel = (target - self.offset) * stiffness - self.velocity * damping;
        let velocity = self.velocity + accel * dt;
        let offset = self.offset + velocity * dt;
        if velocity.is_finite() && offset.is_finite() {
            self.velocity = velocity;
            self.offset = offset;
        } else {
            *self = Self::at_rest(target);
        }
    }
}
