use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use voxworld_common::Transform;

/// One pooled rigid body. Bodies are created once with the pool and only
/// ever recycled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebrisBody {
    pub id: usize,
    pub transform: Transform,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub active: bool,
}

impl DebrisBody {
    /// Inactive body resting at `sentinel`.
    pub fn parked(id: usize, sentinel: Vec3) -> Self {
        Self {
            id,
            transform: Transform::from_position(sentinel),
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            active: false,
        }
    }

    pub fn park(&mut self, sentinel: Vec3) {
        *self = Self::parked(self.id, sentinel);
    }

    pub fn launch(&mut self, position: Vec3, linear: Vec3, angular: Vec3) {
        self.transform = Transform::from_position(position);
        self.linear_velocity = linear;
        self.angular_velocity = angular;
        self.active = true;
    }

    /// Semi-implicit Euler for the translation; the orientation turns by
    /// `angular_velocity * dt` as a scaled axis.
    pub fn integrate(&mut self, gravity: Vec3, dt: f32) {
        self.linear_velocity += gravity * dt;
        self.transform.position += self.linear_velocity * dt;
        let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
        self.transform.rotation = (spin * self.transform.rotation).normalize();
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}
