use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::spring::RadialSpring;

/// Mode-specific integrator state carried with the agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionState {
    /// Radial offset above the base radius and its velocity.
    Spherical(RadialSpring),
    /// Heading angles in radians.
    Planar { yaw: f32, pitch: f32 },
}

/// Published agent pose, read by the camera rig and the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub position: Vec3,
    /// Unit heading, tangent to the surface.
    pub forward: Vec3,
    /// Unit surface normal ("up" for the agent).
    pub normal: Vec3,
    pub motion: MotionState,
}

impl AgentState {
    /// Direction the agent looks: the heading tilted by pitch on the plane,
    /// the heading itself on the sphere.
    pub fn look_direction(&self) -> Vec3 {
        match self.motion {
            MotionState::Planar { pitch, .. } => {
                self.forward * pitch.cos() + self.normal * pitch.sin()
            }
            MotionState::Spherical(_) => self.forward,
        }
    }

    pub fn is_finite(&self) -> bool {
        let motion_ok = match self.motion {
            MotionState::Spherical(s) => s.offset.is_finite() && s.velocity.is_finite(),
            MotionState::Planar { yaw, pitch } => yaw.is_finite() && pitch.is_finite(),
        };
        self.position.is_finite() && self.forward.is_finite() && self.normal.is_finite() && motion_ok
    }
}
