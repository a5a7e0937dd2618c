use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use voxworld_common::CameraConfig;
use voxworld_common::math::{REFERENCE_UP, safe_normalize, tangent_basis};
use voxworld_input::CameraIntent;
use voxworld_locomotion::AgentState;

/// Which way the rig follows the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    #[default]
    FirstPerson,
    Orbit,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::FirstPerson => CameraMode::Orbit,
            CameraMode::Orbit => CameraMode::FirstPerson,
        }
    }
}

/// Camera pose handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Viewpoint {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn forward(&self) -> Vec3 {
        safe_normalize(self.target - self.eye, Vec3::NEG_Z)
    }
}

/// Perspective parameters for turning a [`Viewpoint`] into clip space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.05,
            far: 500.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self, view: &Viewpoint) -> Mat4 {
        self.matrix() * view.view_matrix()
    }
}

/// Spherical offset of the orbit camera around the agent, in the agent's
/// local frame (polar angle measured from the agent normal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitAngles {
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
}

/// Smoothed camera following an [`AgentState`].
///
/// The eye moves a fixed fraction `lerp_factor` of the remaining distance per
/// update, independent of frame time. The first update after construction
/// or a mode switch snaps instead.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    mode: CameraMode,
    orbit: OrbitAngles,
    eye: Option<Vec3>,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        let orbit = OrbitAngles {
            azimuth: 0.0,
            polar: std::f32::consts::FRAC_PI_4,
            distance: config.initial_distance.clamp(config.min_distance, config.max_distance),
        };
        Self {
            config,
            mode: CameraMode::FirstPerson,
            orbit,
            eye: None,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode != self.mode {
            tracing::debug!(?mode, "camera mode changed");
            self.mode = mode;
            self.eye = None;
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn orbit(&self) -> OrbitAngles {
        self.orbit
    }

    /// Fold pointer drag and wheel input into the orbit angles. Only affects
    /// the orbit mode, but is tracked in both so switching keeps the angles.
    pub fn apply_intent(&mut self, intent: &CameraIntent) {
        if intent.toggle_mode {
            self.toggle_mode();
        }
        if intent.drag.is_finite() {
            let s = self.config.orbit_sensitivity;
            self.orbit.azimuth =
                (self.orbit.azimuth - intent.drag.x * s).rem_euclid(std::f32::consts::TAU);
            let margin = self.config.polar_margin;
            self.orbit.polar = (self.orbit.polar - intent.drag.y * s)
                .clamp(margin, std::f32::consts::PI - margin);
        }
        if intent.zoom.is_finite() {
            self.orbit.distance = (self.orbit.distance + intent.zoom * self.config.zoom_speed)
                .clamp(self.config.min_distance, self.config.max_distance);
        }
    }

    /// Viewpoint for this tick.
    pub fn update(&mut self, agent: &AgentState) -> Viewpoint {
        let up = safe_normalize(agent.normal, REFERENCE_UP);
        let (desired, target) = match self.mode {
            CameraMode::FirstPerson => (
                agent.position + up * self.config.eye_offset,
                agent.position + agent.look_direction() * self.config.look_ahead,
            ),
            CameraMode::Orbit => (agent.position + self.orbit_offset(up), agent.position),
        };

        let eye = match self.eye {
            Some(eye) if desired.is_finite() => eye.lerp(desired, self.config.lerp_factor),
            Some(eye) => eye,
            None if desired.is_finite() => desired,
            None => agent.position,
        };
        self.eye = Some(eye);
        Viewpoint { eye, target, up }
    }

    fn orbit_offset(&self, up: Vec3) -> Vec3 {
        let (east, north) = tangent_basis(up, REFERENCE_UP);
        let OrbitAngles {
            azimuth,
            polar,
            distance,
        } = self.orbit;
        let horizontal = east * azimuth.cos() + north * azimuth.sin();
        (horizontal * polar.sin() + up * polar.cos()) * distance
    }
}
