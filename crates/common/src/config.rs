//! Simulation configuration.
//!
//! Every section has a `Default` carrying the reference constants, and every
//! field is optional in YAML: missing keys fall back to the defaults.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::AddressingMode;

/// Edge length of the planar world, in cells.
pub const WORLD_SIZE: u32 = 48;

/// Fixed debris pool size.
pub const DEBRIS_POOL_SIZE: usize = 12;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub locomotion: LocomotionConfig,
    pub camera: CameraConfig,
    pub debris: DebrisConfig,
}

impl SimConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.locomotion.validate()?;
        self.camera.validate()?;
        self.debris.validate()
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

/// World generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    pub mode: AddressingMode,
    /// Planar edge length in cells.
    pub world_size: u32,
    /// Spherical longitude count (wraps).
    pub sphere_columns: u32,
    /// Spherical latitude count (clamps), pole to pole inclusive.
    pub sphere_rows: u32,
    pub voxel_size: f32,
    pub base_radius: f32,
    /// Number of small isolated solid blocks scattered after the quarries.
    pub isolated_blocks: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mode: AddressingMode::Spherical,
            world_size: WORLD_SIZE,
            sphere_columns: 64,
            sphere_rows: 33,
            voxel_size: 0.45,
            base_radius: 4.8,
            isolated_blocks: 10,
        }
    }
}

impl WorldConfig {
    /// Grid dimensions `(columns, rows)` for the configured addressing mode.
    pub fn grid_dims(&self) -> (u32, u32) {
        match self.mode {
            AddressingMode::Spherical => (self.sphere_columns, self.sphere_rows),
            AddressingMode::Planar => (self.world_size, self.world_size),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (cols, rows) = self.grid_dims();
        if cols < 8 || rows < 8 {
            return Err(invalid(format!("grid {cols}x{rows} is smaller than 8x8")));
        }
        if !(self.voxel_size > 0.0) {
            return Err(invalid("voxel_size must be positive"));
        }
        if !(self.base_radius > 0.0) {
            return Err(invalid("base_radius must be positive"));
        }
        Ok(())
    }
}

/// Agent movement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Planar speed, world units per second.
    pub planar_speed: f32,
    /// Spherical speed, unit-sphere arc per second.
    pub sphere_speed: f32,
    pub agent_radius: f32,
    pub agent_height: f32,
    /// Planar eye height above the surface.
    pub eye_height: f32,
    /// Largest surface rise that still counts as a step.
    pub step_max: f32,
    /// Rises smaller than this are cosmetic and ignored.
    pub decal_ignore: f32,
    pub ring_samples: usize,
    pub spring_constant: f32,
    pub damping_constant: f32,
    /// Largest integration step; longer frames are sub-stepped.
    pub max_step: f32,
    /// Planar yaw/pitch rate, radians per second at full intent.
    pub angular_rate: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        let spring_constant = 60.0_f32;
        Self {
            planar_speed: 4.0,
            sphere_speed: 0.6,
            agent_radius: 0.3,
            agent_height: 1.6,
            eye_height: 1.5,
            step_max: 0.5,
            decal_ignore: 0.05,
            ring_samples: 8,
            spring_constant,
            // Critical damping: c = 2 * sqrt(k).
            damping_constant: 2.0 * spring_constant.sqrt(),
            max_step: 0.05,
            angular_rate: 2.0,
            pitch_min: -60.0_f32.to_radians(),
            pitch_max: 80.0_f32.to_radians(),
        }
    }
}

impl LocomotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.agent_radius > 0.0) || !(self.agent_height > 0.0) {
            return Err(invalid("agent dimensions must be positive"));
        }
        if self.ring_samples < 3 {
            return Err(invalid("ring_samples must be at least 3"));
        }
        if !(self.decal_ignore >= 0.0) || self.decal_ignore > self.step_max {
            return Err(invalid("decal_ignore must lie in [0, step_max]"));
        }
        if self.pitch_min >= self.pitch_max {
            return Err(invalid("pitch_min must be below pitch_max"));
        }
        if !(self.max_step > 0.0) {
            return Err(invalid("max_step must be positive"));
        }
        // Semi-implicit Euler on x'' = -k x - c x' is stable while
        // dt^2 k + 2 dt c < 4 and dt c < 2.
        let dt = self.max_step;
        let k = self.spring_constant;
        let c = self.damping_constant;
        if !(k > 0.0) || !(c > 0.0) || dt * dt * k + 2.0 * dt * c >= 4.0 || dt * c >= 2.0 {
            return Err(invalid(format!(
                "spring k={k} c={c} is unstable at max_step={dt}"
            )));
        }
        Ok(())
    }
}

/// Camera rig parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye_offset: f32,
    pub look_ahead: f32,
    /// Per-tick smoothing factor in (0, 1].
    pub lerp_factor: f32,
    pub orbit_sensitivity: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub initial_distance: f32,
    /// Keeps the orbit polar angle away from the poles.
    pub polar_margin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye_offset: 0.6,
            look_ahead: 2.0,
            lerp_factor: 0.2,
            orbit_sensitivity: 0.005,
            zoom_speed: 0.5,
            min_distance: 2.0,
            max_distance: 30.0,
            initial_distance: 8.0,
            polar_margin: 0.1,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lerp_factor > 0.0 && self.lerp_factor <= 1.0) {
            return Err(invalid("lerp_factor must lie in (0, 1]"));
        }
        if !(self.min_distance > 0.0) || self.min_distance > self.max_distance {
            return Err(invalid("orbit distance range is empty"));
        }
        if !(self.polar_margin > 0.0) || self.polar_margin >= std::f32::consts::FRAC_PI_2 {
            return Err(invalid("polar_margin must lie in (0, pi/2)"));
        }
        Ok(())
    }
}

/// Debris worker parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebrisConfig {
    pub pool_size: usize,
    pub tick_ms: u64,
    pub gravity: Vec3,
    /// Bodies below this height are deactivated.
    pub floor_y: f32,
    /// Where inactive bodies are parked.
    pub sentinel: Vec3,
    /// Horizontal launch speed bound.
    pub max_lateral_speed: f32,
    pub min_upward_speed: f32,
    pub max_upward_speed: f32,
    pub max_angular_speed: f32,
    pub seed: u64,
}

impl Default for DebrisConfig {
    fn default() -> Self {
        Self {
            pool_size: DEBRIS_POOL_SIZE,
            tick_ms: 33,
            gravity: Vec3::new(0.0, -9.82, 0.0),
            floor_y: -20.0,
            sentinel: Vec3::new(0.0, -1000.0, 0.0),
            max_lateral_speed: 2.0,
            min_upward_speed: 2.0,
            max_upward_speed: 5.0,
            max_angular_speed: 6.0,
            seed: 7,
        }
    }
}

impl DebrisConfig {
    /// Fixed step in seconds derived from `tick_ms`.
    pub fn fixed_dt(&self) -> f32 {
        self.tick_ms as f32 / 1000.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(invalid("debris pool must hold at least one body"));
        }
        if self.tick_ms == 0 {
            return Err(invalid("tick_ms must be positive"));
        }
        if self.min_upward_speed > self.max_upward_speed {
            return Err(invalid("min_upward_speed exceeds max_upward_speed"));
        }
        if self.sentinel.y >= self.floor_y {
            return Err(invalid("sentinel must sit below floor_y"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn default_damping_is_critical() {
        let c = LocomotionConfig::default();
        assert!((c.damping_constant - 2.0 * c.spring_constant.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = SimConfig::from_yaml_str(
            "world:\n  seed: 9\n  mode: planar\ndebris:\n  tick_ms: 20\n",
        )
        .unwrap();
        assert_eq!(config.world.seed, 9);
        assert_eq!(config.world.mode, AddressingMode::Planar);
        assert_eq!(config.world.world_size, WORLD_SIZE);
        assert_eq!(config.debris.tick_ms, 20);
        assert_eq!(config.debris.pool_size, DEBRIS_POOL_SIZE);
    }

    #[test]
    fn unstable_spring_is_rejected() {
        let mut config = SimConfig::default();
        config.locomotion.max_step = 0.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn inverted_pitch_is_rejected() {
        let mut config = SimConfig::default();
        config.locomotion.pitch_min = 1.0;
        config.locomotion.pitch_max = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "camera:\n  min_distance: 3.0\n  max_distance: 12.0").unwrap();
        let config = SimConfig::load(file.path()).unwrap();
        assert_eq!(config.camera.min_distance, 3.0);
        assert_eq!(config.camera.max_distance, 12.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimConfig::load("/nonexistent/voxworld.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn grid_dims_follow_mode() {
        let mut world = WorldConfig::default();
        assert_eq!(world.grid_dims(), (64, 33));
        world.mode = AddressingMode::Planar;
        assert_eq!(world.grid_dims(), (WORLD_SIZE, WORLD_SIZE));
    }
}
