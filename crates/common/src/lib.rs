//! Shared value types, configuration and math helpers.
//!
//! # Invariants
//! - Heights are unsigned; nothing in this crate can produce a negative height.
//! - Vector helpers fall back to a fixed axis instead of returning NaN.

pub mod config;
pub mod interaction;
pub mod math;
pub mod types;

pub use config::{
    CameraConfig, ConfigError, DEBRIS_POOL_SIZE, DebrisConfig, LocomotionConfig, SimConfig,
    WORLD_SIZE, WorldConfig,
};
pub use interaction::{InteractionBackend, compute_interaction, interaction_backend};
pub use types::{AddressingMode, Cell, Material, Transform};
