//! Input intents: the boundary between device handling and the simulation.
//!
//! # Invariants
//! - The simulation only ever sees `Action`s and `TickIntent`s.
//! - Axis values reaching the simulation are finite and within `[-1, 1]`.

pub mod action;
pub mod intent;

pub use action::Action;
pub use intent::{CameraIntent, IntentFrame, MoveIntent, RotateIntent, TickIntent};
