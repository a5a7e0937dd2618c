//! Debris physics off the main loop.
//!
//! A fixed pool of bodies is created once and recycled round-robin; the
//! stepper runs on its own thread at a fixed rate and reports positions of
//! active bodies as broadcast messages.

pub mod body;
pub mod error;
pub mod protocol;
pub mod service;
pub mod world;

pub use body::DebrisBody;
pub use error::DebrisError;
pub use protocol::{HostMessage, Point, WorkerMessage};
pub use service::DebrisService;
pub use world::DebrisWorld;
