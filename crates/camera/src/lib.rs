//! Camera rig: a smoothed first-person view or an orbit around the agent,
//! both expressed in the agent's local up frame so they work on the sphere
//! and on the plane alike.

pub mod rig;

pub use rig::{CameraMode, CameraRig, OrbitAngles, Projection, Viewpoint};
