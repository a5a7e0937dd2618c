//! Surface-constrained agent locomotion.
//!
//! Two strategies share one controller. On the sphere, lateral moves are
//! accepted or rejected by comparing ring-sampled surface radii, and the
//! radius settles through a critically damped spring. On the plane, the
//! agent is pushed out of individual solid voxels and snapped to the surface.

pub mod controller;
pub mod planar;
pub mod report;
mod spherical;
pub mod spring;
pub mod state;
pub mod voxel_collision;

pub use controller::{LocomotionController, MAX_SUBSTEPS};
pub use report::{LateralOutcome, StepReport};
pub use spring::RadialSpring;
pub use state::{AgentState, MotionState};
pub use voxel_collision::{AgentVolume, resolve_overlaps};
