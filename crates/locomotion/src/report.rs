use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What happened to the lateral part of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateralOutcome {
    #[default]
    Idle,
    Moved,
    /// The candidate rose more than `step_max` above the current ring.
    Blocked,
}

/// Diagnostics for the last [`update`](crate::LocomotionController::update).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepReport {
    /// Committed tangent displacement, summed over sub-steps. On the sphere
    /// this is in unit-sphere arc units.
    pub tangent_move: Vec3,
    pub outcome: LateralOutcome,
    /// Voxel pushes applied in planar mode.
    pub pushes: u32,
    /// Ring-sampled surface rise of the last spherical candidate.
    pub rise: f32,
    pub substeps: u32,
}

impl StepReport {
    /// Fold a sub-step report into the running total.
    pub(crate) fn accumulate(&mut self, sub: StepReport) {
        self.tangent_move += sub.tangent_move;
        self.pushes += sub.pushes;
        self.rise = sub.rise;
        self.substeps += 1;
        self.outcome = match (self.outcome, sub.outcome) {
            (LateralOutcome::Blocked, _) | (_, LateralOutcome::Blocked) => LateralOutcome::Blocked,
            (LateralOutcome::Moved, _) | (_, LateralOutcome::Moved) => LateralOutcome::Moved,
            _ => LateralOutcome::Idle,
        };
    }
}
