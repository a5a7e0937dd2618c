use voxworld_common::{AddressingMode, LocomotionConfig};
use voxworld_input::TickIntent;
use voxworld_terrain::Terrain;

use crate::planar;
use crate::report::StepReport;
use crate::spherical::{self, SphericalScratch};
use crate::state::{AgentState, MotionState};

/// Sub-steps run for one update at most. Longer frames are truncated to
/// `max_step * MAX_SUBSTEPS` seconds of simulated time.
pub const MAX_SUBSTEPS: u32 = 8;

/// Per-tick integrator for the agent.
///
/// Each sub-step runs in a fixed order: rotation, heading, lateral movement
/// and collision, vertical settle, publish. The mode is fixed at spawn and
/// follows the terrain's addressing mode.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    state: AgentState,
    scratch: SphericalScratch,
    last: StepReport,
}

impl LocomotionController {
    /// Place a resting agent on `terrain`: on the equator at longitude zero
    /// for a sphere, at the field centre for a plane.
    pub fn spawn(config: LocomotionConfig, terrain: &Terrain) -> Self {
        let field = terrain.field();
        let state = match field.mode() {
            AddressingMode::Spherical => spherical::spawn(field),
            AddressingMode::Planar => planar::spawn(field, &config),
        };
        tracing::debug!(position = ?state.position, mode = ?field.mode(), "agent spawned");
        Self::from_state(config, state)
    }

    /// Resume from an existing state.
    pub fn from_state(config: LocomotionConfig, state: AgentState) -> Self {
        Self {
            config,
            state,
            scratch: SphericalScratch::default(),
            last: StepReport::default(),
        }
    }

    /// Current agent state.
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Tuning used by every update.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Diagnostics of the most recent update.
    pub fn last_step(&self) -> &StepReport {
        &self.last
    }

    /// Advance by `dt` seconds. Non-positive or non-finite `dt` is ignored.
    /// Steps longer than `max_step` are split into equal sub-steps, at most
    /// [`MAX_SUBSTEPS`] of them.
    pub fn update(&mut self, dt: f32, intent: &TickIntent, terrain: &Terrain) -> &AgentState {
        if !(dt > 0.0) || !dt.is_finite() {
            self.last = StepReport::default();
            return &self.state;
        }
        let max_step = self.config.max_step.max(f32::EPSILON);
        let max_frame = max_step * MAX_SUBSTEPS as f32;
        let dt = if dt > max_frame {
            tracing::debug!(dt, max_frame, "long frame truncated");
            max_frame
        } else {
            dt
        };
        let substeps = (dt / max_step).ceil().max(1.0) as u32;
        let h = dt / substeps as f32;

        let mut total = StepReport::default();
        for _ in 0..substeps {
            let previous = self.state;
            let sub = match self.state.motion {
                MotionState::Spherical(_) => spherical::step(
                    &mut self.state,
                    &mut self.scratch,
                    h,
                    intent,
                    terrain.field(),
                    &self.config,
                ),
                MotionState::Planar { .. } => planar::step(
                    &mut self.state,
                    h,
                    intent,
                    terrain.field(),
                    terrain.collision(),
                    &self.config,
                ),
            };
            if !self.state.is_finite() {
                tracing::warn!("non-finite agent state discarded");
                self.state = previous;
                break;
            }
            total.accumulate(sub);
        }
        tracing::trace!(outcome = ?total.outcome, substeps = total.substeps, "locomotion tick");
        self.last = total;
        &self.state
    }
}
