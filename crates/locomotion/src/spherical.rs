//! Walking on the sphere: tangent-plane movement, ring-sampled step/wall
//! detection and the radial spring.

use glam::Vec3;
use voxworld_common::LocomotionConfig;
use voxworld_common::math::{REFERENCE_UP, project_on_plane, safe_normalize, tangent_basis};
use voxworld_input::TickIntent;
use voxworld_terrain::SurfaceField;

use crate::report::{LateralOutcome, StepReport};
use crate::spring::RadialSpring;
use crate::state::{AgentState, MotionState};

/// Reusable buffers for the spherical step. Owned by the controller so the
/// per-tick path does not allocate.
#[derive(Debug, Default, Clone)]
pub(crate) struct SphericalScratch {
    ring: Vec<Vec3>,
}

impl SphericalScratch {
    /// Highest surface radius on a ring of `angular_radius` around `center`.
    fn ring_max(
        &mut self,
        field: &SurfaceField,
        center: Vec3,
        angular_radius: f32,
        samples: usize,
    ) -> f32 {
        let (east, north) = tangent_basis(center, REFERENCE_UP);
        let spread = angular_radius.tan();
        self.ring.clear();
        for k in 0..samples {
            let angle = std::f32::consts::TAU * k as f32 / samples as f32;
            let offset = (east * angle.cos() + north * angle.sin()) * spread;
            self.ring.push(safe_normalize(center + offset, center));
        }
        self.ring
            .iter()
            .map(|&p| field.query(p))
            .fold(field.query(center), f32::max)
    }
}

pub(crate) fn step(
    state: &mut AgentState,
    scratch: &mut SphericalScratch,
    dt: f32,
    intent: &TickIntent,
    field: &SurfaceField,
    config: &LocomotionConfig,
) -> StepReport {
    let MotionState::Spherical(mut spring) = state.motion else {
        return StepReport::default();
    };

    let normal = safe_normalize(state.position, REFERENCE_UP);
    let (east, north) = tangent_basis(normal, REFERENCE_UP);
    let dir = intent.movement.direction();
    let tangent = north * dir.y + east * dir.x;
    let tangent_move = tangent * config.sphere_speed * dt;

    let mut report = StepReport::default();
    let mut next_normal = normal;
    if tangent_move.length_squared() > 0.0 {
        let candidate = safe_normalize(normal + tangent_move, normal);
        let angular_radius = config.agent_radius / field.base_radius().max(f32::EPSILON);
        let current_max = scratch.ring_max(field, normal, angular_radius, config.ring_samples);
        let candidate_max =
            scratch.ring_max(field, candidate, angular_radius, config.ring_samples);

        let mut rise = candidate_max - current_max;
        if rise.abs() < config.decal_ignore {
            rise = 0.0;
        }
        report.rise = rise;
        if rise <= config.step_max {
            next_normal = candidate;
            report.tangent_move = tangent_move;
            report.outcome = LateralOutcome::Moved;
        } else {
            report.outcome = LateralOutcome::Blocked;
            tracing::trace!(rise, "lateral move blocked");
        }
    }

    let target = field.query(next_normal) - field.base_radius();
    spring.step(
        target,
        dt,
        config.spring_constant,
        config.damping_constant,
    );

    let heading = if report.outcome == LateralOutcome::Moved {
        tangent
    } else {
        state.forward
    };
    let (_, next_north) = tangent_basis(next_normal, REFERENCE_UP);
    state.forward = safe_normalize(project_on_plane(heading, next_normal), next_north);
    state.normal = next_normal;
    state.position = next_normal * (field.base_radius() + spring.offset);
    state.motion = MotionState::Spherical(spring);
    report
}

/// Resting state at the equator, longitude zero.
pub(crate) fn spawn(field: &SurfaceField) -> AgentState {
    let lat = (field.rows().saturating_sub(1)) as f32 / 2.0;
    let normal = safe_normalize(field.spherical_direction(0.0, lat), REFERENCE_UP);
    let radius = field.query(normal);
    let (_, north) = tangent_basis(normal, REFERENCE_UP);
    AgentState {
        position: normal * radius,
        forward: north,
        normal,
        motion: MotionState::Spherical(RadialSpring::at_rest(radius - field.base_radius())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxworld_common::{AddressingMode, Cell, Material};
    use voxworld_input::MoveIntent;

    fn flat_sphere(height: u32) -> SurfaceField {
        let mut field = SurfaceField::new(AddressingMode::Spherical, 64, 33, 0.45, 4.8);
        for j in 0..33 {
            for i in 0..64 {
                field.set_cell(i, j, Cell::new(height, Material::Grass));
            }
        }
        field
    }

    fn walking(forward: f32, strafe: f32) -> TickIntent {
        TickIntent {
            movement: MoveIntent::new(forward, strafe),
            ..TickIntent::default()
        }
    }

    #[test]
    fn spawn_rests_on_surface() {
        let field = flat_sphere(2);
        let state = spawn(&field);
        assert!((state.position.length() - (4.8 + 2.0 * 0.45)).abs() < 1e-4);
        assert!(state.normal.y.abs() < 1e-4);
        assert!(state.forward.dot(state.normal).abs() < 1e-5);
    }

    #[test]
    fn flat_ground_moves_without_rise() {
        let field = flat_sphere(1);
        let mut state = spawn(&field);
        let mut scratch = SphericalScratch::default();
        let config = LocomotionConfig::default();
        let report = step(&mut state, &mut scratch, 1.0 / 60.0, &walking(1.0, 0.0), &field, &config);
        assert_eq!(report.outcome, LateralOutcome::Moved);
        assert_eq!(report.rise, 0.0);
        assert!(state.normal.y > 0.0, "forward heads north");
    }

    /// Flat sphere whose northern hemisphere sits one voxel higher, so a
    /// northward step off the equator sees a small positive rise.
    fn northern_ledge() -> SurfaceField {
        let mut field = flat_sphere(1);
        for j in 0..16 {
            for i in 0..64 {
                field.set_height(i, j, 2);
            }
        }
        field
    }

    /// Ring-max rise the first northward tick from spawn will measure.
    fn northward_rise(field: &SurfaceField, config: &LocomotionConfig, dt: f32) -> f32 {
        let normal = spawn(field).normal;
        let (_, north) = tangent_basis(normal, REFERENCE_UP);
        let candidate = safe_normalize(normal + north * config.sphere_speed * dt, normal);
        let radius = config.agent_radius / field.base_radius();
        let mut scratch = SphericalScratch::default();
        let current = scratch.ring_max(field, normal, radius, config.ring_samples);
        scratch.ring_max(field, candidate, radius, config.ring_samples) - current
    }

    #[test]
    fn rise_inside_decal_band_counts_as_flat() {
        let field = northern_ledge();
        let dt = 1.0 / 60.0;
        let rise = northward_rise(&field, &LocomotionConfig::default(), dt);
        assert!(rise > 0.0);

        let config = LocomotionConfig {
            decal_ignore: rise * 2.0,
            step_max: rise * 4.0,
            ..LocomotionConfig::default()
        };
        let mut state = spawn(&field);
        let mut scratch = SphericalScratch::default();
        let report = step(&mut state, &mut scratch, dt, &walking(1.0, 0.0), &field, &config);
        assert_eq!(report.rise, 0.0);
        assert_eq!(report.outcome, LateralOutcome::Moved);
    }

    #[test]
    fn rise_just_under_step_max_is_climbed() {
        let field = northern_ledge();
        let dt = 1.0 / 60.0;
        let rise = northward_rise(&field, &LocomotionConfig::default(), dt);
        let config = LocomotionConfig {
            decal_ignore: 0.0,
            step_max: rise * 1.05,
            ..LocomotionConfig::default()
        };
        let mut state = spawn(&field);
        let before = state.normal;
        let mut scratch = SphericalScratch::default();
        let report = step(&mut state, &mut scratch, dt, &walking(1.0, 0.0), &field, &config);
        assert_eq!(report.outcome, LateralOutcome::Moved);
        assert!((report.rise - rise).abs() < 1e-5);
        assert!(state.normal.y > before.y);
    }

    #[test]
    fn rise_just_over_step_max_is_blocked() {
        let field = northern_ledge();
        let dt = 1.0 / 60.0;
        let rise = northward_rise(&field, &LocomotionConfig::default(), dt);
        let config = LocomotionConfig {
            decal_ignore: 0.0,
            step_max: rise * 0.95,
            ..LocomotionConfig::default()
        };
        let mut state = spawn(&field);
        let before = state.normal;
        let mut scratch = SphericalScratch::default();
        let report = step(&mut state, &mut scratch, dt, &walking(1.0, 0.0), &field, &config);
        assert_eq!(report.outcome, LateralOutcome::Blocked);
        assert_eq!(report.tangent_move, Vec3::ZERO);
        assert_eq!(state.normal, before);
    }

    #[test]
    fn idle_reports_idle_and_keeps_normal() {
        let field = flat_sphere(1);
        let mut state = spawn(&field);
        let before = state.normal;
        let mut scratch = SphericalScratch::default();
        let report = step(
            &mut state,
            &mut scratch,
            1.0 / 60.0,
            &TickIntent::default(),
            &field,
            &LocomotionConfig::default(),
        );
        assert_eq!(report.outcome, LateralOutcome::Idle);
        assert_eq!(state.normal, before);
    }

    #[test]
    fn ring_buffer_is_reused() {
        let field = flat_sphere(1);
        let mut scratch = SphericalScratch::default();
        scratch.ring_max(&field, Vec3::X, 0.05, 8);
        let cap = scratch.ring.capacity();
        for _ in 0..10 {
            scratch.ring_max(&field, Vec3::Z, 0.05, 8);
        }
        assert_eq!(scratch.ring.capacity(), cap);
        assert_eq!(scratch.ring.len(), 8);
    }

    #[test]
    fn settles_into_pit_over_time() {
        let mut field = flat_sphere(3);
        let mut state = spawn(&field);
        for j in 0..33 {
            for i in 0..64 {
                field.set_height(i, j, 0);
            }
        }
        let mut scratch = SphericalScratch::default();
        let config = LocomotionConfig::default();
        for _ in 0..240 {
            step(&mut state, &mut scratch, 1.0 / 60.0, &TickIntent::default(), &field, &config);
        }
        assert!((state.position.length() - 4.8).abs() < 1e-2);
    }
}
