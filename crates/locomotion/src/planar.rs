//! Walking on the bounded plane: yaw/pitch steering, yaw-relative movement,
//! per-voxel push-out and a direct height snap.

use glam::{Vec2, Vec3};
use voxworld_common::LocomotionConfig;
use voxworld_input::TickIntent;
use voxworld_terrain::{CollisionIndex, SurfaceField};

use crate::report::{LateralOutcome, StepReport};
use crate::state::{AgentState, MotionState};
use crate::voxel_collision::{AgentVolume, resolve_overlaps};

/// Heading for `yaw`; yaw 0 faces `-Z`, positive yaw turns left.
pub fn heading(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Right-hand vector for `yaw`.
pub fn right(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

pub(crate) fn step(
    state: &mut AgentState,
    dt: f32,
    intent: &TickIntent,
    field: &SurfaceField,
    solids: &CollisionIndex,
    config: &LocomotionConfig,
) -> StepReport {
    let MotionState::Planar { mut yaw, mut pitch } = state.motion else {
        return StepReport::default();
    };

    let rotation = intent.rotation;
    if rotation.yaw.is_finite() {
        yaw = (yaw + rotation.yaw * config.angular_rate * dt).rem_euclid(std::f32::consts::TAU);
    }
    if rotation.pitch.is_finite() {
        pitch = (pitch + rotation.pitch * config.angular_rate * dt)
            .clamp(config.pitch_min, config.pitch_max);
    }
    let forward = heading(yaw);

    let dir = intent.movement.direction();
    let tangent_move = (forward * dir.y + right(yaw) * dir.x) * config.planar_speed * dt;

    let mut report = StepReport::default();
    let mut xz = Vec2::new(state.position.x, state.position.z);
    if tangent_move.length_squared() > 0.0 {
        xz += Vec2::new(tangent_move.x, tangent_move.z);
        report.tangent_move = tangent_move;
        report.outcome = LateralOutcome::Moved;
    }
    xz = clamp_to_bounds(xz, field);

    let feet = field.query(Vec3::new(xz.x, 0.0, xz.y));
    let volume = AgentVolume {
        radius: config.agent_radius,
        feet,
        head: feet + config.agent_height,
    };
    let (resolved, pushes) = resolve_overlaps(xz, volume, field.voxel_size(), solids);
    if pushes > 0 {
        tracing::trace!(pushes, "voxel overlap resolved");
    }
    report.pushes = pushes;

    let ground = Vec3::new(resolved.x, 0.0, resolved.y);
    state.position = Vec3::new(resolved.x, field.query(ground) + config.eye_height, resolved.y);
    state.forward = forward;
    state.normal = Vec3::Y;
    state.motion = MotionState::Planar { yaw, pitch };
    report
}

/// Keep the agent over the field, allowing half a voxel of overhang.
fn clamp_to_bounds(xz: Vec2, field: &SurfaceField) -> Vec2 {
    let vs = field.voxel_size();
    let max = Vec2::new(
        (field.columns() - 1) as f32 * vs,
        (field.rows() - 1) as f32 * vs,
    ) + vs * 0.5;
    let min = Vec2::splat(-vs * 0.5);
    if !xz.is_finite() {
        return (min + max) * 0.5;
    }
    xz.clamp(min, max)
}

/// Standing at the field centre, facing `-Z`.
pub(crate) fn spawn(field: &SurfaceField, config: &LocomotionConfig) -> AgentState {
    let vs = field.voxel_size();
    let x = (field.columns() - 1) as f32 * 0.5 * vs;
    let z = (field.rows() - 1) as f32 * 0.5 * vs;
    let ground = field.query(Vec3::new(x, 0.0, z));
    AgentState {
        position: Vec3::new(x, ground + config.eye_height, z),
        forward: heading(0.0),
        normal: Vec3::Y,
        motion: MotionState::Planar {
            yaw: 0.0,
            pitch: 0.0,
        },
    }
}
