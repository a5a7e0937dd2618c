//! Discrete agent-versus-voxel separation for planar mode.
//!
//! The agent is a vertical capsule approximated by a cylinder of `radius`
//! spanning `[feet, head]`. Voxel `(i, y, j)` is centred on
//! `(i * size, j * size)` horizontally and spans `[y * size, (y + 1) * size]`.
//! Overlaps are resolved one voxel at a time in ascending `(x, y, z)` order;
//! a later push may leave a residual overlap with an earlier voxel.

use glam::{IVec3, Vec2};
use voxworld_terrain::CollisionIndex;

/// Agent cylinder used for overlap tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentVolume {
    pub radius: f32,
    pub feet: f32,
    pub head: f32,
}

/// Push `xz` out of every solid voxel it overlaps. Returns the corrected
/// position and the number of pushes applied.
pub fn resolve_overlaps(
    xz: Vec2,
    agent: AgentVolume,
    voxel_size: f32,
    solids: &CollisionIndex,
) -> (Vec2, u32) {
    let half = voxel_size * 0.5;
    let min_dist = agent.radius + half;
    let reach = (min_dist / voxel_size).ceil() as i32 + 1;

    let cx = (xz.x / voxel_size).round() as i32;
    let cz = (xz.y / voxel_size).round() as i32;
    let y_lo = (agent.feet / voxel_size).floor() as i32 - 1;
    let y_hi = (agent.head / voxel_size).floor() as i32;

    let mut p = xz;
    let mut pushes = 0;
    for i in cx - reach..=cx + reach {
        for y in y_lo..=y_hi {
            let bottom = y as f32 * voxel_size;
            let top = bottom + voxel_size;
            if !(agent.feet < top && agent.head > bottom) {
                continue;
            }
            for j in cz - reach..=cz + reach {
                if !solids.contains(IVec3::new(i, y, j)) {
                    continue;
                }
                let center = Vec2::new(i as f32 * voxel_size, j as f32 * voxel_size);
                let delta = p - center;
                let dist = delta.length();
                if dist >= min_dist {
                    continue;
                }
                p = if dist < 1e-6 {
                    center + Vec2::X * min_dist
                } else {
                    p + delta / dist * (min_dist - dist)
                };
                pushes += 1;
            }
        }
    }
    (p, pushes)
}
