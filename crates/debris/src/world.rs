use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voxworld_common::DebrisConfig;

use crate::body::DebrisBody;

/// Fixed pool of debris bodies stepped at a fixed rate.
///
/// Spawns take pool slots strictly round-robin, whether or not the slot's
/// body is still falling; the newest spawn always wins.
#[derive(Debug, Clone)]
pub struct DebrisWorld {
    config: DebrisConfig,
    bodies: Vec<DebrisBody>,
    next_slot: usize,
    rng: ChaCha8Rng,
    ticks: u64,
}

impl DebrisWorld {
    pub fn new(config: DebrisConfig) -> Self {
        let pool = config.pool_size.max(1);
        let bodies = (0..pool)
            .map(|id| DebrisBody::parked(id, config.sentinel))
            .collect();
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            bodies,
            next_slot: 0,
            rng,
            ticks: 0,
        }
    }

    /// All pooled bodies, active or parked, in slot order.
    pub fn bodies(&self) -> &[DebrisBody] {
        &self.bodies
    }

    /// Fixed number of slots.
    pub fn pool_size(&self) -> usize {
        self.bodies.len()
    }

    /// Bodies currently simulated.
    pub fn active_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.active).count()
    }

    /// Slot the next spawn will take.
    pub fn next_slot(&self) -> usize {
        self.next_slot
    }

    /// Fixed steps taken since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Launch one body per position. Returns the slots used, in order.
    /// Non-finite positions are skipped without consuming a slot.
    pub fn spawn(&mut self, positions: &[Vec3]) -> Vec<usize> {
        let mut used = Vec::with_capacity(positions.len());
        for &position in positions {
            if !position.is_finite() {
                tracing::warn!(?position, "ignoring non-finite debris spawn");
                continue;
            }
            let slot = self.next_slot;
            self.next_slot = (slot + 1) % self.bodies.len();

            let linear = Vec3::new(
                bounded(&mut self.rng, -self.config.max_lateral_speed, self.config.max_lateral_speed),
                bounded(&mut self.rng, self.config.min_upward_speed, self.config.max_upward_speed),
                bounded(&mut self.rng, -self.config.max_lateral_speed, self.config.max_lateral_speed),
            );
            let w = self.config.max_angular_speed;
            let angular = Vec3::new(
                bounded(&mut self.rng, -w, w),
                bounded(&mut self.rng, -w, w),
                bounded(&mut self.rng, -w, w),
            );

            let body = &mut self.bodies[slot];
            if body.active {
                tracing::debug!(slot, "preempting active debris body");
            }
            body.launch(position, linear, angular);
            used.push(slot);
        }
        used
    }

    /// Advance one fixed step. Bodies that drop below `floor_y` are parked.
    /// Returns the positions of the bodies still active, or `None` when the
    /// pool is idle.
    pub fn step(&mut self) -> Option<Vec<Vec3>> {
        let dt = self.config.fixed_dt();
        let gravity = self.config.gravity;
        let floor = self.config.floor_y;
        let sentinel = self.config.sentinel;
        self.ticks += 1;

        let mut positions = Vec::new();
        for body in self.bodies.iter_mut().filter(|b| b.active) {
            body.integrate(gravity, dt);
            let p = body.position();
            if p.y < floor || !p.is_finite() {
                body.park(sentinel);
                continue;
            }
            positions.push(p);
        }
        if positions.is_empty() {
            None
        } else {
            Some(positions)
        }
    }
}

fn bounded(rng: &mut ChaCha8Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}
