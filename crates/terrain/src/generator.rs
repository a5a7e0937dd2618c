use glam::IVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voxworld_common::{Cell, Material, WorldConfig};

use crate::arena::VoxelRecord;
use crate::field::SurfaceField;
use crate::rng::SeedRng;
use crate::terrain::Terrain;

/// Largest height produced by the noise mapping, before features.
pub const MAX_NOISE_HEIGHT: u32 = 6;

/// Map a noise value in `[0, 1)` to a material band.
pub fn classify(noise: f64) -> Material {
    match noise {
        n if n < 0.30 => Material::Ocean,
        n if n < 0.40 => Material::Sand,
        n if n < 0.65 => Material::Grass,
        n if n < 0.80 => Material::Dirt,
        n if n < 0.88 => Material::Rock,
        n if n <= 0.93 => Material::Snow,
        _ => Material::Lava,
    }
}

/// Monotonic noise to height mapping, `1..=MAX_NOISE_HEIGHT`.
pub fn height_for(noise: f64) -> u32 {
    let n = noise.clamp(0.0, 1.0);
    (1 + (n * MAX_NOISE_HEIGHT as f64) as u32).min(MAX_NOISE_HEIGHT)
}

/// A carved rectangular pit with solid walls stacked on its rim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quarry {
    pub origin: (u32, u32),
    pub width: u32,
    pub length: u32,
    pub depth: u32,
    pub wall_height: u32,
}

/// Builds terrain deterministically from a seed.
///
/// Per-cell noise comes from [`SeedRng::derive`]; every placement draw
/// (quarries, isolated blocks) comes from a `ChaCha8Rng` seeded with the
/// same seed, so equal seeds give bit-identical worlds.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: WorldConfig,
}

struct Draft {
    field: SurfaceField,
    /// Lowest voxel layer emitted for each column.
    column_base: Vec<u32>,
}

impl Draft {
    fn idx(&self, i: u32, j: u32) -> usize {
        (j * self.field.columns() + i) as usize
    }
}

impl WorldGenerator {
    pub fn new(config: WorldConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Generate the field and collision index for `seed`.
    pub fn build(&self, seed: u64) -> Terrain {
        let _span =
            tracing::info_span!("world_generate", seed, mode = ?self.config.mode).entered();
        let (columns, rows) = self.config.grid_dims();
        let (columns, rows) = (columns.max(1), rows.max(1));
        let mut draft = Draft {
            field: SurfaceField::new(
                self.config.mode,
                columns,
                rows,
                self.config.voxel_size,
                self.config.base_radius,
            ),
            column_base: vec![0; (columns * rows) as usize],
        };

        for j in 0..rows {
            for i in 0..columns {
                let noise = SeedRng::derive(seed, i as i64, j as i64);
                let height = height_for(noise);
                draft
                    .field
                    .set_cell(i as i64, j as i64, Cell::new(height, classify(noise)));
                let idx = draft.idx(i, j);
                draft.column_base[idx] = height.saturating_sub(1);
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let quarry_count = 3 + rng.gen_range(0..3);
        for _ in 0..quarry_count {
            let quarry = self.pick_quarry(&mut rng, columns, rows);
            carve_quarry(&mut draft, &quarry);
            tracing::debug!(?quarry, "carved quarry");
        }
        for _ in 0..self.config.isolated_blocks {
            self.place_block(&mut draft, &mut rng, columns, rows);
        }

        let records = emit_voxels(&draft);
        let terrain = Terrain::from_parts(seed, draft.field, records);
        tracing::info!(
            voxels = terrain.voxels().len(),
            solid = terrain.collision().len(),
            quarries = quarry_count,
            "world generated"
        );
        terrain
    }

    fn pick_quarry(&self, rng: &mut ChaCha8Rng, columns: u32, rows: u32) -> Quarry {
        let width = rng.gen_range(3..=6).min(columns);
        let length = rng.gen_range(3..=6).min(rows);
        let depth = rng.gen_range(1..=3);
        let wall_height = rng.gen_range(2..=4);
        let origin = (
            rng.gen_range(0..=columns - width),
            rng.gen_range(0..=rows - length),
        );
        Quarry {
            origin,
            width,
            length,
            depth,
            wall_height,
        }
    }

    fn place_block(&self, draft: &mut Draft, rng: &mut ChaCha8Rng, columns: u32, rows: u32) {
        let width = rng.gen_range(1..=2).min(columns);
        let length = rng.gen_range(1..=2).min(rows);
        let x0 = rng.gen_range(0..=columns - width);
        let z0 = rng.gen_range(0..=rows - length);
        for j in z0..z0 + length {
            for i in x0..x0 + width {
                let cell = draft.field.cell(i as i64, j as i64);
                draft
                    .field
                    .set_cell(i as i64, j as i64, Cell::new(cell.height + 1, Material::Rock));
            }
        }
        tracing::debug!(x0, z0, width, length, "placed isolated block");
    }
}

/// Lower the footprint first, then stack rock on the rim starting from the
/// lowered height.
fn carve_quarry(draft: &mut Draft, q: &Quarry) {
    let (x0, z0) = q.origin;
    let (x1, z1) = (x0 + q.width, z0 + q.length);

    for j in z0..z1 {
        for i in x0..x1 {
            let cell = draft.field.cell(i as i64, j as i64);
            let lowered = cell.height.saturating_sub(q.depth);
            draft
                .field
                .set_cell(i as i64, j as i64, Cell::new(lowered, Material::Rock));
            let idx = draft.idx(i, j);
            draft.column_base[idx] = draft.column_base[idx].min(lowered.saturating_sub(1));
        }
    }

    for j in z0..z1 {
        for i in x0..x1 {
            let on_rim = i == x0 || i == x1 - 1 || j == z0 || j == z1 - 1;
            if !on_rim {
                continue;
            }
            let base = draft.field.height_at(i as i64, j as i64);
            draft.field.set_height(i as i64, j as i64, base + q.wall_height);
            let idx = draft.idx(i, j);
            draft.column_base[idx] = draft.column_base[idx].min(base);
        }
    }
}

fn emit_voxels(draft: &Draft) -> Vec<VoxelRecord> {
    let mut records = Vec::new();
    for j in 0..draft.field.rows() {
        for i in 0..draft.field.columns() {
            let cell = draft.field.cell(i as i64, j as i64);
            let base = draft.column_base[draft.idx(i, j)];
            for y in base..cell.height {
                records.push(VoxelRecord::whole(
                    IVec3::new(i as i32, y as i32, j as i32),
                    cell.material,
                ));
            }
        }
    }
    records
}
