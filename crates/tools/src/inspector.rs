use glam::{IVec3, Vec3};
use voxworld_common::{AddressingMode, Material};
use voxworld_terrain::Terrain;

/// Terrain inspector for developer tooling.
///
/// Provides read-only queries against a terrain snapshot for debugging and
/// the CLI.
pub struct TerrainInspector;

impl TerrainInspector {
    /// Produce a summary of the terrain.
    pub fn summary(terrain: &Terrain) -> TerrainSummary {
        let field = terrain.field();
        let mut materials = [0usize; Material::ALL.len()];
        let mut min_height = u32::MAX;
        let mut max_height = 0;
        for cell in field.cells() {
            materials[cell.material.index() as usize] += 1;
            min_height = min_height.min(cell.height);
            max_height = max_height.max(cell.height);
        }
        let fragments = terrain
            .voxels()
            .iter()
            .filter(|(_, r)| r.is_fragment())
            .count();

        tracing::debug!(seed = terrain.seed(), fragments, "terrain summarised");
        TerrainSummary {
            seed: terrain.seed(),
            mode: field.mode(),
            columns: field.columns(),
            rows: field.rows(),
            min_height: min_height.min(max_height),
            max_height,
            materials: Material::ALL
                .iter()
                .map(|&m| (m, materials[m.index() as usize]))
                .collect(),
            voxels: terrain.voxels().len(),
            solid: terrain.collision().len(),
            fragments,
            state_hash: terrain.state_hash(),
        }
    }

    /// Details of one surface cell. Coordinates are addressed like
    /// [`SurfaceField::cell`](voxworld_terrain::SurfaceField::cell).
    pub fn inspect_cell(terrain: &Terrain, i: i64, j: i64) -> CellInfo {
        let field = terrain.field();
        let (ci, cj) = field.address(i, j);
        let cell = field.cell(i, j);
        let column_voxels = (0..cell.height as i32)
            .filter(|&y| {
                terrain
                    .voxels()
                    .slot_at(IVec3::new(ci as i32, y, cj as i32))
                    .is_some()
            })
            .count();
        CellInfo {
            index: (ci, cj),
            height: cell.height,
            material: cell.material,
            surface: field.surface_point(i, j),
            column_voxels,
        }
    }

    /// Solid voxel coordinates in ascending `(x, y, z)` order.
    pub fn list_solid(terrain: &Terrain) -> Vec<IVec3> {
        terrain.collision().sorted_coords()
    }
}

/// Summary of a terrain for the inspector.
#[derive(Debug, Clone)]
pub struct TerrainSummary {
    pub seed: u64,
    pub mode: AddressingMode,
    pub columns: u32,
    pub rows: u32,
    pub min_height: u32,
    pub max_height: u32,
    /// Cell count per material, in [`Material::ALL`] order.
    pub materials: Vec<(Material, usize)>,
    pub voxels: usize,
    pub solid: usize,
    pub fragments: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for TerrainSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Terrain: seed={} mode={:?} grid={}x{} heights={}..={} hash={:016x}",
            self.seed,
            self.mode,
            self.columns,
            self.rows,
            self.min_height,
            self.max_height,
            self.state_hash
        )?;
        writeln!(
            f,
            "Voxels: total={} solid={} fragments={}",
            self.voxels, self.solid, self.fragments
        )?;
        let bands: Vec<String> = self
            .materials
            .iter()
            .map(|(m, n)| format!("{m:?}={n}").to_lowercase())
            .collect();
        write!(f, "Materials: {}", bands.join(" "))
    }
}

/// Detailed info about a single surface cell.
#[derive(Debug, Clone)]
pub struct CellInfo {
    pub index: (u32, u32),
    pub height: u32,
    pub material: Material,
    pub surface: Vec3,
    /// Whole voxels present below the stored height.
    pub column_voxels: usize,
}

impl std::fmt::Display for CellInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cell ({}, {}) height={} material={:?} surface=({:.2}, {:.2}, {:.2}) voxels={}",
            self.index.0,
            self.index.1,
            self.height,
            self.material,
            self.surface.x,
            self.surface.y,
            self.surface.z,
            self.column_voxels,
        )
    }
}
