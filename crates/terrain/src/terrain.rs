use std::sync::{Arc, PoisonError, RwLock};

use glam::IVec3;

use crate::arena::{SlotId, VoxelArena, VoxelKind, VoxelRecord};
use crate::collision::CollisionIndex;
use crate::field::SurfaceField;

/// A consistent surface field, voxel list and collision index.
///
/// Edits update all three together; see [`SharedTerrain`] for how readers
/// are shielded from partially applied edits.
#[derive(Debug, Clone)]
pub struct Terrain {
    seed: u64,
    field: SurfaceField,
    voxels: VoxelArena,
    collision: CollisionIndex,
}

impl Terrain {
    /// Assemble a terrain from a field and its voxel records. The collision
    /// index is derived from the records.
    pub fn from_parts(
        seed: u64,
        field: SurfaceField,
        records: impl IntoIterator<Item = VoxelRecord>,
    ) -> Self {
        let mut voxels = VoxelArena::new();
        for record in records {
            voxels.insert(record);
        }
        let collision = CollisionIndex::build(&voxels);
        Self {
            seed,
            field,
            voxels,
            collision,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn field(&self) -> &SurfaceField {
        &self.field
    }

    pub fn voxels(&self) -> &VoxelArena {
        &self.voxels
    }

    pub fn collision(&self) -> &CollisionIndex {
        &self.collision
    }

    /// Remove the whole voxel at `coord`. If it was the top of its column,
    /// the column height drops to `coord.y`.
    pub fn remove_voxel(&mut self, coord: IVec3) -> Option<VoxelRecord> {
        let slot = self.voxels.slot_at(coord)?;
        let record = self.voxels.remove(slot)?;
        self.collision.forget(coord);
        self.lower_column(coord);
        tracing::debug!(?coord, material = ?record.material, "removed voxel");
        Some(record)
    }

    /// Put a whole voxel back, raising its column if needed.
    pub fn restore_voxel(&mut self, record: VoxelRecord) -> SlotId {
        let record = VoxelRecord {
            kind: VoxelKind::Whole,
            ..record
        };
        let slot = self.voxels.insert(record);
        if !self.collision.track(slot, &record) {
            self.collision.forget(record.coord);
        }
        let (i, j) = (record.coord.x as i64, record.coord.z as i64);
        let top = (record.coord.y + 1).max(0) as u32;
        if self.field.height_at(i, j) < top {
            self.field.set_height(i, j, top);
        }
        slot
    }

    /// Replace the voxel at `coord` with eight visual-only fragments. The
    /// fragments never enter the collision index.
    pub fn subdivide_voxel(&mut self, coord: IVec3) -> Option<(VoxelRecord, Vec<SlotId>)> {
        let record = self.remove_voxel(coord)?;
        let fragments = (0..8u8)
            .map(|octant| {
                self.voxels.insert(VoxelRecord {
                    coord,
                    material: record.material,
                    kind: VoxelKind::Fragment { octant },
                })
            })
            .collect();
        Some((record, fragments))
    }

    /// Drop fragment records, e.g. when undoing a subdivision.
    pub fn remove_fragments(&mut self, slots: &[SlotId]) -> usize {
        let mut removed = 0;
        for &slot in slots {
            if self.voxels.get(slot).is_some_and(|r| r.is_fragment()) {
                self.voxels.remove(slot);
                removed += 1;
            }
        }
        removed
    }

    fn lower_column(&mut self, coord: IVec3) {
        let (i, j) = (coord.x as i64, coord.z as i64);
        if self.field.height_at(i, j) as i64 == coord.y as i64 + 1 {
            self.field.set_height(i, j, coord.y.max(0) as u32);
        }
    }

    /// Deterministic FNV-1a hash of the field dimensions, heights, materials
    /// and the live voxel count.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.seed.to_le_bytes());
        mix(&mut h, &self.field.columns().to_le_bytes());
        mix(&mut h, &self.field.rows().to_le_bytes());
        for cell in self.field.cells() {
            mix(&mut h, &cell.height.to_le_bytes());
            mix(&mut h, &[cell.material.index()]);
        }
        mix(&mut h, &(self.voxels.len() as u64).to_le_bytes());
        mix(&mut h, &(self.collision.len() as u64).to_le_bytes());
        h
    }
}

/// Atomically swappable handle to the current [`Terrain`].
///
/// Readers take an `Arc` snapshot and keep a consistent view for as long as
/// they hold it. Writers mutate under the write lock through
/// `Arc::make_mut`, which clones only if a snapshot is still alive.
#[derive(Debug)]
pub struct SharedTerrain {
    current: RwLock<Arc<Terrain>>,
}

impl SharedTerrain {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            current: RwLock::new(Arc::new(terrain)),
        }
    }

    /// Current terrain.
    pub fn snapshot(&self) -> Arc<Terrain> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a freshly generated terrain, returning the previous one.
    pub fn replace(&self, terrain: Terrain) -> Arc<Terrain> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(terrain))
    }

    /// Apply an edit. Concurrent readers see either the old or the new
    /// terrain, never an intermediate state.
    pub fn edit<R>(&self, f: impl FnOnce(&mut Terrain) -> R) -> R {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        f(Arc::make_mut(&mut guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxworld_common::{AddressingMode, Cell, Material};

    fn small_terrain() -> Terrain {
        let mut field = SurfaceField::new(AddressingMode::Planar, 4, 4, 1.0, 0.0);
        field.set_cell(1, 1, Cell::new(3, Material::Rock));
        field.set_cell(2, 2, Cell::new(1, Material::Grass));
        let records = vec![
            VoxelRecord::whole(IVec3::new(1, 0, 1), Material::Rock),
            VoxelRecord::whole(IVec3::new(1, 1, 1), Material::Rock),
            VoxelRecord::whole(IVec3::new(1, 2, 1), Material::Rock),
            VoxelRecord::whole(IVec3::new(2, 0, 2), Material::Grass),
        ];
        Terrain::from_parts(1, field, records)
    }

    #[test]
    fn from_parts_builds_collision() {
        let t = small_terrain();
        assert_eq!(t.voxels().len(), 4);
        assert_eq!(t.collision().len(), 3);
    }

    #[test]
    fn removing_top_voxel_lowers_column() {
        let mut t = small_terrain();
        let removed = t.remove_voxel(IVec3::new(1, 2, 1)).unwrap();
        assert_eq!(removed.material, Material::Rock);
        assert_eq!(t.field().height_at(1, 1), 2);
        assert!(!t.collision().contains(IVec3::new(1, 2, 1)));
        assert_eq!(t.voxels().len(), 3);
    }

    #[test]
    fn removing_buried_voxel_keeps_height() {
        let mut t = small_terrain();
        t.remove_voxel(IVec3::new(1, 0, 1)).unwrap();
        assert_eq!(t.field().height_at(1, 1), 3);
    }

    #[test]
    fn remove_missing_voxel_is_none() {
        let mut t = small_terrain();
        assert!(t.remove_voxel(IVec3::new(3, 3, 3)).is_none());
    }

    #[test]
    fn restore_undoes_removal() {
        let mut t = small_terrain();
        let before = t.state_hash();
        let r = t.remove_voxel(IVec3::new(1, 2, 1)).unwrap();
        assert_ne!(t.state_hash(), before);
        t.restore_voxel(r);
        assert_eq!(t.state_hash(), before);
        assert!(t.collision().contains(IVec3::new(1, 2, 1)));
    }

    #[test]
    fn subdivision_fragments_do_not_collide() {
        let mut t = small_terrain();
        let (record, fragments) = t.subdivide_voxel(IVec3::new(1, 2, 1)).unwrap();
        assert_eq!(record.coord, IVec3::new(1, 2, 1));
        assert_eq!(fragments.len(), 8);
        assert_eq!(t.voxels().len(), 3 + 8);
        assert!(!t.collision().contains(IVec3::new(1, 2, 1)));
        assert_eq!(t.collision().len(), 2);
    }

    #[test]
    fn remove_fragments_only_touches_fragments() {
        let mut t = small_terrain();
        let (_, mut fragments) = t.subdivide_voxel(IVec3::new(1, 2, 1)).unwrap();
        let whole = t.voxels().slot_at(IVec3::new(1, 0, 1)).unwrap();
        fragments.push(whole);
        assert_eq!(t.remove_fragments(&fragments), 8);
        assert!(t.voxels().get(whole).is_some());
    }

    #[test]
    fn snapshot_survives_edit() {
        let shared = SharedTerrain::new(small_terrain());
        let before = shared.snapshot();
        shared.edit(|t| t.remove_voxel(IVec3::new(1, 2, 1)));
        let after = shared.snapshot();
        assert_eq!(before.field().height_at(1, 1), 3);
        assert!(before.collision().contains(IVec3::new(1, 2, 1)));
        assert_eq!(after.field().height_at(1, 1), 2);
        assert!(!after.collision().contains(IVec3::new(1, 2, 1)));
    }

    #[test]
    fn replace_swaps_whole_terrain() {
        let shared = SharedTerrain::new(small_terrain());
        let field = SurfaceField::new(AddressingMode::Planar, 8, 8, 1.0, 0.0);
        let old = shared.replace(Terrain::from_parts(2, field, Vec::new()));
        assert_eq!(old.seed(), 1);
        assert_eq!(shared.snapshot().seed(), 2);
        assert_eq!(shared.snapshot().field().columns(), 8);
    }

    #[test]
    fn readers_on_other_threads_see_consistent_pairs() {
        let shared = Arc::new(SharedTerrain::new(small_terrain()));
        let reader = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let t = shared.snapshot();
                    let top = IVec3::new(1, 2, 1);
                    // Height 3 exactly when the top voxel is present.
                    let present = t.collision().contains(top);
                    assert_eq!(present, t.field().height_at(1, 1) == 3);
                }
            })
        };
        for _ in 0..200 {
            let r = shared.edit(|t| t.remove_voxel(IVec3::new(1, 2, 1)));
            if let Some(r) = r {
                shared.edit(|t| t.restore_voxel(r));
            }
        }
        reader.join().unwrap();
    }
}
