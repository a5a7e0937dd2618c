use std::collections::HashMap;

use glam::IVec3;

use crate::arena::{SlotId, VoxelArena, VoxelRecord};

/// Set of solid voxel coordinates with O(1) membership, each pointing back
/// at its arena slot.
#[derive(Debug, Clone, Default)]
pub struct CollisionIndex {
    solid: HashMap<IVec3, SlotId>,
}

impl CollisionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every colliding record of `arena`.
    pub fn build(arena: &VoxelArena) -> Self {
        let solid = arena
            .iter()
            .filter(|(_, r)| r.collides())
            .map(|(slot, r)| (r.coord, slot))
            .collect();
        Self { solid }
    }

    pub fn contains(&self, coord: IVec3) -> bool {
        self.solid.contains_key(&coord)
    }

    pub fn slot(&self, coord: IVec3) -> Option<SlotId> {
        self.solid.get(&coord).copied()
    }

    /// Track `record` if it collides. Returns whether it was added.
    pub fn track(&mut self, slot: SlotId, record: &VoxelRecord) -> bool {
        if record.collides() {
            self.solid.insert(record.coord, slot);
            true
        } else {
            false
        }
    }

    pub fn forget(&mut self, coord: IVec3) -> Option<SlotId> {
        self.solid.remove(&coord)
    }

    pub fn len(&self) -> usize {
        self.solid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solid.is_empty()
    }

    /// Solid coordinates in ascending `(x, y, z)` order.
    pub fn sorted_coords(&self) -> Vec<IVec3> {
        let mut coords: Vec<IVec3> = self.solid.keys().copied().collect();
        coords.sort_by_key(|c| (c.x, c.y, c.z));
        coords
    }
}
