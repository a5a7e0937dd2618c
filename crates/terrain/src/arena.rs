use std::collections::HashMap;

use glam::IVec3;
use voxworld_common::Material;

/// Stable index of a record in a [`VoxelArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

/// Whether a record is a full voxel or one of the eight pieces of a
/// subdivided voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelKind {
    Whole,
    /// Visual-only piece; `octant` bits select the +x, +y, +z half.
    Fragment { octant: u8 },
}

/// Render-facing voxel entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelRecord {
    /// Grid coordinate `(column, layer, row)`.
    pub coord: IVec3,
    pub material: Material,
    pub kind: VoxelKind,
}

impl VoxelRecord {
    pub fn whole(coord: IVec3, material: Material) -> Self {
        Self {
            coord,
            material,
            kind: VoxelKind::Whole,
        }
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.kind, VoxelKind::Fragment { .. })
    }

    /// Whole solid voxels are the only records that take part in collision.
    pub fn collides(&self) -> bool {
        !self.is_fragment() && self.material.is_solid()
    }
}

/// Dense record storage with tombstones and a free list.
///
/// Removal leaves a `None` in place and pushes the slot onto the free list,
/// so every other `SlotId` stays valid.
#[derive(Debug, Clone, Default)]
pub struct VoxelArena {
    slots: Vec<Option<VoxelRecord>>,
    free: Vec<u32>,
    by_coord: HashMap<IVec3, SlotId>,
    live: usize,
}

impl VoxelArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record. A whole voxel at an occupied coordinate replaces the
    /// existing record in its slot.
    pub fn insert(&mut self, record: VoxelRecord) -> SlotId {
        if !record.is_fragment() {
            if let Some(&slot) = self.by_coord.get(&record.coord) {
                self.slots[slot.0 as usize] = Some(record);
                return slot;
            }
        }
        let slot = match self.free.pop() {
            Some(idx) => {
                self.slots[idx as usize] = Some(record);
                SlotId(idx)
            }
            None => {
                self.slots.push(Some(record));
                SlotId((self.slots.len() - 1) as u32)
            }
        };
        if !record.is_fragment() {
            self.by_coord.insert(record.coord, slot);
        }
        self.live += 1;
        slot
    }

    /// Tombstone a slot. Returns the record it held.
    pub fn remove(&mut self, slot: SlotId) -> Option<VoxelRecord> {
        let record = self.slots.get_mut(slot.0 as usize)?.take()?;
        if !record.is_fragment() {
            self.by_coord.remove(&record.coord);
        }
        self.free.push(slot.0);
        self.live -= 1;
        Some(record)
    }

    pub fn get(&self, slot: SlotId) -> Option<&VoxelRecord> {
        self.slots.get(slot.0 as usize)?.as_ref()
    }

    /// Slot of the whole voxel at `coord`.
    pub fn slot_at(&self, coord: IVec3) -> Option<SlotId> {
        self.by_coord.get(&coord).copied()
    }

    /// Live records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &VoxelRecord)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|r| (SlotId(i as u32), r)))
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Allocated slots, live or tombstoned.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}
