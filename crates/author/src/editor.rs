use glam::IVec3;
use voxworld_input::Action;
use voxworld_terrain::{SharedTerrain, SlotId, Terrain, VoxelRecord};

/// A terrain edit that can be reverted.
///
/// Each command carries enough context to undo itself.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// A whole voxel was removed. Undo = restore it.
    RemoveVoxel { record: VoxelRecord },
    /// A voxel was replaced by visual fragments. Undo = drop the fragments
    /// and restore the voxel.
    Subdivide {
        record: VoxelRecord,
        fragments: Vec<SlotId>,
    },
}

impl EditCommand {
    pub fn coord(&self) -> IVec3 {
        match self {
            Self::RemoveVoxel { record } | Self::Subdivide { record, .. } => record.coord,
        }
    }
}

/// Errors from edit operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no voxel at {0}")]
    VoxelNotFound(IVec3),
}

/// Editor with undo/redo over a [`SharedTerrain`].
///
/// Every operation runs inside a single `SharedTerrain::edit` call.
#[derive(Debug, Default)]
pub struct Editor {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the whole voxel at `coord`.
    pub fn remove_voxel(
        &mut self,
        terrain: &SharedTerrain,
        coord: IVec3,
    ) -> Result<VoxelRecord, EditError> {
        let record = terrain.edit(|t| remove(t, coord))?;
        self.record(EditCommand::RemoveVoxel { record });
        Ok(record)
    }

    /// Break the voxel at `coord` into eight non-colliding fragments.
    pub fn subdivide_voxel(
        &mut self,
        terrain: &SharedTerrain,
        coord: IVec3,
    ) -> Result<Vec<SlotId>, EditError> {
        let (record, fragments) = terrain.edit(|t| subdivide(t, coord))?;
        self.record(EditCommand::Subdivide {
            record,
            fragments: fragments.clone(),
        });
        Ok(fragments)
    }

    /// Undo the last edit. Returns true if an operation was undone.
    pub fn undo(&mut self, terrain: &SharedTerrain) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        terrain.edit(|t| revert(t, &cmd));
        tracing::debug!(coord = ?cmd.coord(), "edit undone");
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the last undone edit. Returns true if an operation was redone.
    pub fn redo(&mut self, terrain: &SharedTerrain) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        let coord = cmd.coord();
        // Fragment slots may differ from the first application.
        let reapplied = terrain.edit(|t| match cmd {
            EditCommand::RemoveVoxel { .. } => {
                remove(t, coord).map(|record| EditCommand::RemoveVoxel { record })
            }
            EditCommand::Subdivide { .. } => subdivide(t, coord)
                .map(|(record, fragments)| EditCommand::Subdivide { record, fragments }),
        });
        match reapplied {
            Ok(cmd) => {
                self.undo_stack.push(cmd);
                true
            }
            Err(err) => {
                tracing::warn!(%err, "redo skipped");
                false
            }
        }
    }

    /// Apply a world-changing [`Action`]. Steering actions are ignored.
    /// Returns whether the terrain changed.
    pub fn apply_action(
        &mut self,
        terrain: &SharedTerrain,
        action: &Action,
    ) -> Result<bool, EditError> {
        match action {
            Action::RemoveVoxel(coord) => self.remove_voxel(terrain, *coord).map(|_| true),
            Action::SubdivideVoxel(coord) => self.subdivide_voxel(terrain, *coord).map(|_| true),
            Action::Undo => Ok(self.undo(terrain)),
            Action::Redo => Ok(self.redo(terrain)),
            _ => Ok(false),
        }
    }

    /// Number of operations on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether there is an edit to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn record(&mut self, cmd: EditCommand) {
        tracing::debug!(coord = ?cmd.coord(), "edit applied");
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
    }
}

fn remove(t: &mut Terrain, coord: IVec3) -> Result<VoxelRecord, EditError> {
    t.remove_voxel(coord).ok_or(EditError::VoxelNotFound(coord))
}

fn subdivide(t: &mut Terrain, coord: IVec3) -> Result<(VoxelRecord, Vec<SlotId>), EditError> {
    t.subdivide_voxel(coord).ok_or(EditError::VoxelNotFound(coord))
}

fn revert(t: &mut Terrain, cmd: &EditCommand) {
    match cmd {
        EditCommand::RemoveVoxel { record } => {
            t.restore_voxel(*record);
        }
        EditCommand::Subdivide { record, fragments } => {
            t.remove_fragments(fragments);
            t.restore_voxel(*record);
        }
    }
}
