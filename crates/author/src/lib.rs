//! Terrain authoring: voxel removal and subdivision, undo/redo.
//!
//! # Invariants
//! - Every edit is reversible.
//! - Edits are published through [`SharedTerrain::edit`](voxworld_terrain::SharedTerrain::edit),
//!   so readers never observe a half-applied edit.

pub mod editor;

pub use editor::{EditCommand, EditError, Editor};
