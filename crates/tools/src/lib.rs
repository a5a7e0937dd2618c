//! Developer tooling: read-only terrain inspection.
//!
//! # Invariants
//! - Inspection never mutates the terrain.

pub mod inspector;

pub use inspector::{CellInfo, TerrainInspector, TerrainSummary};
