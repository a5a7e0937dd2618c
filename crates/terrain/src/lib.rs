//! Terrain: seeded world generation, surface queries, voxel storage and the
//! collision index.
//!
//! # Invariants
//! - `WorldGenerator::build(seed)` is a pure function of the seed and config.
//! - Heights are never negative; field queries never fail (clamp or wrap).
//! - The field, voxel list and collision index are only ever published
//!   together, through `SharedTerrain`.

pub mod arena;
pub mod collision;
pub mod field;
pub mod generator;
pub mod rng;
pub mod terrain;

pub use arena::{SlotId, VoxelArena, VoxelKind, VoxelRecord};
pub use collision::CollisionIndex;
pub use field::SurfaceField;
pub use generator::{Quarry, WorldGenerator, classify, height_for};
pub use rng::SeedRng;
pub use terrain::{SharedTerrain, Terrain};
