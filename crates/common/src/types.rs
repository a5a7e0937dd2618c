use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Surface material of a terrain cell or voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Dirt,
    Rock,
    Ocean,
    Lava,
    Sand,
    Grass,
    Snow,
}

impl Material {
    /// Every material, in declaration order.
    pub const ALL: [Material; 7] = [
        Material::Dirt,
        Material::Rock,
        Material::Ocean,
        Material::Lava,
        Material::Sand,
        Material::Grass,
        Material::Snow,
    ];

    /// Solid voxels take part in collision; everything else is walkable
    /// surface described by the height field alone.
    pub fn is_solid(self) -> bool {
        matches!(self, Material::Rock)
    }

    /// Stable small integer tag, used for hashing and compact output.
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// One entry of the surface grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub height: u32,
    pub material: Material,
}

impl Cell {
    pub fn new(height: u32, material: Material) -> Self {
        Self { height, material }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            height: 0,
            material: Material::Dirt,
        }
    }
}

/// How grid coordinates map onto the ambient 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// Latitude/longitude indices on a sphere. Longitude wraps, latitude clamps.
    #[default]
    Spherical,
    /// x/z indices on a bounded plane. Both axes clamp.
    Planar,
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}
