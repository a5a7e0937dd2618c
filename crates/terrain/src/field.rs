use std::f32::consts::{PI, TAU};

use glam::Vec3;
use voxworld_common::math::safe_normalize;
use voxworld_common::{AddressingMode, Cell};

/// Queryable height/material grid.
///
/// Column index `i` is longitude (spherical) or x (planar); row index `j` is
/// latitude (spherical, row 0 at the +Y pole) or z (planar).
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceField {
    mode: AddressingMode,
    columns: u32,
    rows: u32,
    voxel_size: f32,
    base_radius: f32,
    cells: Vec<Cell>,
}

impl SurfaceField {
    /// A field of `columns * rows` default (height 0) cells.
    pub fn new(
        mode: AddressingMode,
        columns: u32,
        rows: u32,
        voxel_size: f32,
        base_radius: f32,
    ) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            mode,
            columns,
            rows,
            voxel_size,
            base_radius,
            cells: vec![Cell::default(); (columns * rows) as usize],
        }
    }

    /// Addressing mode used for lookups.
    pub fn mode(&self) -> AddressingMode {
        self.mode
    }

    /// Number of columns (longitude or x).
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows (latitude or z).
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// World-space edge length of one voxel.
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// Sphere radius at height zero. Unused on the plane.
    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    /// All cells in row-major order (`j * columns + i`).
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Column heights in row-major order.
    pub fn heights(&self) -> Vec<u32> {
        self.cells.iter().map(|c| c.height).collect()
    }

    /// Map possibly out-of-range indices onto the grid: longitude wraps and
    /// latitude clamps on the sphere, both clamp on the plane.
    pub fn address(&self, i: i64, j: i64) -> (u32, u32) {
        let cols = self.columns as i64;
        let rows = self.rows as i64;
        let i = match self.mode {
            AddressingMode::Spherical => i.rem_euclid(cols),
            AddressingMode::Planar => i.clamp(0, cols - 1),
        };
        (i as u32, j.clamp(0, rows - 1) as u32)
    }

    fn index(&self, i: u32, j: u32) -> usize {
        (j * self.columns + i) as usize
    }

    /// Cell at addressed coordinates. Never fails.
    pub fn cell(&self, i: i64, j: i64) -> Cell {
        let (i, j) = self.address(i, j);
        self.cells[self.index(i, j)]
    }

    pub fn height_at(&self, i: i64, j: i64) -> u32 {
        self.cell(i, j).height
    }

    /// Overwrite a cell. Coordinates are addressed like [`SurfaceField::cell`].
    pub fn set_cell(&mut self, i: i64, j: i64, cell: Cell) {
        let (i, j) = self.address(i, j);
        let idx = self.index(i, j);
        self.cells[idx] = cell;
    }

    pub fn set_height(&mut self, i: i64, j: i64, height: u32) {
        let (i, j) = self.address(i, j);
        let idx = self.index(i, j);
        self.cells[idx].height = height;
    }

    /// Surface distance at an ambient position: radius on the sphere,
    /// elevation on the plane.
    pub fn query(&self, position: Vec3) -> f32 {
        match self.mode {
            AddressingMode::Spherical => {
                let (lon, lat) = self.spherical_grid_position(position);
                self.base_radius + self.interpolated_height(lon, lat) * self.voxel_size
            }
            AddressingMode::Planar => {
                let (i, j) = self.planar_cell(position);
                self.height_at(i as i64, j as i64) as f32 * self.voxel_size
            }
        }
    }

    /// Fractional `(lon, lat)` grid coordinates of the direction of `position`.
    pub fn spherical_grid_position(&self, position: Vec3) -> (f32, f32) {
        let n = safe_normalize(position, Vec3::Y);
        let phi = n.y.clamp(-1.0, 1.0).acos();
        let theta = n.z.atan2(n.x);
        let lat = phi / PI * (self.rows - 1) as f32;
        let lon = (theta + PI) / TAU * self.columns as f32;
        (lon, lat)
    }

    /// Unit direction for fractional `(lon, lat)` grid coordinates.
    pub fn spherical_direction(&self, lon: f32, lat: f32) -> Vec3 {
        let phi = lat / (self.rows - 1).max(1) as f32 * PI;
        let theta = lon / self.columns as f32 * TAU - PI;
        Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
    }

    /// Bilinear height between the four cells around `(lon, lat)`.
    pub fn interpolated_height(&self, lon: f32, lat: f32) -> f32 {
        let lon0 = lon.floor();
        let lat0 = lat.floor();
        let tx = lon - lon0;
        let ty = lat - lat0;
        let (i, j) = (lon0 as i64, lat0 as i64);

        let h00 = self.height_at(i, j) as f32;
        let h10 = self.height_at(i + 1, j) as f32;
        let h01 = self.height_at(i, j + 1) as f32;
        let h11 = self.height_at(i + 1, j + 1) as f32;

        let top = h00 + (h10 - h00) * tx;
        let bottom = h01 + (h11 - h01) * tx;
        top + (bottom - top) * ty
    }

    /// Nearest planar cell to an ambient position, clamped to the bounds.
    pub fn planar_cell(&self, position: Vec3) -> (u32, u32) {
        let i = (position.x / self.voxel_size).round();
        let j = (position.z / self.voxel_size).round();
        let i = if i.is_finite() { i as i64 } else { 0 };
        let j = if j.is_finite() { j as i64 } else { 0 };
        self.address(i, j)
    }

    /// Ambient position of the surface at the centre of cell `(i, j)`.
    pub fn surface_point(&self, i: i64, j: i64) -> Vec3 {
        let (i, j) = self.address(i, j);
        let height = self.height_at(i as i64, j as i64) as f32;
        match self.mode {
            AddressingMode::Spherical => {
                let dir = self.spherical_direction(i as f32, j as f32);
                dir * (self.base_radius + height * self.voxel_size)
            }
            AddressingMode::Planar => Vec3::new(
                i as f32 * self.voxel_size,
                height * self.voxel_size,
                j as f32 * self.voxel_size,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxworld_common::Material;

    fn planar(size: u32) -> SurfaceField {
        SurfaceField::new(AddressingMode::Planar, size, size, 0.5, 0.0)
    }

    fn sphere() -> SurfaceField {
        SurfaceField::new(AddressingMode::Spherical, 64, 33, 0.45, 4.8)
    }

    #[test]
    fn planar_query_is_nearest_neighbour() {
        let mut f = planar(8);
        f.set_height(2, 3, 4);
        // (1.0, 1.5) / 0.5 = (2, 3)
        assert_eq!(f.query(Vec3::new(1.0, 99.0, 1.5)), 2.0);
        // 1.2 / 0.5 = 2.4 rounds to 2
        assert_eq!(f.query(Vec3::new(1.2, 0.0, 1.6)), 2.0);
        // 1.3 / 0.5 = 2.6 rounds to 3, a different cell
        assert_eq!(f.query(Vec3::new(1.3, 0.0, 1.5)), 0.0);
    }

    #[test]
    fn planar_out_of_range_clamps() {
        let mut f = planar(4);
        f.set_height(3, 3, 7);
        assert_eq!(f.query(Vec3::new(100.0, 0.0, 100.0)), 3.5);
        f.set_height(0, 0, 2);
        assert_eq!(f.query(Vec3::new(-50.0, 0.0, -50.0)), 1.0);
        assert_eq!(f.query(Vec3::new(f32::NAN, 0.0, 0.0)), f.query(Vec3::ZERO));
    }

    #[test]
    fn spherical_longitude_wraps_latitude_clamps() {
        let f = sphere();
        assert_eq!(f.address(-1, 5), (63, 5));
        assert_eq!(f.address(64, -3), (0, 0));
        assert_eq!(f.address(10, 100), (10, 32));
    }

    #[test]
    fn planar_addressing_clamps_both_axes() {
        let f = planar(4);
        assert_eq!(f.address(-1, 9), (0, 3));
    }

    #[test]
    fn spherical_flat_field_returns_base_radius() {
        let f = sphere();
        for p in [Vec3::X, Vec3::NEG_Y, Vec3::new(0.3, 0.4, -0.5), Vec3::ZERO] {
            assert!((f.query(p) - 4.8).abs() < 1e-6);
        }
    }

    #[test]
    fn spherical_interpolates_between_cells() {
        let mut f = sphere();
        f.set_height(10, 16, 4);
        let halfway = f.interpolated_height(9.5, 16.0);
        assert!((halfway - 2.0).abs() < 1e-5);
        let exact = f.interpolated_height(10.0, 16.0);
        assert!((exact - 4.0).abs() < 1e-5);
    }

    #[test]
    fn interpolation_wraps_across_the_seam() {
        let mut f = sphere();
        f.set_height(0, 10, 2);
        let h = f.interpolated_height(63.5, 10.0);
        assert!((h - 1.0).abs() < 1e-5);
    }

    #[test]
    fn direction_round_trips_grid_position() {
        let f = sphere();
        let dir = f.spherical_direction(20.0, 12.0);
        let (lon, lat) = f.spherical_grid_position(dir);
        assert!((lon - 20.0).abs() < 1e-3, "lon {lon}");
        assert!((lat - 12.0).abs() < 1e-3, "lat {lat}");
    }

    #[test]
    fn surface_point_sits_on_query() {
        let mut f = sphere();
        f.set_cell(5, 9, Cell::new(3, Material::Grass));
        let p = f.surface_point(5, 9);
        assert!((p.length() - f.query(p)).abs() < 1e-3);
    }
}
