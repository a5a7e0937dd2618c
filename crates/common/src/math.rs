//! Vector helpers that never produce NaN or infinite results.

use glam::{Vec2, Vec3};

/// Reference "up" used to orient tangent frames on the sphere.
pub const REFERENCE_UP: Vec3 = Vec3::Y;

/// Axis used whenever a direction is numerically degenerate.
pub const DEFAULT_AXIS: Vec3 = Vec3::X;

/// Below this length a vector is treated as zero.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Normalize `v`, or return `fallback` when `v` is zero, tiny or non-finite.
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    if !v.is_finite() || v.length_squared() < DEGENERATE_EPSILON * DEGENERATE_EPSILON {
        return fallback;
    }
    v.try_normalize().unwrap_or(fallback)
}

/// 2D counterpart of [`safe_normalize`].
pub fn safe_normalize2(v: Vec2, fallback: Vec2) -> Vec2 {
    if !v.is_finite() || v.length_squared() < DEGENERATE_EPSILON * DEGENERATE_EPSILON {
        return fallback;
    }
    v.try_normalize().unwrap_or(fallback)
}

/// Orthonormal `(east, north)` frame tangent to a surface with `normal`.
///
/// `east = up x normal`, `north = normal x east`. At the poles, where `up`
/// and `normal` are parallel, east falls back to [`DEFAULT_AXIS`]
/// re-orthogonalized against the normal.
pub fn tangent_basis(normal: Vec3, up: Vec3) -> (Vec3, Vec3) {
    let normal = safe_normalize(normal, up);
    let mut east = up.cross(normal);
    if east.length_squared() < DEGENERATE_EPSILON {
        east = DEFAULT_AXIS - normal * DEFAULT_AXIS.dot(normal);
        if east.length_squared() < DEGENERATE_EPSILON {
            east = Vec3::Z - normal * Vec3::Z.dot(normal);
        }
    }
    let east = safe_normalize(east, DEFAULT_AXIS);
    let north = safe_normalize(normal.cross(east), Vec3::Z);
    (east, north)
}

/// Remove the component of `v` along `normal`.
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}
