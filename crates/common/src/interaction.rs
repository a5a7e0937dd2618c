//! Pairwise interaction strength between two points.
//!
//! The implementation is resolved once per process. With the `simd` feature
//! the accelerated path runs on glam's 16-byte aligned `Vec3A`; otherwise the
//! scalar fallback `1 / (1 + distance)` is used. Both compute the same value.

use std::sync::OnceLock;

use glam::Vec3A;

/// Which implementation [`compute_interaction`] dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionBackend {
    Accelerated,
    Fallback,
}

type InteractionFn = fn(f32, f32, f32, f32, f32, f32) -> f32;

struct Resolved {
    backend: InteractionBackend,
    func: InteractionFn,
}

static RESOLVED: OnceLock<Resolved> = OnceLock::new();

fn resolve() -> &'static Resolved {
    RESOLVED.get_or_init(|| {
        if cfg!(feature = "simd") {
            Resolved {
                backend: InteractionBackend::Accelerated,
                func: accelerated,
            }
        } else {
            tracing::debug!("accelerated interaction backend unavailable, using scalar fallback");
            Resolved {
                backend: InteractionBackend::Fallback,
                func: fallback,
            }
        }
    })
}

/// Backend chosen for this process.
pub fn interaction_backend() -> InteractionBackend {
    resolve().backend
}

/// Interaction strength between `a` and `b`, in `(0, 1]`.
pub fn compute_interaction(ax: f32, ay: f32, az: f32, bx: f32, by: f32, bz: f32) -> f32 {
    (resolve().func)(ax, ay, az, bx, by, bz)
}

/// Scalar reference implementation.
pub fn fallback(ax: f32, ay: f32, az: f32, bx: f32, by: f32, bz: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    let dz = az - bz;
    1.0 / (1.0 + (dx * dx + dy * dy + dz * dz).sqrt())
}

fn accelerated(ax: f32, ay: f32, az: f32, bx: f32, by: f32, bz: f32) -> f32 {
    let d = Vec3A::new(ax, ay, az).distance(Vec3A::new(bx, by, bz));
    1.0 / (1.0 + d)
}
