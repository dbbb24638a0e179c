//! Physics type re-exports from glam
//!
//! The core works in double precision throughout: inertia composition and
//! plane slicing accumulate enough round-off in `f32` to break the volume
//! invariants at tolerance `NEAR_ZERO`.

pub use glam::{DMat3, DMat4, DQuat, DVec2, DVec3};

/// Tolerance for every "is this effectively zero" comparison in the core.
pub const NEAR_ZERO: f64 = 1e-9;

/// True when `value` is within [`NEAR_ZERO`] of zero.
#[inline]
pub fn is_near_zero(value: f64) -> bool {
    value.abs() <= NEAR_ZERO
}

/// Outer product `a ⊗ b` as a column-major matrix.
pub fn outer(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(a * b.x, a * b.y, a * b.z)
}
