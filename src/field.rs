//! Per-cell field value types.
//!
//! Every kernel in the solver (diffusion, interpolation, advection) is written
//! once against [`FieldValue`] and used for both the scalar density field and
//! the vector velocity field.

use std::ops::{Add, Mul, Sub};

/// 3-component float vector used for velocity and force quantities.
pub use glam::Vec3 as Vector3;

/// A value stored per grid cell: closed under addition, subtraction and
/// scaling by `f32`.
pub trait FieldValue:
    Copy
    + Default
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
{
    /// Absolute value for scalars, Euclidean length for vectors.
    fn magnitude(self) -> f32;
}

impl FieldValue for f32 {
    fn magnitude(self) -> f32 {
        self.abs()
    }
}

impl FieldValue for Vector3 {
    fn magnitude(self) -> f32 {
        self.length()
    }
}
