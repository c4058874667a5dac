use crate::field::{FieldValue, Vector3};
use crate::grid::Grid3D;

/// `a * (1 - t) + b * t`
#[inline]
pub fn linear<T: FieldValue>(a: T, b: T, t: f32) -> T {
    a * (1.0 - t) + b * t
}

/// Samples `field` at a continuous position in cell-index space.
///
/// Integer coordinates land exactly on stored samples. The eight corners of
/// the enclosing box are fetched through [`Grid3D::index`], so positions
/// outside the domain clamp to boundary values, however far out they lie.
/// The result is a convex combination of the corners and never leaves their
/// min/max range. Non-finite positions yield NaN rather than a fault.
pub fn trilinear<T: FieldValue>(grid: &Grid3D, field: &[T], pos: Vector3) -> T {
    let fx = pos.x.floor();
    let fy = pos.y.floor();
    let fz = pos.z.floor();

    let x0 = fx as isize;
    let y0 = fy as isize;
    let z0 = fz as isize;
    // Float casts saturate at the isize range; stay there.
    let (x1, y1, z1) = (x0.saturating_add(1), y0.saturating_add(1), z0.saturating_add(1));

    let u = pos.x - fx;
    let v = pos.y - fy;
    let w = pos.z - fz;

    let f000 = field[grid.index(x0, y0, z0)];
    let f100 = field[grid.index(x1, y0, z0)];
    let f010 = field[grid.index(x0, y1, z0)];
    let f110 = field[grid.index(x1, y1, z0)];
    let f001 = field[grid.index(x0, y0, z1)];
    let f101 = field[grid.index(x1, y0, z1)];
    let f011 = field[grid.index(x0, y1, z1)];
    let f111 = field[grid.index(x1, y1, z1)];

    let f00 = linear(f000, f100, u);
    let f10 = linear(f010, f110, u);
    let f01 = linear(f001, f101, u);
    let f11 = linear(f011, f111, u);

    let f0 = linear(f00, f10, v);
    let f1 = linear(f01, f11, v);

    linear(f0, f1, w)
}
