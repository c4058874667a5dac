use crate::field::{FieldValue, Vector3};
use crate::grid::Grid3D;
use crate::interpolate::trilinear;

/// Semi-Lagrangian transport of `source` through `velocity` into `out`.
///
/// Each cell's centre `(x + 0.5, y + 0.5, z + 0.5)` is traced backwards by
/// `velocity * time_step` and `source` is resampled there. Samples sit at
/// cell centres, so the traced point is shifted by half a cell into the
/// sample space of [`trilinear`]. With zero velocity every cell reads its
/// own value back.
///
/// `source` and `out` must not alias; self-advection passes a copy of the
/// velocity as both `velocity` and `source`.
pub fn advect<T: FieldValue>(
    grid: &Grid3D,
    velocity: &[Vector3],
    source: &[T],
    out: &mut [T],
    time_step: f32,
) {
    assert_eq!(velocity.len(), grid.cell_count());
    assert_eq!(source.len(), out.len());
    let half = Vector3::splat(0.5);
    for (idx, (x, y, z)) in grid.cells().enumerate() {
        let center = grid.cell_center(x, y, z);
        let prev_pos = center - velocity[idx] * time_step;
        out[idx] = trilinear(grid, source, prev_pos - half);
    }
}
