use crate::field::FieldValue;
use crate::grid::Grid3D;
use crate::pingpong::PingPong;

/// Relaxation sweeps per diffusion or pressure solve.
pub const MAX_ITERATIONS: usize = 20;

/// Largest `coefficient * time_step` for which a sweep is a convex
/// combination of the cell and its neighbours (no overshoot).
pub const STABLE_DIFFUSION_LIMIT: f32 = 1.0 / 6.0;

/// Smooths `data` toward its neighbour average.
///
/// Runs `iterations` Jacobi sweeps of `new = old + k * (neighbours - 6 * old)`
/// with `k = coefficient * time_step`, ping-ponging through `scratch`.
/// Boundary cells neighbour themselves, giving a zero-flux boundary. Values
/// are not clamped: callers keep `k` at or below [`STABLE_DIFFUSION_LIMIT`].
pub fn diffuse<T: FieldValue>(
    grid: &Grid3D,
    data: &mut [T],
    scratch: &mut [T],
    coefficient: f32,
    time_step: f32,
    iterations: usize,
) {
    assert_eq!(data.len(), grid.cell_count());
    let k = coefficient * time_step;

    let mut buffers = PingPong::new(data, scratch);
    for _ in 0..iterations {
        let (src, dst) = buffers.read_write();
        relax_sweep(grid, src, dst, k);
        buffers.flip();
    }
    buffers.finish();
}

fn relax_sweep<T: FieldValue>(grid: &Grid3D, src: &[T], dst: &mut [T], k: f32) {
    for (idx, (x, y, z)) in grid.cells().enumerate() {
        let center = src[idx];
        let laplacian = grid.neighbor_sum(src, x, y, z) - center * 6.0;
        dst[idx] = center + laplacian * k;
    }
}
