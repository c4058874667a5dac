//! Reproducible initial conditions.

use rand::Rng;

use crate::field::Vector3;
use crate::grid::Grid3D;
use crate::state::FluidState;

/// Independent uniform components in `[-amplitude, amplitude]` per cell.
pub fn random_velocity(grid: &Grid3D, rng: &mut impl Rng, amplitude: f32) -> Vec<Vector3> {
    (0..grid.cell_count())
        .map(|_| {
            Vector3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            ) * amplitude
        })
        .collect()
}

/// Extra density per cell for a ball of `radius` cells around `center`,
/// falling off linearly to zero at the edge.
pub fn density_blob(grid: &Grid3D, center: Vector3, radius: f32, amount: f32) -> Vec<f32> {
    grid.cells()
        .map(|(x, y, z)| {
            let d = grid.cell_center(x, y, z).distance(center);
            if d < radius {
                amount * (1.0 - d / radius)
            } else {
                0.0
            }
        })
        .collect()
}

pub fn apply_density_blob(
    state: &mut FluidState,
    grid: &Grid3D,
    center: Vector3,
    radius: f32,
    amount: f32,
) {
    for (d, extra) in state
        .density
        .iter_mut()
        .zip(density_blob(grid, center, radius, amount))
    {
        *d += extra;
    }
}
