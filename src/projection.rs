//! Pressure projection: removes the divergent part of the velocity field.
//!
//! The three phases run over the same clamped grid:
//! 1. [`compute_divergence`] takes central differences of each velocity
//!    component along its own axis.
//! 2. [`solve_pressure`] relaxes the discrete Poisson equation
//!    `laplacian(p) = divergence` with Jacobi sweeps.
//! 3. [`subtract_pressure_gradient`] subtracts the central-difference
//!    pressure gradient from the velocity.

use crate::field::Vector3;
use crate::grid::Grid3D;
use crate::pingpong::PingPong;

/// Cell spacing used by the pressure gradient.
pub const GRID_SPACING: f32 = 0.5;

/// Grid-sized buffers used by [`project`].
#[derive(Debug, Clone)]
pub struct ProjectionScratch {
    pub divergence: Vec<f32>,
    pub pressure: Vec<f32>,
}

impl ProjectionScratch {
    pub fn new(grid: &Grid3D) -> Self {
        let size = grid.cell_count();
        Self {
            divergence: vec![0.0; size],
            pressure: vec![0.0; size],
        }
    }
}

/// How the pressure solve is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureSeed {
    /// Start from the pressure left by the previous projection.
    Warm,
    /// Start from zero.
    Zero,
}

pub fn compute_divergence(grid: &Grid3D, velocity: &[Vector3], divergence: &mut [f32]) {
    assert_eq!(velocity.len(), grid.cell_count());
    for (idx, (x, y, z)) in grid.cells().enumerate() {
        let (x, y, z) = (x as isize, y as isize, z as isize);
        let dx = velocity[grid.index(x + 1, y, z)].x - velocity[grid.index(x - 1, y, z)].x;
        let dy = velocity[grid.index(x, y + 1, z)].y - velocity[grid.index(x, y - 1, z)].y;
        let dz = velocity[grid.index(x, y, z + 1)].z - velocity[grid.index(x, y, z - 1)].z;
        divergence[idx] = (dx + dy + dz) / 2.0;
    }
}

/// Relaxes `pressure` in place; its incoming contents are the initial guess.
pub fn solve_pressure(
    grid: &Grid3D,
    divergence: &[f32],
    pressure: &mut [f32],
    scratch: &mut [f32],
    iterations: usize,
) {
    assert_eq!(divergence.len(), grid.cell_count());
    let mut buffers = PingPong::new(pressure, scratch);
    for _ in 0..iterations {
        let (src, dst) = buffers.read_write();
        for (idx, (x, y, z)) in grid.cells().enumerate() {
            dst[idx] = (grid.neighbor_sum(src, x, y, z) - divergence[idx]) / 6.0;
        }
        buffers.flip();
    }
    buffers.finish();
}

pub fn subtract_pressure_gradient(grid: &Grid3D, pressure: &[f32], velocity: &mut [Vector3]) {
    assert_eq!(pressure.len(), grid.cell_count());
    let scale = 1.0 / (2.0 * GRID_SPACING);
    for (idx, (x, y, z)) in grid.cells().enumerate() {
        let (x, y, z) = (x as isize, y as isize, z as isize);
        let gradient = Vector3::new(
            pressure[grid.index(x + 1, y, z)] - pressure[grid.index(x - 1, y, z)],
            pressure[grid.index(x, y + 1, z)] - pressure[grid.index(x, y - 1, z)],
            pressure[grid.index(x, y, z + 1)] - pressure[grid.index(x, y, z - 1)],
        ) * scale;
        velocity[idx] -= gradient;
    }
}

/// Runs divergence, pressure solve and gradient subtraction in order.
///
/// `pressure` is the persistent pressure field (read as the warm start,
/// overwritten with the solution); `scratch` holds the divergence and the
/// second pressure buffer.
pub fn project(
    grid: &Grid3D,
    velocity: &mut [Vector3],
    pressure: &mut [f32],
    scratch: &mut ProjectionScratch,
    iterations: usize,
    seed: PressureSeed,
) {
    if seed == PressureSeed::Zero {
        pressure.fill(0.0);
    }
    compute_divergence(grid, velocity, &mut scratch.divergence);
    solve_pressure(
        grid,
        &scratch.divergence,
        pressure,
        &mut scratch.pressure,
        iterations,
    );
    subtract_pressure_gradient(grid, pressure, velocity);
}

/// Sum of squared divergence, the usual incompressibility residual.
pub fn divergence_energy(divergence: &[f32]) -> f32 {
    divergence.iter().map(|d| d * d).sum()
}
