use crate::advection::advect;
use crate::diffusion::{MAX_ITERATIONS, diffuse};
use crate::field::Vector3;
use crate::grid::Grid3D;
use crate::projection::{PressureSeed, ProjectionScratch, project};
use crate::state::{FluidState, GRAVITY_EARTH_M_PER_S2};

/// Per-step inputs that are not part of the fluid state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    pub time_step: f32,
    /// External acceleration applied uniformly to every cell.
    pub force: Vector3,
    /// Sweeps for both diffusion and the pressure solve.
    pub iterations: usize,
    /// Seed each pressure solve with the previous solution.
    pub warm_start: bool,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            time_step: 0.02,
            force: Vector3::new(0.0, 0.0, -GRAVITY_EARTH_M_PER_S2),
            iterations: MAX_ITERATIONS,
            warm_start: true,
        }
    }
}

impl StepParams {
    fn pressure_seed(&self) -> PressureSeed {
        if self.warm_start {
            PressureSeed::Warm
        } else {
            PressureSeed::Zero
        }
    }
}

/// Reusable grid-sized buffers for one step. Contents are meaningless
/// between steps.
#[derive(Debug, Clone)]
pub struct StepScratch {
    pub projection: ProjectionScratch,
    pub velocity: Vec<Vector3>,
    pub density: Vec<f32>,
}

impl StepScratch {
    pub fn new(grid: &Grid3D) -> Self {
        let size = grid.cell_count();
        Self {
            projection: ProjectionScratch::new(grid),
            velocity: vec![Vector3::ZERO; size],
            density: vec![0.0; size],
        }
    }

    pub fn matches(&self, grid: &Grid3D) -> bool {
        let n = grid.cell_count();
        self.velocity.len() == n
            && self.density.len() == n
            && self.projection.divergence.len() == n
            && self.projection.pressure.len() == n
    }
}

/// Advances `state` by one time step.
///
/// The order is fixed: force, diffuse velocity, project, self-advect
/// velocity, project again, diffuse density, advect density.
pub fn simulate_step(
    grid: &Grid3D,
    state: &mut FluidState,
    scratch: &mut StepScratch,
    params: &StepParams,
) {
    assert!(state.matches(grid), "fluid state does not match grid");
    assert!(scratch.matches(grid), "step scratch does not match grid");

    let dt = params.time_step;
    let seed = params.pressure_seed();

    let impulse = params.force * dt;
    for v in state.velocity.iter_mut() {
        *v += impulse;
    }

    diffuse(
        grid,
        &mut state.velocity,
        &mut scratch.velocity,
        state.viscosity,
        dt,
        params.iterations,
    );

    project(
        grid,
        &mut state.velocity,
        &mut state.pressure,
        &mut scratch.projection,
        params.iterations,
        seed,
    );

    scratch.velocity.copy_from_slice(&state.velocity);
    advect(grid, &scratch.velocity, &scratch.velocity, &mut state.velocity, dt);

    project(
        grid,
        &mut state.velocity,
        &mut state.pressure,
        &mut scratch.projection,
        params.iterations,
        seed,
    );

    diffuse(
        grid,
        &mut state.density,
        &mut scratch.density,
        state.diffusion_rate,
        dt,
        params.iterations,
    );

    scratch.density.copy_from_slice(&state.density);
    advect(grid, &state.velocity, &scratch.density, &mut state.density, dt);

    log::trace!("stepped {} cells by dt={}", grid.cell_count(), dt);
}
