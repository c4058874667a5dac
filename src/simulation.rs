use crate::FluidSimulation;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::field::Vector3;
use crate::grid::Grid3D;
use crate::solver::{StepParams, StepScratch, simulate_step};
use crate::state::FluidState;

/// A grid, its fluid state and the scratch buffers the step reuses.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid3D,
    state: FluidState,
    scratch: StepScratch,
    config: SimulationConfig,
    params: StepParams,
    frame: usize,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let grid = config.grid();
        let state = FluidState::new(
            &grid,
            config.viscosity,
            config.diffusion_rate,
            config.reference_density,
        );
        log::debug!(
            "new simulation {}x{}x{} dt={} iterations={}",
            grid.nx(),
            grid.ny(),
            grid.nz(),
            config.time_step,
            config.iterations
        );
        Ok(Self {
            scratch: StepScratch::new(&grid),
            params: config.step_params(),
            grid,
            state,
            config,
            frame: 0,
        })
    }

    /// Builds a simulation around an existing state, e.g. a restored
    /// snapshot. The state must match the config's grid.
    pub fn with_state(config: SimulationConfig, state: FluidState) -> Result<Self> {
        let mut sim = Self::new(config)?;
        if !state.matches(&sim.grid) {
            return Err(crate::FluidError::SnapshotMismatch {
                expected: sim.grid.cell_count(),
                got: state.len(),
            });
        }
        sim.state = state;
        Ok(sim)
    }

    pub fn step(&mut self) {
        simulate_step(&self.grid, &mut self.state, &mut self.scratch, &self.params);
        self.frame += 1;
    }

    pub fn grid(&self) -> &Grid3D {
        &self.grid
    }

    pub fn state(&self) -> &FluidState {
        &self.state
    }

    /// Direct access for seeding initial conditions.
    pub fn state_mut(&mut self) -> &mut FluidState {
        &mut self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn params(&self) -> &StepParams {
        &self.params
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn add_density(&mut self, x: usize, y: usize, z: usize, amount: f32) {
        if self.grid.contains(x, y, z) {
            let idx = self.grid.index_of(x, y, z);
            self.state.density[idx] += amount;
        }
    }

    pub fn add_velocity(&mut self, x: usize, y: usize, z: usize, velocity: Vector3) {
        if self.grid.contains(x, y, z) {
            let idx = self.grid.index_of(x, y, z);
            self.state.velocity[idx] += velocity;
        }
    }

    /// Replaces the grid, reallocating state and scratch together. Field
    /// contents restart from rest.
    pub fn resize(&mut self, nx: usize, ny: usize, nz: usize) -> Result<()> {
        let config = SimulationConfig {
            nx,
            ny,
            nz,
            slice_z: None,
            ..self.config.clone()
        };
        config.validate()?;
        self.grid = config.grid();
        self.state.resize(&self.grid, config.reference_density);
        self.scratch = StepScratch::new(&self.grid);
        self.config = config;
        self.frame = 0;
        log::debug!("resized simulation to {}x{}x{}", nx, ny, nz);
        Ok(())
    }
}

impl FluidSimulation for Simulation {
    fn step(&mut self) {
        Simulation::step(self)
    }

    fn add_force(&mut self, x: usize, y: usize, z: usize, force: Vector3) {
        let dt = self.params.time_step;
        self.add_velocity(x, y, z, force * dt)
    }

    fn add_density(&mut self, x: usize, y: usize, z: usize, amount: f32) {
        Simulation::add_density(self, x, y, z, amount)
    }

    fn dimensions(&self) -> (usize, usize, usize) {
        self.grid.dimensions()
    }
}
