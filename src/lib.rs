//! Grid-based 3D incompressible fluid simulation.
//!
//! Each step runs the stable fluids pipeline on a dense clamped grid:
//! external force, viscous diffusion, projection, self-advection, a second
//! projection, density diffusion and density advection.

pub mod advection;
pub mod analysis;
pub mod config;
pub mod diffusion;
pub mod error;
pub mod export;
pub mod field;
pub mod grid;
pub mod interpolate;
pub mod pingpong;
pub mod projection;
pub mod render;
pub mod scenario;
pub mod simulation;
pub mod solver;
pub mod state;

// Uniform surface shared by anything that can be stepped and driven.
pub trait FluidSimulation {
    fn step(&mut self);
    fn add_force(&mut self, x: usize, y: usize, z: usize, force: Vector3);
    fn add_density(&mut self, x: usize, y: usize, z: usize, amount: f32);
    fn dimensions(&self) -> (usize, usize, usize);
}

pub use analysis::{AnalysisRecorder, FluidMetrics};
pub use config::SimulationConfig;
pub use error::{FluidError, Result};
pub use export::{FluidData, ImageExporter, Snapshot};
pub use field::{FieldValue, Vector3};
pub use grid::Grid3D;
pub use render::{Renderer, Slice, SliceField};
pub use simulation::Simulation;
pub use solver::{StepParams, StepScratch, simulate_step};
pub use state::FluidState;
