use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diffusion::{MAX_ITERATIONS, STABLE_DIFFUSION_LIMIT};
use crate::error::{FluidError, Result};
use crate::field::Vector3;
use crate::grid::Grid3D;
use crate::solver::StepParams;
use crate::state::{
    DENSITY_WATER_KG_PER_M3, GRAVITY_EARTH_M_PER_S2, VISCOSITY_WATER_M2_PER_S,
    WATER_DIFFUSION_RATE,
};

/// Everything needed to build and run a [`crate::Simulation`].
///
/// Missing JSON fields fall back to the water-in-a-tank defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub viscosity: f32,
    pub diffusion_rate: f32,
    pub reference_density: f32,
    pub gravity: Vector3,
    pub time_step: f32,
    pub iterations: usize,
    pub warm_start_pressure: bool,
    /// Depth of the visualised slice; `None` means the middle layer.
    pub slice_z: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nx: 100,
            ny: 100,
            nz: 50,
            viscosity: VISCOSITY_WATER_M2_PER_S,
            diffusion_rate: WATER_DIFFUSION_RATE,
            reference_density: DENSITY_WATER_KG_PER_M3,
            gravity: Vector3::new(0.0, 0.0, -GRAVITY_EARTH_M_PER_S2),
            time_step: 0.02,
            iterations: MAX_ITERATIONS,
            warm_start_pressure: true,
            slice_z: None,
        }
    }
}

impl SimulationConfig {
    /// Default physics on a grid of the given size.
    pub fn with_grid(nx: usize, ny: usize, nz: usize) -> Self {
        Self {
            nx,
            ny,
            nz,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the invariants the solver relies on, including the
    /// `coefficient * time_step <= 1/6` stability bound of the relaxation.
    pub fn validate(&self) -> Result<()> {
        Grid3D::try_new(self.nx, self.ny, self.nz)?;
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(invalid(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if self.iterations == 0 {
            return Err(invalid("iterations must be at least 1".to_string()));
        }
        if !self.reference_density.is_finite() {
            return Err(invalid("reference_density must be finite".to_string()));
        }
        if !self.gravity.is_finite() {
            return Err(invalid("gravity must be finite".to_string()));
        }
        for (name, value) in [
            ("viscosity", self.viscosity),
            ("diffusion_rate", self.diffusion_rate),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
            let k = value * self.time_step;
            if k > STABLE_DIFFUSION_LIMIT {
                return Err(invalid(format!(
                    "{} * time_step = {} exceeds the stable limit {}",
                    name, k, STABLE_DIFFUSION_LIMIT
                )));
            }
        }
        if let Some(z) = self.slice_z {
            if z >= self.nz {
                return Err(invalid(format!(
                    "slice_z {} outside grid depth {}",
                    z, self.nz
                )));
            }
        }
        Ok(())
    }

    /// Panics on extents [`SimulationConfig::validate`] rejects.
    pub fn grid(&self) -> Grid3D {
        Grid3D::new(self.nx, self.ny, self.nz)
    }

    pub fn step_params(&self) -> StepParams {
        StepParams {
            time_step: self.time_step,
            force: self.gravity,
            iterations: self.iterations,
            warm_start: self.warm_start_pressure,
        }
    }

    pub fn slice_depth(&self) -> usize {
        self.slice_z.unwrap_or(self.nz / 2)
    }
}

fn invalid(message: String) -> FluidError {
    FluidError::InvalidConfig(message)
}
