use rayon::prelude::*;

use crate::export::FluidData;
use crate::projection::{compute_divergence, divergence_energy};

const TREND_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct FluidMetrics {
    pub total_mass: f32,
    pub min_density: f32,
    pub max_density: f32,
    pub avg_density: f32,
    pub total_kinetic_energy: f32,
    pub max_speed: f32,
    pub avg_speed: f32,
    /// Sum of squared divergence over all cells.
    pub divergence_energy: f32,
    pub max_pressure: f32,
    pub frame: usize,
}

impl FluidMetrics {
    pub fn analyze(simulation: &impl FluidData, frame: usize) -> Self {
        let density = simulation.density();
        let velocity = simulation.velocity();
        let size = density.len().max(1) as f32;

        let total_mass: f32 = density.par_iter().sum();
        let (min_density, max_density) = density
            .par_iter()
            .map(|&d| (d, d))
            .reduce(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(lo1, hi1), (lo2, hi2)| (lo1.min(lo2), hi1.max(hi2)),
            );

        let (total_kinetic_energy, speed_sum, max_speed) = density
            .par_iter()
            .zip(velocity.par_iter())
            .map(|(&rho, v)| {
                let speed = v.length();
                (0.5 * rho * speed * speed, speed, speed)
            })
            .reduce(
                || (0.0, 0.0, 0.0),
                |(e1, s1, m1), (e2, s2, m2)| (e1 + e2, s1 + s2, m1.max(m2)),
            );

        let mut divergence = vec![0.0; density.len()];
        compute_divergence(simulation.grid(), velocity, &mut divergence);

        let max_pressure = simulation
            .pressure()
            .par_iter()
            .map(|p| p.abs())
            .reduce(|| 0.0, f32::max);

        Self {
            total_mass,
            min_density,
            max_density,
            avg_density: total_mass / size,
            total_kinetic_energy,
            max_speed,
            avg_speed: speed_sum / size,
            divergence_energy: divergence_energy(&divergence),
            max_pressure,
            frame,
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "frame {}: mass={:.3} density=[{:.3}, {:.3}] avg={:.3} ke={:.6} speed max={:.6} avg={:.6} div²={:.3e} |p|max={:.3e}",
            self.frame,
            self.total_mass,
            self.min_density,
            self.max_density,
            self.avg_density,
            self.total_kinetic_energy,
            self.max_speed,
            self.avg_speed,
            self.divergence_energy,
            self.max_pressure
        );
    }
}

#[derive(Debug, Default)]
pub struct AnalysisRecorder {
    pub metrics_history: Vec<FluidMetrics>,
}

impl AnalysisRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, simulation: &impl FluidData, frame: usize) -> &FluidMetrics {
        self.metrics_history
            .push(FluidMetrics::analyze(simulation, frame));
        &self.metrics_history[self.metrics_history.len() - 1]
    }

    /// Relative change in total mass between the first and last record.
    pub fn mass_drift(&self) -> Option<f32> {
        let (first, last) = (self.metrics_history.first()?, self.metrics_history.last()?);
        Some(percent_change(first.total_mass, last.total_mass))
    }

    pub fn log_trends(&self) {
        let (Some(first), Some(last)) = (self.metrics_history.first(), self.metrics_history.last())
        else {
            return;
        };
        if self.metrics_history.len() < 2 {
            return;
        }

        log::info!(
            "mass change: {:.6} -> {:.6} ({:+.3}%)",
            first.total_mass,
            last.total_mass,
            percent_change(first.total_mass, last.total_mass)
        );
        log::info!(
            "kinetic energy change: {:.6} -> {:.6} ({:+.3}%)",
            first.total_kinetic_energy,
            last.total_kinetic_energy,
            percent_change(first.total_kinetic_energy, last.total_kinetic_energy)
        );
        log::info!(
            "divergence change: {:.3e} -> {:.3e}",
            first.divergence_energy,
            last.divergence_energy
        );
    }
}

fn percent_change(from: f32, to: f32) -> f32 {
    (to - from) / from.abs().max(TREND_EPSILON) * 100.0
}
