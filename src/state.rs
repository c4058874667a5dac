use crate::field::Vector3;
use crate::grid::Grid3D;

pub const DENSITY_WATER_KG_PER_M3: f32 = 997.0;
pub const GRAVITY_EARTH_M_PER_S2: f32 = 9.807;
pub const VISCOSITY_WATER_M2_PER_S: f32 = 1.0e-6;
pub const WATER_DIFFUSION_RATE: f32 = 0.001;

/// Mutable per-cell simulation state.
///
/// `velocity`, `density` and `pressure` always have the length of the grid
/// they were built for; [`FluidState::resize`] reallocates all three
/// together. `pressure` is the last solved pressure and seeds the next
/// projection when warm starting.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidState {
    pub velocity: Vec<Vector3>,
    pub density: Vec<f32>,
    pub pressure: Vec<f32>,
    pub viscosity: f32,
    pub diffusion_rate: f32,
}

impl FluidState {
    /// Zero velocity and pressure, uniform `reference_density`.
    pub fn new(grid: &Grid3D, viscosity: f32, diffusion_rate: f32, reference_density: f32) -> Self {
        debug_assert!(viscosity >= 0.0 && diffusion_rate >= 0.0);
        let size = grid.cell_count();
        Self {
            velocity: vec![Vector3::ZERO; size],
            density: vec![reference_density; size],
            pressure: vec![0.0; size],
            viscosity,
            diffusion_rate,
        }
    }

    /// Water at rest with the reference coefficients.
    pub fn water(grid: &Grid3D) -> Self {
        Self::new(
            grid,
            VISCOSITY_WATER_M2_PER_S,
            WATER_DIFFUSION_RATE,
            DENSITY_WATER_KG_PER_M3,
        )
    }

    pub fn len(&self) -> usize {
        self.density.len()
    }

    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }

    /// Reallocates every field for `grid`, discarding the previous contents.
    pub fn resize(&mut self, grid: &Grid3D, reference_density: f32) {
        let size = grid.cell_count();
        self.velocity = vec![Vector3::ZERO; size];
        self.density = vec![reference_density; size];
        self.pressure = vec![0.0; size];
    }

    pub fn reset_pressure(&mut self) {
        self.pressure.fill(0.0);
    }

    /// True when every array matches the grid's cell count.
    pub fn matches(&self, grid: &Grid3D) -> bool {
        let n = grid.cell_count();
        self.velocity.len() == n && self.density.len() == n && self.pressure.len() == n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_at_rest() {
        let grid = Grid3D::new(3, 4, 5);
        let state = FluidState::water(&grid);
        assert_eq!(state.len(), 60);
        assert!(state.matches(&grid));
        assert!(state.velocity.iter().all(|v| *v == Vector3::ZERO));
        assert!(state.pressure.iter().all(|p| *p == 0.0));
        assert!(state.density.iter().all(|d| *d == DENSITY_WATER_KG_PER_M3));
    }

    #[test]
    fn test_resize_reallocates_in_lockstep() {
        let grid = Grid3D::new(2, 2, 2);
        let mut state = FluidState::new(&grid, 0.1, 0.2, 1.0);
        state.velocity[3] = Vector3::ONE;
        state.pressure[1] = 4.0;

        let bigger = Grid3D::new(3, 3, 3);
        state.resize(&bigger, 5.0);
        assert!(state.matches(&bigger));
        assert!(state.velocity.iter().all(|v| *v == Vector3::ZERO));
        assert!(state.density.iter().all(|d| *d == 5.0));
        assert_eq!(state.viscosity, 0.1);
        assert_eq!(state.diffusion_rate, 0.2);
    }

    #[test]
    fn test_reset_pressure_keeps_other_fields() {
        let grid = Grid3D::new(2, 2, 2);
        let mut state = FluidState::water(&grid);
        state.pressure.fill(3.5);
        state.velocity[2] = Vector3::X;
        state.reset_pressure();
        assert!(state.pressure.iter().all(|p| *p == 0.0));
        assert_eq!(state.velocity[2], Vector3::X);
        assert!(state.matches(&grid));
    }
}
