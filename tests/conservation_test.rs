use fluidsim::{FluidState, Grid3D, StepParams, StepScratch, Vector3, simulate_step};

fn layered_density(grid: &Grid3D) -> FluidState {
    let mut state = FluidState::new(grid, 0.0, 0.0, 997.0);
    for (idx, (x, y, z)) in grid.cells().enumerate() {
        state.density[idx] = 997.0 + (x + 2 * y + 3 * z) as f32;
    }
    state
}

#[test]
fn test_zero_forcing_leaves_state_unchanged() {
    let grid = Grid3D::new(6, 5, 4);
    let mut state = layered_density(&grid);
    let initial = state.clone();
    let mut scratch = StepScratch::new(&grid);
    let params = StepParams {
        force: Vector3::ZERO,
        ..StepParams::default()
    };

    for step in 0..25 {
        simulate_step(&grid, &mut state, &mut scratch, &params);
        assert_eq!(state.density, initial.density, "density changed at step {}", step);
        assert_eq!(state.velocity, initial.velocity, "velocity changed at step {}", step);
    }
}

#[test]
fn test_pure_diffusion_conserves_mass() {
    let grid = Grid3D::new(8, 8, 8);
    let mut state = FluidState::new(&grid, 0.0, 1.0, 0.0);
    state.density[grid.index_of(4, 4, 4)] = 1000.0;
    state.density[grid.index_of(0, 7, 2)] = 250.0;
    let mut scratch = StepScratch::new(&grid);
    let params = StepParams {
        time_step: 0.1,
        force: Vector3::ZERO,
        ..StepParams::default()
    };

    let initial: f32 = state.density.iter().sum();
    for _ in 0..10 {
        simulate_step(&grid, &mut state, &mut scratch, &params);
    }
    let total: f32 = state.density.iter().sum();

    println!("Mass: {:.6} -> {:.6}", initial, total);
    assert!((total - initial).abs() / initial < 1e-4);
    assert!(state.density[grid.index_of(4, 4, 4)] < 1000.0);
    assert!(state.velocity.iter().all(|v| *v == Vector3::ZERO));
}

#[test]
fn test_diffusion_respects_maximum_principle() {
    let grid = Grid3D::new(6, 6, 6);
    let mut state = FluidState::new(&grid, 0.0, 1.5, 0.0);
    for (idx, (x, y, z)) in grid.cells().enumerate() {
        state.density[idx] = ((x * 7 + y * 3 + z * 5) % 11) as f32;
    }
    let mut scratch = StepScratch::new(&grid);
    let params = StepParams {
        time_step: 0.1,
        force: Vector3::ZERO,
        ..StepParams::default()
    };

    let mut previous_max = 10.0f32;
    for _ in 0..5 {
        simulate_step(&grid, &mut state, &mut scratch, &params);
        let max = state.density.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min = state.density.iter().cloned().fold(f32::INFINITY, f32::min);
        assert!(max <= previous_max + 1e-4, "max grew from {} to {}", previous_max, max);
        assert!(min >= -1e-4);
        previous_max = max;
    }
}
