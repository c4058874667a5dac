use fluidsim::projection::{
    PressureSeed, ProjectionScratch, compute_divergence, divergence_energy, project,
};
use fluidsim::scenario::{apply_density_blob, random_velocity};
use fluidsim::{
    FluidMetrics, FluidState, Grid3D, Simulation, SimulationConfig, Snapshot, StepParams,
    StepScratch, Vector3, simulate_step,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn still_water(nx: usize, ny: usize, nz: usize) -> SimulationConfig {
    SimulationConfig {
        viscosity: 0.0,
        diffusion_rate: 0.0,
        ..SimulationConfig::with_grid(nx, ny, nz)
    }
}

#[test]
fn test_gravity_end_to_end() {
    let mut sim = Simulation::new(still_water(4, 4, 4)).unwrap();
    sim.step();

    for v in &sim.state().velocity {
        assert!((v.z + 0.19614).abs() < 1e-5, "vz = {}", v.z);
        assert!(v.x.abs() < 1e-6 && v.y.abs() < 1e-6);
    }
    assert!(sim.state().density.iter().all(|d| (*d - 997.0).abs() < 1e-3));

    let grid = *sim.grid();
    let mut divergence = vec![0.0; grid.cell_count()];
    compute_divergence(&grid, &sim.state().velocity, &mut divergence);
    for z in 1..3 {
        for y in 1..3 {
            for x in 1..3 {
                assert!(divergence[grid.index_of(x, y, z)].abs() < 1e-5);
            }
        }
    }
}

#[test]
fn test_projection_reduces_random_divergence() {
    let grid = Grid3D::new(8, 8, 8);
    let mut rng = StdRng::seed_from_u64(42);
    let mut velocity = random_velocity(&grid, &mut rng, 1.0);
    let mut pressure = vec![0.0; grid.cell_count()];
    let mut scratch = ProjectionScratch::new(&grid);

    let mut divergence = vec![0.0; grid.cell_count()];
    compute_divergence(&grid, &velocity, &mut divergence);
    let before = divergence_energy(&divergence);

    project(&grid, &mut velocity, &mut pressure, &mut scratch, 20, PressureSeed::Zero);
    compute_divergence(&grid, &velocity, &mut divergence);
    let after = divergence_energy(&divergence);

    assert!(after < before * 0.5, "divergence {} -> {}", before, after);
}

#[test]
fn test_step_reduces_divergence_and_bounds_density() {
    let grid = Grid3D::new(8, 8, 8);
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = FluidState::water(&grid);
    state.velocity = random_velocity(&grid, &mut rng, 0.5);
    apply_density_blob(&mut state, &grid, Vector3::splat(4.0), 2.5, 100.0);
    let initial_max = state.density.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

    let mut divergence = vec![0.0; grid.cell_count()];
    compute_divergence(&grid, &state.velocity, &mut divergence);
    let before = divergence_energy(&divergence);

    let mut scratch = StepScratch::new(&grid);
    let params = StepParams::default();
    for _ in 0..5 {
        simulate_step(&grid, &mut state, &mut scratch, &params);
        for d in &state.density {
            assert!(*d >= 997.0 - 1e-2 && *d <= initial_max + 1e-2, "density {}", d);
        }
    }

    compute_divergence(&grid, &state.velocity, &mut divergence);
    let after = divergence_energy(&divergence);
    assert!(after < before, "divergence {} -> {}", before, after);
}

#[test]
fn test_cold_and_warm_pressure_agree_on_still_water() {
    for warm in [true, false] {
        let config = SimulationConfig {
            warm_start_pressure: warm,
            ..still_water(5, 5, 5)
        };
        let mut sim = Simulation::new(config).unwrap();
        for _ in 0..3 {
            sim.step();
        }
        let expected = -9.807 * 0.02 * 3.0;
        assert!(
            sim.state()
                .velocity
                .iter()
                .all(|v| (v.z - expected).abs() < 1e-4)
        );
    }
}

#[test]
fn test_odd_iteration_budget_runs() {
    let config = SimulationConfig {
        iterations: 7,
        ..SimulationConfig::with_grid(6, 6, 6)
    };
    let mut sim = Simulation::new(config).unwrap();
    sim.add_velocity(3, 3, 3, Vector3::new(2.0, 0.0, 0.0));
    sim.step();
    let metrics = FluidMetrics::analyze(&sim, sim.frame());
    assert!(metrics.max_speed.is_finite());
    assert!(metrics.max_speed > 0.0);
}

#[test]
fn test_snapshot_resumes_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let config = SimulationConfig::with_grid(6, 6, 6);
    let mut original = Simulation::new(config.clone()).unwrap();
    original.add_velocity(2, 3, 3, Vector3::new(1.0, 0.5, 0.0));
    original.add_density(3, 3, 3, 50.0);
    original.step();

    Snapshot::capture(original.grid(), original.state())
        .save_json(&path)
        .unwrap();
    let restored_state = Snapshot::load_json(&path).unwrap().restore().unwrap();
    let mut resumed = Simulation::with_state(config, restored_state).unwrap();

    original.step();
    resumed.step();
    assert_eq!(original.state(), resumed.state());
}
