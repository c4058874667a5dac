use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fluidsim::advection::advect;
use fluidsim::diffusion::{MAX_ITERATIONS, diffuse};
use fluidsim::projection::{PressureSeed, ProjectionScratch, project};
use fluidsim::scenario::random_velocity;
use fluidsim::{Grid3D, Simulation, SimulationConfig, Vector3};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn benchmark_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");
    group.sample_size(20);

    // Test different grid sizes
    for size in [16, 32, 48].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut sim = Simulation::new(SimulationConfig::with_grid(size, size, size)).unwrap();

            // Add some initial state
            sim.add_density(size / 2, size / 2, size / 2, 100.0);
            sim.add_velocity(size / 2, size / 2, size / 2, Vector3::new(5.0, 0.0, 0.0));

            b.iter(|| {
                black_box(sim.step());
            });
        });
    }
    group.finish();
}

fn benchmark_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("operations");
    let grid = Grid3D::new(32, 32, 32);
    let mut rng = StdRng::seed_from_u64(1);
    let velocity = random_velocity(&grid, &mut rng, 1.0);
    let density = vec![997.0f32; grid.cell_count()];

    group.bench_function("project_velocity", |b| {
        let mut velocity = velocity.clone();
        let mut pressure = vec![0.0; grid.cell_count()];
        let mut scratch = ProjectionScratch::new(&grid);
        b.iter(|| {
            // Called 2x per step, MAX_ITERATIONS pressure sweeps each
            project(
                &grid,
                &mut velocity,
                &mut pressure,
                &mut scratch,
                MAX_ITERATIONS,
                PressureSeed::Warm,
            );
            black_box(&velocity);
        });
    });

    group.bench_function("diffuse_velocity", |b| {
        let mut velocity = velocity.clone();
        let mut scratch = vec![Vector3::ZERO; grid.cell_count()];
        b.iter(|| {
            diffuse(&grid, &mut velocity, &mut scratch, 0.001, 0.02, MAX_ITERATIONS);
            black_box(&velocity);
        });
    });

    group.bench_function("advect_density", |b| {
        let mut out = vec![0.0f32; grid.cell_count()];
        b.iter(|| {
            advect(&grid, &velocity, &density, &mut out, 0.02);
            black_box(&out);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_step, benchmark_operations);
criterion_main!(benches);
