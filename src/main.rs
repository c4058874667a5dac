use std::path::{Path, PathBuf};

use fluidsim::scenario::{apply_density_blob, random_velocity};
use fluidsim::{AnalysisRecorder, ImageExporter, Simulation, SimulationConfig, Snapshot};
use rand::SeedableRng;
use rand::rngs::StdRng;

const IMAGE_SIZE: u32 = 512;

struct Args {
    config: Option<PathBuf>,
    steps: usize,
    out: PathBuf,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let mut args = Args {
        config: None,
        steps: 20,
        out: PathBuf::from("frames"),
        seed: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--steps" => args.steps = iter.next().ok_or("--steps needs a value")?.parse()?,
            "--out" => args.out = PathBuf::from(iter.next().ok_or("--out needs a value")?),
            "--seed" => args.seed = Some(iter.next().ok_or("--seed needs a value")?.parse()?),
            other if other.starts_with("--") => {
                return Err(format!("unknown flag {}", other).into());
            }
            path => args.config = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    log::info!(
        "running {} steps on a {}x{}x{} grid",
        args.steps,
        config.nx,
        config.ny,
        config.nz
    );

    let mut simulation = Simulation::new(config)?;
    if let Some(seed) = args.seed {
        seed_initial_conditions(&mut simulation, seed);
    }

    run_headless(&mut simulation, args.steps, &args.out)
}

fn seed_initial_conditions(simulation: &mut Simulation, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let grid = *simulation.grid();
    let velocity = random_velocity(&grid, &mut rng, 0.5);
    let center = grid.cell_center(grid.nx() / 2, grid.ny() / 2, grid.nz() / 2);
    let radius = grid.nx().min(grid.ny()).min(grid.nz()) as f32 / 4.0;
    let reference = simulation.config().reference_density;

    let state = simulation.state_mut();
    state.velocity = velocity;
    apply_density_blob(state, &grid, center, radius, reference * 0.1);
    log::info!("seeded random velocity and a density blob (seed {})", seed);
}

fn run_headless(
    simulation: &mut Simulation,
    steps: usize,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(out)?;
    let exporter = ImageExporter::new(IMAGE_SIZE, IMAGE_SIZE);
    let mut recorder = AnalysisRecorder::new();
    let z = simulation.config().slice_depth();

    recorder.record_frame(&*simulation, 0).log_summary();
    export_frame(&exporter, simulation, z, out, 0)?;

    for frame in 1..=steps {
        simulation.step();
        let metrics = recorder.record_frame(&*simulation, frame);
        if frame % 5 == 0 {
            metrics.log_summary();
        }
        export_frame(&exporter, simulation, z, out, frame)?;
    }

    recorder.log_trends();

    let snapshot_path = out.join("snapshot.json");
    Snapshot::capture(simulation.grid(), simulation.state()).save_json(&snapshot_path)?;
    log::info!(
        "wrote {} frames and {}",
        steps + 1,
        snapshot_path.display()
    );
    Ok(())
}

fn export_frame(
    exporter: &ImageExporter,
    simulation: &Simulation,
    z: usize,
    out: &Path,
    frame: usize,
) -> fluidsim::Result<()> {
    exporter.export_density_png(simulation, z, &out.join(format!("density_{:04}.png", frame)))?;
    exporter.export_speed_png(simulation, z, &out.join(format!("speed_{:04}.png", frame)))?;
    Ok(())
}
