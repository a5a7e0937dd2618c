use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use glam::{IVec3, Vec3};
use tracing_subscriber::EnvFilter;
use voxworld_author::Editor;
use voxworld_camera::CameraRig;
use voxworld_common::{AddressingMode, SimConfig, compute_interaction, interaction_backend};
use voxworld_debris::{DebrisService, WorkerMessage};
use voxworld_input::{Action, IntentFrame};
use voxworld_locomotion::LocomotionController;
use voxworld_terrain::{SharedTerrain, WorldGenerator};
use voxworld_tools::TerrainInspector;

#[derive(Parser)]
#[command(name = "voxworld-cli", about = "CLI tool for voxworld simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Sphere,
    Plane,
}

impl From<Mode> for AddressingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sphere => AddressingMode::Spherical,
            Mode::Plane => AddressingMode::Planar,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and backend info
    Info,
    /// Generate a world and print its summary
    Generate {
        /// World seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,
    },
    /// Walk the agent with a scripted intent sequence
    Walk {
        #[arg(short, long)]
        seed: Option<u64>,
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,
        /// Number of 60 Hz ticks to simulate
        #[arg(short, long, default_value = "300")]
        ticks: u32,
    },
    /// Remove the first solid voxel, then undo
    Edit {
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Run the debris worker for a while
    Debris {
        /// Number of debris bodies to spawn
        #[arg(short, long, default_value = "15")]
        spawns: usize,
        /// How long to collect updates, in milliseconds
        #[arg(long, default_value = "500")]
        millis: u64,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SimConfig> {
    match path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SimConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("voxworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "interaction backend: {:?} (unit-distance sample {:.3})",
                interaction_backend(),
                compute_interaction(0.0, 0.0, 0.0, 1.0, 0.0, 0.0)
            );
            println!(
                "world: mode={:?} seed={} voxel_size={}",
                config.world.mode, config.world.seed, config.world.voxel_size
            );
            println!("debris: pool={} tick={}ms", config.debris.pool_size, config.debris.tick_ms);
        }
        Commands::Generate { seed, mode } => {
            apply_overrides(&mut config, seed, mode);
            let terrain = WorldGenerator::new(config.world.clone()).build(config.world.seed);
            println!("{}", TerrainInspector::summary(&terrain));
        }
        Commands::Walk { seed, mode, ticks } => {
            apply_overrides(&mut config, seed, mode);
            walk(&config, ticks);
        }
        Commands::Edit { seed } => {
            apply_overrides(&mut config, seed, None);
            edit(&config)?;
        }
        Commands::Debris { spawns, millis } => {
            debris(&config, spawns, Duration::from_millis(millis))?;
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut SimConfig, seed: Option<u64>, mode: Option<Mode>) {
    if let Some(seed) = seed {
        config.world.seed = seed;
    }
    if let Some(mode) = mode {
        config.world.mode = mode.into();
    }
}

fn walk(config: &SimConfig, ticks: u32) {
    let terrain = WorldGenerator::new(config.world.clone()).build(config.world.seed);
    let mut controller = LocomotionController::spawn(config.locomotion.clone(), &terrain);
    let mut rig = CameraRig::new(config.camera.clone());
    let dt = 1.0 / 60.0;

    for tick in 0..ticks {
        let t = tick as f32 * dt;
        let mut frame = IntentFrame::new();
        frame.push(Action::Move {
            forward: 1.0,
            strafe: (t * 0.5).sin(),
        });
        frame.push(Action::Rotate {
            yaw: (t * 0.25).cos() * 0.5,
            pitch: 0.0,
        });
        if tick == ticks / 2 {
            frame.push(Action::ToggleCamera);
        }
        let (intent, _) = frame.finish();

        let agent = *controller.update(dt, &intent, &terrain);
        rig.apply_intent(&intent.camera);
        let view = rig.update(&agent);
        if tick % 60 == 0 {
            println!(
                "tick {tick:>4}: pos=({:.2}, {:.2}, {:.2}) outcome={:?} camera={:?} eye=({:.2}, {:.2}, {:.2})",
                agent.position.x,
                agent.position.y,
                agent.position.z,
                controller.last_step().outcome,
                rig.mode(),
                view.eye.x,
                view.eye.y,
                view.eye.z,
            );
        }
    }
    let p = controller.state().position;
    println!("final position: ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
}

fn edit(config: &SimConfig) -> anyhow::Result<()> {
    let terrain = WorldGenerator::new(config.world.clone()).build(config.world.seed);
    let shared = SharedTerrain::new(terrain);
    let target: IVec3 = TerrainInspector::list_solid(&shared.snapshot())
        .into_iter()
        .next()
        .context("world has no solid voxels")?;

    let before = shared.snapshot().state_hash();
    let mut editor = Editor::new();
    editor.apply_action(&shared, &Action::RemoveVoxel(target))?;
    println!(
        "removed {target}: hash {before:016x} -> {:016x}",
        shared.snapshot().state_hash()
    );
    editor.apply_action(&shared, &Action::Undo)?;
    let after = shared.snapshot().state_hash();
    println!(
        "undone: hash {after:016x} ({})",
        if after == before { "restored" } else { "MISMATCH" }
    );
    Ok(())
}

fn debris(config: &SimConfig, spawns: usize, window: Duration) -> anyhow::Result<()> {
    let mut service = DebrisService::start(config.debris.clone())?;
    service.init()?;
    let positions: Vec<Vec3> = (0..spawns)
        .map(|k| Vec3::new(k as f32 * 0.5, 5.0, 0.0))
        .collect();
    service.spawn(&positions)?;

    let deadline = Instant::now() + window;
    let mut updates = 0;
    let mut last_active = 0;
    while Instant::now() < deadline {
        match service.recv_timeout(Duration::from_millis(50)) {
            Some(WorkerMessage::Inited) => println!("worker ready"),
            Some(WorkerMessage::Update { positions }) => {
                updates += 1;
                last_active = positions.len();
            }
            None => {}
        }
    }
    service.terminate();
    println!("updates received: {updates}, active bodies in last update: {last_active}");
    Ok(())
}
