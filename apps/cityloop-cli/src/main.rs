use anyhow::Context;
use cityloop_citygen::CityLayoutGenerator;
use cityloop_input::{InputState, Key};
use cityloop_kernel::{ColliderIndex, EntityKind, World};
use cityloop_render::{DebugTextRenderer, Renderer};
use cityloop_sim::{SimConfig, Simulation};
use cityloop_stream::TickStats;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cityloop-cli", about = "Headless driver for the cityloop simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file; defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the city seed
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective config as YAML
    Config,
    /// Generate the city and print its statistics
    Generate,
    /// Run the simulation headless with a scripted input
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Input script to play
        #[arg(long, value_enum, default_value = "walk")]
        script: Script,
        /// Seconds per tick
        #[arg(long, default_value = "0.016666")]
        dt: f32,
        /// List every entity in the final frame
        #[arg(long)]
        list: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Script {
    /// No input at all
    Idle,
    /// Hold forward on foot
    Walk,
    /// Get in the vehicle, then hold the throttle
    Drive,
}

#[derive(Serialize)]
struct RunSummary {
    ticks: u64,
    mode: &'static str,
    render_mode: &'static str,
    position: [f32; 3],
    coins_collected: u32,
    coins_total: u32,
    wraps: u64,
    collisions: u32,
    day_phase: f32,
    lamp_intensity: f32,
    timing: TickStats,
}

fn load_config(cli: &Cli) -> anyhow::Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.city.seed = Some(seed);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Info => {
            println!("cityloop-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "city: {}x{} blocks, chunk {} m",
                config.city.city_size,
                config.city.city_size,
                config.city.chunk_size()
            );
            println!("day length: {} s", config.sky.cycle_duration);
            println!("coins: {}", config.coins.count);
        }
        Commands::Config => {
            config.validate()?;
            print!("{}", config.to_yaml()?);
        }
        Commands::Generate => {
            let generator = CityLayoutGenerator::new(config.city.clone())?;
            let mut rng = generator.rng();
            let layout = generator.generate(&mut rng);
            let mut world = World::new();
            let mut colliders = ColliderIndex::new();
            let stats = layout.populate(&mut world, &mut colliders);
            println!("City generated (seed={:?})", config.city.seed);
            println!("  chunk size: {}", layout.chunk_size());
            println!("  streets:    {}", stats.streets);
            println!("  buildings:  {}", stats.buildings);
            println!("  lights:     {}", stats.lights);
            println!("  props:      {}", stats.props);
            println!("  colliders:  {}", stats.colliders);
            println!("  entities:   {}", world.entity_count());
        }
        Commands::Run {
            ticks,
            script,
            dt,
            list,
        } => {
            anyhow::ensure!(dt > 0.0 && dt.is_finite(), "--dt must be positive");
            let mut sim = Simulation::new(config)?;
            let mut input = InputState::new();
            let mut collisions = 0;

            match script {
                Script::Idle => {}
                Script::Walk => input.key_down(Key::KeyW),
                Script::Drive => {
                    input.key_down(Key::KeyE);
                    sim.tick(&mut input, dt);
                    input.key_up(Key::KeyE);
                    input.key_down(Key::KeyW);
                }
            }

            while sim.tick_count() < ticks {
                let report = sim.tick(&mut input, dt);
                if report.vehicle_collided {
                    collisions += 1;
                }
                if let Some(offset) = report.wrapped {
                    tracing::debug!(tick = report.tick, ?offset, "wrapped");
                }
            }
            sim.shutdown(&mut input);

            let renderer = if list {
                DebugTextRenderer::verbose()
            } else {
                DebugTextRenderer::new()
            };
            println!("{}", renderer.render(sim.world(), &sim.render_view()));

            let position = sim.active_position();
            let summary = RunSummary {
                ticks: sim.tick_count(),
                mode: sim.mode().label(),
                render_mode: sim.render_mode().label(),
                position: position.to_array(),
                coins_collected: sim.coins().collected(),
                coins_total: sim.coins().total(),
                wraps: sim.wrapper().wrap_count(),
                collisions,
                day_phase: sim.lighting().phase,
                lamp_intensity: sim.lamp_intensity(),
                timing: sim.timing(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
            println!(
                "Street lights lit: {}",
                sim.world()
                    .iter_kind(EntityKind::StreetLight)
                    .filter(|(_, e)| e.payload.light_intensity().is_some_and(|i| i > 0.0))
                    .count()
            );
        }
    }

    Ok(())
}
