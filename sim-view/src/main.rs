//! Application entry point for the cloth viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.
//! With `--headless <steps>` it runs the simulation without a window.

mod viewer;

use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use cloth_core::{Settings, Simulation};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(name = "cloth-view", about = "Interactive cloth simulation viewer")]
struct Args {
    /// TOML settings file with optional [config] and [controls] tables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Run this many steps without opening a window, then exit.
    #[arg(long, value_name = "STEPS")]
    headless: Option<u64>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Steps a simulation `steps` times against the real clock and logs a summary.
fn run_headless(settings: Settings, steps: u64) -> Result<(), cloth_core::ConfigError> {
    let mut sim = Simulation::new(settings.config, settings.controls)?;
    let start = Instant::now();
    let mut degenerate = 0;

    for _ in 0..steps {
        let report = sim.step(start.elapsed().as_secs_f64());
        degenerate += report.degenerate_pairs;
    }

    let total = start.elapsed();
    let lattice = sim.lattice();
    let (lowest, sag) = sim
        .particles()
        .particles
        .iter()
        .map(|p| p.original.y - p.position.y)
        .enumerate()
        .fold((0, f32::MIN), |best, (id, sag)| if sag > best.1 { (id, sag) } else { best });

    info!(
        steps = sim.steps_taken(),
        total_ms = total.as_secs_f64() * 1e3,
        ms_per_step = total.as_secs_f64() * 1e3 / steps.max(1) as f64,
        degenerate,
        max_link_excess = sim.max_link_excess(),
        max_anchor_drift = sim.max_anchor_drift(),
        lowest = ?lattice.cell(lowest),
        sag,
        "headless run finished"
    );
    Ok(())
}

/// Starts the viewer, or the headless runner when requested.
///
/// ### Returns
/// - `ExitCode::SUCCESS` if the run completes.
/// - `ExitCode::FAILURE` if settings cannot be loaded or the window
///   cannot be created.
fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = match &args.config {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    if let Some(steps) = args.headless {
        return match run_headless(settings, steps) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let viewer = match Viewer::new(settings) {
        Ok(viewer) => viewer,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 800.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Cloth Simulation",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("viewer failed: {e}");
            ExitCode::FAILURE
        }
    }
}
