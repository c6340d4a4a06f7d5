//! CLI Entry Point for sweep-daq
//!
//! Wires the acquisition pipeline to its collaborators at the composition
//! root: the mock round-robin ADC (no converter hardware on a host), stdin
//! command input, stdout report output, and a logged relay bank.
//!
//! # Usage
//!
//! Run forever with defaults:
//! ```bash
//! sweep-daq run
//! ```
//!
//! Run a bounded session with a config file:
//! ```bash
//! sweep-daq run --config config/bench.toml --cycles 100
//! ```
//!
//! While running, a single `0`-`9`/`A`-`F` character on stdin sets the
//! relay-control word for the following cycles.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sweep_daq::config::Settings;
use sweep_daq::controller::CycleController;
use sweep_daq::engine::AcquisitionEngine;
use sweep_daq::hardware::console::{LoggedRelayBank, StdinCommandSource, StdoutReportSink};
use sweep_daq::hardware::mock::MockAdc;

#[derive(Parser)]
#[command(name = "sweep-daq")]
#[command(about = "Continuous multi-channel analog sweep acquisition loop", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the acquisition loop
    Run {
        /// Optional TOML settings file
        #[arg(long)]
        config: Option<String>,

        /// Stop after this many cycles (default: run forever)
        #[arg(long)]
        cycles: Option<u64>,

        /// Uniform noise amplitude for the simulated converter, in counts
        #[arg(long, default_value_t = 8)]
        noise: u16,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Reports go to stdout; keep diagnostics on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            cycles,
            noise,
        } => run(config.as_deref(), cycles, noise).await,
    }
}

async fn run(config_path: Option<&str>, cycles: Option<u64>, noise: u16) -> Result<()> {
    let settings = Settings::load(config_path)?;
    init_tracing(&settings.log_level);

    info!(
        channels = settings.acquisition.channels,
        depth = settings.acquisition.depth,
        timeout = ?settings.acquisition.sweep_timeout,
        "starting acquisition loop"
    );

    // Distinct resting levels per channel so the simulated sweep is easy to
    // eyeball in the report stream.
    let levels: Vec<u16> = (0..settings.acquisition.channels)
        .map(|ch| 512 + 1024 * ch as u16)
        .collect();
    let adc = Arc::new(MockAdc::with_levels(levels).with_noise(noise));

    let engine = AcquisitionEngine::new(adc, settings.acquisition.sweep_timeout);
    engine.configure().await?;

    let commands = Arc::new(StdinCommandSource::spawn());
    let relays = Arc::new(LoggedRelayBank::new(settings.relay.lines));
    let sink = Arc::new(StdoutReportSink);

    let mut controller = CycleController::new(&settings, engine, commands, relays, sink);
    controller.run(cycles).await?;

    info!("acquisition loop finished");
    Ok(())
}
