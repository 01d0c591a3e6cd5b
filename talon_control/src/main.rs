//! # Talon Control
//!
//! Runs the control core against simulated subsystem proxies, following a
//! scripted match timeline (disabled, autonomous, teleop) until the match
//! ends, a cycle limit is reached, or Ctrl-C is pressed.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use talon_common::config::ConfigError;
use talon_control::config::RobotConfig;
use talon_control::cycle::{CycleRunner, MatchTimeline, rt_setup};
use talon_control::subsystem::sim::SimRig;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Talon control loop
#[derive(Parser, Debug)]
#[command(name = "talon_control")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Robot mode state machine and task orchestrator on a fixed-rate loop")]
struct Args {
    /// Path to the robot configuration TOML. Built-in defaults when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Autonomous routine to run (default: the registry default).
    #[arg(long, value_name = "NAME")]
    auto: Option<String>,

    /// Seconds disabled before autonomous starts.
    #[arg(long, default_value_t = 1.0)]
    disabled_s: f64,

    /// Autonomous period length [s].
    #[arg(long, default_value_t = 15.0)]
    auto_s: f64,

    /// Teleop period length [s]; 0 runs teleop until stopped.
    #[arg(long, default_value_t = 135.0)]
    teleop_s: f64,

    /// Stop after this many cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// CPU core to pin the control thread to (`rt` feature only).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (`rt` feature only).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    /// List autonomous routines and exit.
    #[arg(long)]
    list_autos: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = load_config(&args);
    let level = match &loaded {
        Ok(config) => config.shared.log_level.as_directive(),
        Err(_) => "info",
    };
    setup_tracing(&args, level);

    info!("Talon control v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Talon control shutdown complete");
}

fn load_config(args: &Args) -> Result<RobotConfig, ConfigError> {
    match &args.config {
        Some(path) => RobotConfig::load_validated(path),
        None => Ok(RobotConfig::default()),
    }
}

fn run(args: &Args, config: RobotConfig) -> Result<(), Box<dyn std::error::Error>> {
    if args.config.is_none() {
        warn!("No --config given, using built-in defaults");
    }
    info!(
        service = config.shared.service_name.as_str(),
        period_ms = config.cycle.period_ms,
        "Config OK"
    );

    let rig = SimRig::new(&config);
    let mut runner = CycleRunner::new(config, rig.subsystems());

    if args.list_autos {
        for name in runner.autos.names() {
            let marker = if Some(name) == runner.autos.default_name() { " (default)" } else { "" };
            println!("{name}{marker}");
        }
        return Ok(());
    }

    if let Some(name) = &args.auto {
        if !runner.select_auto(name) {
            return Err(format!("unknown autonomous routine '{name}'").into());
        }
    }

    // Simulated match: the robot starts with a preloaded piece.
    rig.transfer.model_mut().stored = true;

    let timeline = MatchTimeline {
        disabled: talon_control::config::secs(args.disabled_s),
        autonomous: talon_control::config::secs(args.auto_s),
        teleop: (args.teleop_s > 0.0).then(|| talon_control::config::secs(args.teleop_s)),
    };
    info!(
        disabled_ms = timeline.disabled.as_millis() as u64,
        auto_ms = timeline.autonomous.as_millis() as u64,
        teleop_ms = timeline.teleop.map(|t| t.as_millis() as u64),
        "Match timeline"
    );

    rt_setup(args.cpu_core, args.rt_priority)?;
    info!(
        "RT setup complete (cpu_core={}, priority={})",
        args.cpu_core, args.rt_priority
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    runner.run(&running, &timeline, args.max_cycles)?;

    let snapshot = runner.snapshot();
    info!(status = %snapshot.to_json(), "final status");
    if snapshot.overruns > 0 {
        warn!(overruns = snapshot.overruns, "cycle overruns occurred");
    }
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, level: &str) {
    let directive = if args.verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
