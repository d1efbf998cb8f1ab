mod config;
mod headless;

use anyhow::{Context, Result};
use clap::Parser;
use config::{SimConfig, DEFAULT_CONFIG_PATH};
use headless::HeadlessConfig;
use natural_physics::MathBackend;
use natural_testkit::MetricsSink;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a headless creature arena", long_about = None)]
struct Args {
    /// Arena config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Ticks to simulate; overrides the config
    #[arg(long)]
    ticks: Option<u64>,
    /// World seed; overrides the config
    #[arg(long)]
    seed: Option<u64>,
    /// Vector math backend: portable or lookup
    #[arg(long)]
    math: Option<String>,
    /// Write every simulation event as JSONL
    #[arg(long)]
    trace: Option<PathBuf>,
    /// Write the run summary as JSON
    #[arg(long)]
    metrics: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `natural_world=trace`
    #[arg(long)]
    log_level: Option<String>,
    /// Fail instead of falling back to defaults when the config is unusable
    #[arg(long)]
    strict_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // WARN by default; RUST_LOG or --log-level override.
    let filter = match &args.log_level {
        Some(level) => tracing_subscriber::EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter `{level}`"))?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut sim = load_config(&args)?;
    if let Some(ticks) = args.ticks {
        sim.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        sim.seed = seed;
    }
    if let Some(math) = &args.math {
        sim.math = MathBackend::parse(math)
            .with_context(|| format!("unknown math backend `{math}` (expected portable or lookup)"))?;
    }

    let scenario = args
        .config
        .as_deref()
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "default".to_string());

    let metrics = headless::run(HeadlessConfig {
        sim,
        trace: args.trace.clone(),
        scenario,
    })?;

    if let Some(path) = &args.metrics {
        MetricsSink::create(path)?.write(&metrics)?;
    }
    print!("{}", headless::report(&metrics));
    Ok(())
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    if args.strict_config {
        return SimConfig::load_strict(&path);
    }
    Ok(SimConfig::load_from_path(&path))
}
