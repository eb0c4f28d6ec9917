//! blockwright - headless blueprint builder
//!
//! Loads a blueprint, anchors it at an origin and runs a builder against a
//! voxel world until the build completes or the tick limit is reached.

mod config;
mod headless;

use anyhow::{bail, Context, Result};
use blockwright_builder::{Blueprint, BuildStrategy};
use blockwright_core::BlockPos;
use clap::{Parser, ValueEnum};
use config::{BuilderConfig, DEFAULT_CONFIG_PATH};
use headless::HeadlessConfig;
use std::{path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Blueprint-driven voxel builder", long_about = None)]
struct Args {
    /// Blueprint JSON file
    #[arg(short, long)]
    blueprint: PathBuf,

    /// Absolute position of the blueprint anchor, as x,y,z
    #[arg(long, value_parser = parse_block_pos, default_value = "0,64,0", allow_hyphen_values = true)]
    origin: BlockPos,

    /// Builder configuration (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Build state file; resumed from when present, written back if the build is unfinished
    #[arg(long)]
    state: Option<PathBuf>,

    /// World file (JSON voxel list); loaded when present and written back on exit
    #[arg(long)]
    world: Option<PathBuf>,

    /// Override the configured tick limit (0 = no limit)
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Override the configured build strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Write launch/arrival events as JSON lines
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write a metrics report as JSON
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Write the effective configuration back to --config before building
    #[arg(long)]
    save_config: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Place blueprint blocks only
    Build,
    /// Clear the region first, then build
    Excavate,
}

impl From<StrategyArg> for BuildStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Build => BuildStrategy::BuildOnly,
            StrategyArg::Excavate => BuildStrategy::ExcavateThenBuild,
        }
    }
}

fn parse_block_pos(value: &str) -> Result<BlockPos> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid coordinate list {value:?}"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(BlockPos::new(*x, *y, *z)),
        _ => bail!("expected x,y,z but got {value:?}"),
    }
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting blockwright v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let blueprint = Blueprint::load_from_path(&args.blueprint)
        .with_context(|| format!("failed to load blueprint {}", args.blueprint.display()))?;

    let mut builder = BuilderConfig::load_from_path(&args.config);
    if let Some(max_ticks) = args.max_ticks {
        builder.max_ticks = max_ticks;
    }
    if let Some(strategy) = args.strategy {
        builder.strategy = strategy.into();
    }
    if args.save_config {
        builder
            .save_to_path(&args.config)
            .with_context(|| format!("failed to write config {}", args.config.display()))?;
    }

    let summary = headless::run(HeadlessConfig {
        blueprint: Arc::new(blueprint),
        origin: args.origin,
        builder,
        state: args.state,
        world: args.world,
        events: args.events,
        metrics: args.metrics,
    })?;

    println!(
        "{} after {} ticks: {} launched, {} cleared, {} built, {} energy, {} reclaimed",
        if summary.finished { "finished" } else { "stopped" },
        summary.ticks,
        summary.launched,
        summary.progress.cleared,
        summary.progress.built,
        summary.energy_consumed,
        summary.items_reclaimed,
    );
    if !summary.finished {
        println!(
            "remaining: {} to clear, {} to place",
            summary.progress.remaining_clear, summary.progress.remaining_place
        );
    }
    if summary.dropped_items > 0 {
        println!("{} in-flight items dropped on resume", summary.dropped_items);
    }
    Ok(())
}
