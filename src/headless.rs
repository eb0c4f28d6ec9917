use crate::config::BuilderConfig;
use anyhow::{Context, Result};
use blockwright_builder::{
    load_state_file, save_state_file, BuildContext, BuildProgress, BuildScheduler, Blueprint,
    Builder, BuilderTile,
};
use blockwright_core::{total_count, BlockPos, SimTick};
use blockwright_testkit::{
    BuildMetrics, EventRecord, JsonlSink, MetricsReportBuilder, MetricsSink, PersistenceMetrics,
    TestExecutionMetrics, TestResult,
};
use blockwright_world::{GridWorld, Voxel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub struct HeadlessConfig {
    pub blueprint: Arc<Blueprint>,
    pub origin: BlockPos,
    pub builder: BuilderConfig,
    pub state: Option<PathBuf>,
    pub world: Option<PathBuf>,
    pub events: Option<PathBuf>,
    pub metrics: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub launched: usize,
    pub finished: bool,
    pub progress: BuildProgress,
    pub energy_consumed: u64,
    pub items_reclaimed: u64,
    pub dropped_items: usize,
}

/// One non-air voxel in a world file.
#[derive(Debug, Serialize, Deserialize)]
struct WorldEntry {
    pos: BlockPos,
    #[serde(flatten)]
    voxel: Voxel,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let started = Instant::now();
    let mut world = match cfg.world.as_deref() {
        Some(path) if path.exists() => load_world(path)?,
        _ => GridWorld::new(),
    };

    let context = BuildContext::new(cfg.origin, cfg.blueprint.clone())
        .with_context(|| format!("cannot place blueprint at {}", cfg.origin))?;
    let region = context.region();
    // The builder hovers one block above the middle of the region's top layer.
    let above = region
        .max
        .y
        .checked_add(1)
        .with_context(|| format!("no room for the builder above {}", region.max))?;
    let position = BlockPos::new(
        region.min.x + (region.max.x - region.min.x) / 2,
        above,
        region.min.z + (region.max.z - region.min.z) / 2,
    );
    let mut tile = BuilderTile::new(position, cfg.builder.energy_per_tick, cfg.builder.max_energy);
    let costs = cfg.builder.cost_model();
    let strategy = cfg.builder.strategy;

    let mut persistence = PersistenceMetrics::default();
    let scheduler = match cfg.state.as_deref() {
        Some(path) if path.exists() => {
            let state = load_state_file(path)
                .with_context(|| format!("failed to load build state {}", path.display()))?;
            let (scheduler, report) =
                BuildScheduler::restore(context, strategy, costs, &state, &mut tile);
            if report.dropped_items > 0 {
                warn!(dropped = report.dropped_items, "some in-flight items could not be restored");
            }
            info!(
                restored = report.restored_items,
                cleared = state.clear_list.len(),
                built = state.built_list.len(),
                "resumed build"
            );
            persistence.restores += 1;
            persistence.dropped_items = report.dropped_items;
            scheduler
        }
        _ => BuildScheduler::new(context, strategy, costs),
    };
    tile.set_scheduler(scheduler.with_travel_speed(cfg.builder.ticks_per_block));

    let mut events = cfg
        .events
        .as_deref()
        .map(JsonlSink::create)
        .transpose()
        .context("failed to create event log")?;

    let max_ticks = cfg.builder.max_ticks;
    let mut tick = SimTick::ZERO;
    let mut launched = 0usize;
    while !tile.is_build_done() && (max_ticks == 0 || tick.0 < max_ticks) {
        let report = tile.tick(tick, &mut world);
        if let Some(sink) = events.as_mut() {
            if report.arrived > 0 {
                let payload = report.arrived.to_string();
                sink.write(&EventRecord {
                    tick,
                    kind: "arrive",
                    payload: &payload,
                })?;
            }
            if report.launched {
                if let Some(item) = tile.in_flight_items().last() {
                    let kind = if item.slot.is_clear() { "clear" } else { "place" };
                    let payload = item.slot.destination.to_string();
                    sink.write(&EventRecord {
                        tick,
                        kind,
                        payload: &payload,
                    })?;
                }
            }
        }
        if report.launched {
            launched += 1;
        }
        tick = tick.advance(1);
    }
    let finished = tile.is_build_done();

    if let Some(sink) = events.as_mut() {
        let kind = if finished { "done" } else { "stopped" };
        sink.write(&EventRecord {
            tick,
            kind,
            payload: "",
        })?;
        sink.flush()?;
    }

    if let Some(path) = cfg.state.as_deref() {
        if finished {
            if path.exists() {
                std::fs::remove_file(path)
                    .with_context(|| format!("failed to remove finished state {}", path.display()))?;
            }
        } else if let Some(state) = tile.save_state() {
            save_state_file(path, &state)
                .with_context(|| format!("failed to save build state {}", path.display()))?;
            persistence.saves += 1;
            persistence.bytes_written = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        }
    }

    if let Some(path) = cfg.world.as_deref() {
        save_world(path, &world)?;
    }

    let progress = tile
        .scheduler()
        .map(BuildScheduler::progress)
        .unwrap_or_default();
    let summary = RunSummary {
        ticks: tick.0,
        launched,
        finished,
        progress,
        energy_consumed: tile.consumed_total(),
        items_reclaimed: total_count(tile.reclaimed()),
        dropped_items: persistence.dropped_items,
    };

    if let Some(path) = cfg.metrics.as_deref() {
        let report = MetricsReportBuilder::new(cfg.blueprint.name().unwrap_or("blueprint"))
            .result(if finished { TestResult::Pass } else { TestResult::Skip })
            .build_metrics(BuildMetrics {
                ticks: summary.ticks,
                slots_launched: summary.launched,
                cells_cleared: progress.cleared,
                cells_built: progress.built,
                energy_consumed: summary.energy_consumed,
                items_reclaimed: summary.items_reclaimed,
                finished,
            })
            .persistence(persistence)
            .execution(TestExecutionMetrics {
                duration_seconds: started.elapsed().as_secs_f64(),
                assertions_checked: None,
            })
            .build();
        MetricsSink::create(path)?.write(&report)?;
    }

    Ok(summary)
}

fn load_world(path: &Path) -> Result<GridWorld> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read world {}", path.display()))?;
    let entries: Vec<WorldEntry> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse world {}", path.display()))?;
    let mut world = GridWorld::new();
    for entry in entries {
        world.set_voxel(entry.pos, entry.voxel);
    }
    Ok(world)
}

fn save_world(path: &Path, world: &GridWorld) -> Result<()> {
    let entries: Vec<WorldEntry> = world
        .iter()
        .map(|(pos, voxel)| WorldEntry { pos, voxel })
        .collect();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(&entries)?)
        .with_context(|| format!("failed to write world {}", path.display()))?;
    Ok(())
}
