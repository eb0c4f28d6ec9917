//! Tick harness for headless build runs.
//!
//! Steps a small simulation until it reports completion or a tick limit is
//! hit, sampling a serializable snapshot along the way.

use anyhow::Result;
use blockwright_core::SimTick;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration for [`run_ticks`].
#[derive(Debug, Clone)]
pub struct TickRunConfig {
    /// Human-readable name (written into the report).
    pub name: String,
    /// Upper bound on ticks stepped.
    pub max_ticks: u64,
    /// Snapshot every N ticks (0 = only first and last frame).
    pub sample_every: u64,
}

impl TickRunConfig {
    /// Config with no intermediate samples.
    pub fn new(name: impl Into<String>, max_ticks: u64) -> Self {
        Self {
            name: name.into(),
            max_ticks,
            sample_every: 0,
        }
    }
}

/// Snapshot captured at a given tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Result of [`run_ticks`].
#[derive(Debug, Clone, Serialize)]
pub struct TickRunReport<S> {
    /// Run name.
    pub name: String,
    /// Sampled frames; always starts at tick 0 and ends at the last tick run.
    pub frames: Vec<TickFrame<S>>,
    /// Ticks actually stepped.
    pub ticks_run: u64,
    /// Whether `done` held when the run stopped.
    pub finished: bool,
}

impl<S: Serialize> TickRunReport<S> {
    /// Write the report as pretty JSON, creating parent dirs if needed.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Step `state` until `done` holds or `config.max_ticks` ticks have run.
pub fn run_ticks<State, Snapshot, StepFn, DoneFn, SnapFn>(
    config: TickRunConfig,
    state: &mut State,
    mut step: StepFn,
    mut done: DoneFn,
    mut snapshot: SnapFn,
) -> TickRunReport<Snapshot>
where
    StepFn: FnMut(SimTick, &mut State),
    DoneFn: FnMut(&State) -> bool,
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut tick = SimTick::ZERO;
    let mut frames = vec![TickFrame {
        tick: tick.0,
        snapshot: snapshot(tick, state),
    }];

    let mut finished = done(state);
    while !finished && tick.0 < config.max_ticks {
        step(tick, state);
        tick = tick.advance(1);
        finished = done(state);
        let sampled = config.sample_every > 0 && tick.0 % config.sample_every == 0;
        if sampled || finished || tick.0 == config.max_ticks {
            frames.push(TickFrame {
                tick: tick.0,
                snapshot: snapshot(tick, state),
            });
        }
    }

    debug!(name = %config.name, ticks = tick.0, finished, "tick run stopped");
    TickRunReport {
        name: config.name,
        frames,
        ticks_run: tick.0,
        finished,
    }
}
