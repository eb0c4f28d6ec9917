//! Slot selection, energy gating and pacing.
//!
//! The scheduler walks a plan derived from the blueprint and strategy alone,
//! so a restored scheduler derives the same walk as the one that was saved.
//! World state is consulted lazily, one cell at a time, every time a slot is
//! requested; nothing read from the environment is cached between calls.

use std::collections::BTreeSet;

use blockwright_core::{BlockPos, Position, SimTick};
use blockwright_world::Environment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::{
    BuildContext, BuildError, BuildState, Builder, BuildingItem, BuildingSlot, CostModel,
    DEFAULT_TICKS_PER_BLOCK,
};

/// Which cells a build touches, and in what order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStrategy {
    /// Place blueprint blocks bottom-up; leave foreign blocks alone.
    #[default]
    BuildOnly,
    /// Clear the whole region top-down first, then build like [`BuildStrategy::BuildOnly`].
    ExcavateThenBuild,
}

/// Result of asking for the next slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextSlot {
    /// A slot was approved (or, when previewing, would be).
    Ready(BuildingSlot),
    /// The next cell is still waiting for its clearing transfer to land.
    Waiting,
    /// Nothing is left to do.
    Exhausted,
}

/// Counters for progress reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildProgress {
    /// Cells approved for clearing.
    pub cleared: usize,
    /// Cells approved for placement or found already correct.
    pub built: usize,
    /// Clear candidates not yet walked.
    pub remaining_clear: usize,
    /// Placement candidates not yet walked.
    pub remaining_place: usize,
}

/// Iteration order derived from the blueprint and strategy.
#[derive(Debug, Clone, Default)]
struct BuildPlan {
    clear: Vec<BlockPos>,
    place: Vec<BlockPos>,
}

impl BuildPlan {
    fn derive(
        context: &BuildContext,
        strategy: BuildStrategy,
        cleared: &BTreeSet<BlockPos>,
        built: &BTreeSet<BlockPos>,
    ) -> Self {
        let clear = match strategy {
            BuildStrategy::BuildOnly => Vec::new(),
            BuildStrategy::ExcavateThenBuild => context
                .region()
                .iter_top_down()
                .filter(|pos| !cleared.contains(pos))
                .collect(),
        };
        let mut place: Vec<BlockPos> = context
            .blueprint()
            .placements()
            .filter(|(_, schematic)| !schematic.is_air())
            .map(|(rel, _)| context.to_absolute(rel))
            .filter(|pos| !built.contains(pos))
            .collect();
        place.sort_by_key(|pos| (pos.y, pos.x, pos.z));
        Self { clear, place }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    clear: usize,
    place: usize,
}

enum Candidate {
    Slot(BuildingSlot),
    /// Already holds the wanted voxel.
    Satisfied,
    /// Cleared earlier but the clearing transfer has not landed yet.
    Pending,
    Skip,
}

struct Scan {
    next: NextSlot,
    cursor: Cursor,
    satisfied: Vec<BlockPos>,
}

/// Drives one blueprint build for one builder.
#[derive(Debug, Clone)]
pub struct BuildScheduler {
    context: BuildContext,
    strategy: BuildStrategy,
    costs: CostModel,
    ticks_per_block: f64,
    initialized: bool,
    done: bool,
    next_eligible: SimTick,
    cleared: BTreeSet<BlockPos>,
    built: BTreeSet<BlockPos>,
    plan: BuildPlan,
    cursor: Cursor,
}

impl BuildScheduler {
    /// Fresh scheduler; the plan is derived on first use.
    pub fn new(context: BuildContext, strategy: BuildStrategy, costs: CostModel) -> Self {
        Self {
            context,
            strategy,
            costs,
            ticks_per_block: DEFAULT_TICKS_PER_BLOCK,
            initialized: false,
            done: false,
            next_eligible: SimTick::ZERO,
            cleared: BTreeSet::new(),
            built: BTreeSet::new(),
            plan: BuildPlan::default(),
            cursor: Cursor::default(),
        }
    }

    /// Travel speed handed to launched items.
    pub fn with_travel_speed(mut self, ticks_per_block: f64) -> Self {
        self.ticks_per_block = ticks_per_block;
        self
    }

    /// Derive the walk, skipping cells already in the progress sets.
    pub fn initialize(&mut self) {
        self.plan = BuildPlan::derive(&self.context, self.strategy, &self.cleared, &self.built);
        self.cursor = Cursor::default();
        self.initialized = true;
        debug!(
            clear = self.plan.clear.len(),
            place = self.plan.place.len(),
            strategy = ?self.strategy,
            "build plan derived"
        );
    }

    /// Try to launch the next slot. Returns true when one was launched.
    pub fn advance<E, B>(&mut self, env: &E, builder: &mut B, origin: Position, now: SimTick) -> bool
    where
        E: Environment + ?Sized,
        B: Builder + ?Sized,
    {
        if self.done {
            return false;
        }
        if !self.initialized {
            self.initialize();
        }
        if now < self.next_eligible {
            trace!(now = now.0, eligible = self.next_eligible.0, "builder cooling down");
            return false;
        }
        match self.get_next_slot(env, builder) {
            Ok(NextSlot::Ready(slot)) => {
                let build_time = slot.cost.build_time;
                self.apply_slot(slot, origin, builder);
                self.next_eligible = now.advance(build_time);
                true
            }
            Ok(NextSlot::Waiting) => {
                trace!("waiting for a clearing transfer to land");
                false
            }
            Ok(NextSlot::Exhausted) => {
                self.done = true;
                info!(
                    cleared = self.cleared.len(),
                    built = self.built.len(),
                    "build plan exhausted"
                );
                false
            }
            Err(err) => {
                trace!(%err, "slot deferred");
                false
            }
        }
    }

    /// Commit to the next slot: charge energy and record progress.
    ///
    /// On [`BuildError::ResourceUnavailable`] nothing is charged or recorded
    /// and the same slot is offered on the next call.
    pub fn get_next_slot<E, B>(&mut self, env: &E, builder: &mut B) -> Result<NextSlot, BuildError>
    where
        E: Environment + ?Sized,
        B: Builder + ?Sized,
    {
        if !self.initialized {
            self.initialize();
        }
        let scan = self.scan(env, &self.plan, self.cursor, builder.in_flight_items());
        if let NextSlot::Ready(slot) = &scan.next {
            let available = builder.available_energy();
            if available < slot.cost.energy {
                return Err(BuildError::ResourceUnavailable {
                    needed: slot.cost.energy,
                    available,
                });
            }
        }

        self.cursor = scan.cursor;
        if !scan.satisfied.is_empty() {
            debug!(count = scan.satisfied.len(), "cells already match the blueprint");
            self.built.extend(scan.satisfied);
        }
        let slot = match scan.next {
            NextSlot::Ready(slot) => slot,
            other => return Ok(other),
        };

        builder.consume_energy(slot.cost.energy);
        if slot.is_clear() {
            self.cleared.insert(slot.destination);
            self.cursor.clear += 1;
        } else {
            self.built.insert(slot.destination);
            self.cursor.place += 1;
        }
        debug!(
            pos = %slot.destination,
            clear = slot.is_clear(),
            energy = slot.cost.energy,
            "slot approved"
        );
        Ok(NextSlot::Ready(slot))
    }

    /// Preview the slot [`BuildScheduler::get_next_slot`] would offer, without
    /// charging energy or recording progress. Affordability is not checked.
    pub fn reserve_next<E, B>(&self, env: &E, builder: &B) -> Option<BuildingSlot>
    where
        E: Environment + ?Sized,
        B: Builder + ?Sized,
    {
        let derived;
        let (plan, cursor) = if self.initialized {
            (&self.plan, self.cursor)
        } else {
            derived = BuildPlan::derive(&self.context, self.strategy, &self.cleared, &self.built);
            (&derived, Cursor::default())
        };
        match self.scan(env, plan, cursor, builder.in_flight_items()).next {
            NextSlot::Ready(slot) => Some(slot),
            NextSlot::Waiting | NextSlot::Exhausted => None,
        }
    }

    /// Mark `slot` launched and hand it to the builder as an in-flight item.
    pub fn apply_slot<B>(&self, mut slot: BuildingSlot, origin: Position, builder: &mut B)
    where
        B: Builder + ?Sized,
    {
        slot.built = true;
        let item = BuildingItem::new(origin, slot, self.context.clone(), self.ticks_per_block);
        builder.launch_item(item);
    }

    /// True once the plan is exhausted and every launched item has landed.
    pub fn is_done<B>(&self, builder: &B) -> bool
    where
        B: Builder + ?Sized,
    {
        self.done && builder.in_flight_items().is_empty()
    }

    /// Snapshot the progress sets and in-flight items.
    pub fn save_state<B>(&self, builder: &B) -> BuildState
    where
        B: Builder + ?Sized,
    {
        BuildState {
            clear_list: self.cleared.iter().copied().collect(),
            built_list: self.built.iter().copied().collect(),
            builders_in_action: builder
                .in_flight_items()
                .iter()
                .filter(|item| !item.is_done())
                .map(BuildingItem::to_record)
                .collect(),
        }
    }

    /// Rebuild a scheduler from `state`, re-launching its in-flight items on
    /// `builder`. Items that no longer map onto the blueprint are dropped.
    pub fn restore<B>(
        context: BuildContext,
        strategy: BuildStrategy,
        costs: CostModel,
        state: &BuildState,
        builder: &mut B,
    ) -> (Self, RestoreReport)
    where
        B: Builder + ?Sized,
    {
        let mut scheduler = Self::new(context, strategy, costs);
        scheduler.cleared = state.clear_list.iter().copied().collect();
        scheduler.built = state.built_list.iter().copied().collect();

        let mut report = RestoreReport::default();
        for record in &state.builders_in_action {
            match BuildingItem::from_record(record, &scheduler.context) {
                Ok(item) => {
                    builder.launch_item(item);
                    report.restored_items += 1;
                }
                Err(err) => {
                    warn!(%err, "dropping in-flight item on restore");
                    report.dropped_items += 1;
                }
            }
        }

        scheduler.initialize();
        (scheduler, report)
    }

    /// Context being built.
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Strategy chosen at construction.
    pub fn strategy(&self) -> BuildStrategy {
        self.strategy
    }

    /// Unit prices in use.
    pub fn costs(&self) -> &CostModel {
        &self.costs
    }

    /// Whether the plan has been derived.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Earliest tick the next slot may be launched.
    pub fn next_eligible(&self) -> SimTick {
        self.next_eligible
    }

    /// Cells approved for clearing.
    pub fn cleared(&self) -> &BTreeSet<BlockPos> {
        &self.cleared
    }

    /// Cells approved for placement or found already correct.
    pub fn built(&self) -> &BTreeSet<BlockPos> {
        &self.built
    }

    /// Progress counters.
    pub fn progress(&self) -> BuildProgress {
        let (remaining_clear, remaining_place) = if self.initialized {
            (
                self.plan.clear.len().saturating_sub(self.cursor.clear),
                self.plan.place.len().saturating_sub(self.cursor.place),
            )
        } else {
            let plan = BuildPlan::derive(&self.context, self.strategy, &self.cleared, &self.built);
            (plan.clear.len(), plan.place.len())
        };
        BuildProgress {
            cleared: self.cleared.len(),
            built: self.built.len(),
            remaining_clear,
            remaining_place,
        }
    }

    fn scan<E>(&self, env: &E, plan: &BuildPlan, mut cursor: Cursor, in_flight: &[BuildingItem]) -> Scan
    where
        E: Environment + ?Sized,
    {
        let mut satisfied = Vec::new();
        while let Some(&pos) = plan.clear.get(cursor.clear) {
            if let Some(slot) = self.clear_candidate(env, pos) {
                return Scan {
                    next: NextSlot::Ready(slot),
                    cursor,
                    satisfied,
                };
            }
            cursor.clear += 1;
        }
        while let Some(&pos) = plan.place.get(cursor.place) {
            match self.place_candidate(env, pos, in_flight) {
                Candidate::Slot(slot) => {
                    return Scan {
                        next: NextSlot::Ready(slot),
                        cursor,
                        satisfied,
                    }
                }
                Candidate::Pending => {
                    return Scan {
                        next: NextSlot::Waiting,
                        cursor,
                        satisfied,
                    }
                }
                Candidate::Satisfied => satisfied.push(pos),
                Candidate::Skip => {}
            }
            cursor.place += 1;
        }
        Scan {
            next: NextSlot::Exhausted,
            cursor,
            satisfied,
        }
    }

    fn clear_candidate<E>(&self, env: &E, pos: BlockPos) -> Option<BuildingSlot>
    where
        E: Environment + ?Sized,
    {
        if self.cleared.contains(&pos) {
            return None;
        }
        let current = env.voxel_at(pos);
        if current.is_air() {
            return None;
        }
        if self
            .context
            .schematic_at(pos)
            .is_some_and(|schematic| schematic.voxel() == current)
        {
            return None;
        }
        if !env.is_breakable(pos) {
            trace!(%pos, "skipping unbreakable block");
            return None;
        }
        let hardness = env.hardness_at(pos);
        Some(BuildingSlot::clear(
            pos,
            self.costs.clear_cost(hardness),
            self.costs.clear_yield(hardness),
        ))
    }

    fn place_candidate<E>(&self, env: &E, pos: BlockPos, in_flight: &[BuildingItem]) -> Candidate
    where
        E: Environment + ?Sized,
    {
        if self.built.contains(&pos) {
            return Candidate::Skip;
        }
        let Some(schematic) = self.context.schematic_at(pos) else {
            return Candidate::Skip;
        };
        let current = env.voxel_at(pos);
        if current == schematic.voxel() {
            return Candidate::Satisfied;
        }
        if !current.is_air() {
            let awaiting_clear = in_flight
                .iter()
                .any(|item| item.slot.is_clear() && item.slot.destination == pos);
            if self.cleared.contains(&pos) && awaiting_clear {
                return Candidate::Pending;
            }
            trace!(%pos, "placement obstructed");
            return Candidate::Skip;
        }
        Candidate::Slot(BuildingSlot::place(
            pos,
            schematic.clone(),
            self.costs.place_cost(schematic),
        ))
    }
}

/// Outcome of [`BuildScheduler::restore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// In-flight items re-attached to the builder.
    pub restored_items: usize,
    /// In-flight items dropped for lack of a blueprint mapping.
    pub dropped_items: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blueprint, Energy, Schematic};
    use blockwright_world::{GridWorld, Voxel, BLOCK_BEDROCK, BLOCK_DIRT, BLOCK_STONE};
    use std::sync::Arc;

    #[derive(Default)]
    struct Bench {
        energy: Energy,
        items: Vec<BuildingItem>,
    }

    impl Builder for Bench {
        fn available_energy(&self) -> Energy {
            self.energy
        }

        fn consume_energy(&mut self, amount: Energy) {
            self.energy -= amount;
        }

        fn in_flight_items(&self) -> &[BuildingItem] {
            &self.items
        }

        fn launch_item(&mut self, item: BuildingItem) {
            self.items.push(item);
        }
    }

    fn rich() -> Bench {
        Bench {
            energy: 1_000_000,
            items: Vec::new(),
        }
    }

    /// 2x2x1 floor plus one block on top at (0, 1, 0).
    fn context() -> BuildContext {
        let mut bp = Blueprint::new(BlockPos::new(2, 2, 1), BlockPos::ZERO).unwrap();
        for x in 0..2 {
            bp.insert(BlockPos::new(x, 0, 0), Schematic::block(BLOCK_STONE))
                .unwrap();
        }
        bp.insert(BlockPos::new(0, 1, 0), Schematic::block(BLOCK_DIRT))
            .unwrap();
        BuildContext::new(BlockPos::new(0, 10, 0), Arc::new(bp)).unwrap()
    }

    fn scheduler(strategy: BuildStrategy) -> BuildScheduler {
        BuildScheduler::new(context(), strategy, CostModel::default())
    }

    fn drain(scheduler: &mut BuildScheduler, world: &GridWorld, bench: &mut Bench) -> Vec<BuildingSlot> {
        let mut slots = Vec::new();
        while let Ok(NextSlot::Ready(slot)) = scheduler.get_next_slot(world, bench) {
            slots.push(slot);
        }
        slots
    }

    #[test]
    fn build_only_walks_bottom_up() {
        let world = GridWorld::new();
        let mut sched = scheduler(BuildStrategy::BuildOnly);
        let order: Vec<BlockPos> = drain(&mut sched, &world, &mut rich())
            .into_iter()
            .map(|slot| slot.destination)
            .collect();
        assert_eq!(
            order,
            vec![
                BlockPos::new(0, 10, 0),
                BlockPos::new(1, 10, 0),
                BlockPos::new(0, 11, 0),
            ]
        );
        assert_eq!(sched.built().len(), 3);
    }

    #[test]
    fn reserve_next_has_no_side_effects() {
        let world = GridWorld::new();
        let sched = scheduler(BuildStrategy::BuildOnly);
        let mut bench = rich();
        let first = sched.reserve_next(&world, &bench).unwrap();
        assert_eq!(sched.reserve_next(&world, &bench).unwrap(), first);
        assert!(!sched.is_initialized());
        assert!(sched.built().is_empty());

        let mut sched = sched;
        let committed = match sched.get_next_slot(&world, &mut bench).unwrap() {
            NextSlot::Ready(slot) => slot,
            other => panic!("expected a slot, got {other:?}"),
        };
        assert_eq!(committed, first);
    }

    #[test]
    fn unaffordable_slot_is_offered_again() {
        let world = GridWorld::new();
        let mut sched = scheduler(BuildStrategy::BuildOnly);
        let mut bench = Bench {
            energy: 5,
            items: Vec::new(),
        };
        let err = sched.get_next_slot(&world, &mut bench).unwrap_err();
        assert_eq!(
            err,
            BuildError::ResourceUnavailable {
                needed: 20,
                available: 5
            }
        );
        assert_eq!(bench.energy, 5);
        assert!(sched.built().is_empty());

        bench.energy = 20;
        match sched.get_next_slot(&world, &mut bench).unwrap() {
            NextSlot::Ready(slot) => assert_eq!(slot.destination, BlockPos::new(0, 10, 0)),
            other => panic!("expected a slot, got {other:?}"),
        }
        assert_eq!(bench.energy, 0);
    }

    #[test]
    fn matching_cells_are_recorded_free() {
        let mut world = GridWorld::new();
        world.set_voxel(BlockPos::new(0, 10, 0), Voxel::new(BLOCK_STONE));
        let mut sched = scheduler(BuildStrategy::BuildOnly);
        let mut bench = rich();
        let slots = drain(&mut sched, &world, &mut bench);
        assert_eq!(slots.len(), 2);
        assert!(sched.built().contains(&BlockPos::new(0, 10, 0)));
        assert_eq!(bench.energy, 1_000_000 - 40);
    }

    #[test]
    fn obstructed_cells_are_skipped_without_recording() {
        let mut world = GridWorld::new();
        world.set_voxel(BlockPos::new(1, 10, 0), Voxel::new(BLOCK_DIRT));
        let mut sched = scheduler(BuildStrategy::BuildOnly);
        let slots = drain(&mut sched, &world, &mut rich());
        assert_eq!(slots.len(), 2);
        assert!(!sched.built().contains(&BlockPos::new(1, 10, 0)));
        assert!(sched.cleared().is_empty());
    }

    fn next_ready(sched: &mut BuildScheduler, world: &GridWorld, bench: &mut Bench) -> BuildingSlot {
        match sched.get_next_slot(world, bench) {
            Ok(NextSlot::Ready(slot)) => slot,
            other => panic!("expected a slot, got {other:?}"),
        }
    }

    #[test]
    fn excavation_clears_top_down_and_skips_unbreakable() {
        let mut world = GridWorld::new();
        world.set_voxel(BlockPos::new(1, 10, 0), Voxel::new(BLOCK_DIRT));
        world.set_voxel(BlockPos::new(1, 11, 0), Voxel::new(BLOCK_STONE));
        world.set_voxel(BlockPos::new(0, 11, 0), Voxel::new(BLOCK_BEDROCK));
        let mut sched = scheduler(BuildStrategy::ExcavateThenBuild);
        let mut bench = rich();

        let upper = next_ready(&mut sched, &world, &mut bench);
        assert!(upper.is_clear());
        assert_eq!(upper.destination, BlockPos::new(1, 11, 0));
        assert_eq!(upper.cost.energy, 40);

        let lower = next_ready(&mut sched, &world, &mut bench);
        assert!(lower.is_clear());
        assert_eq!(lower.destination, BlockPos::new(1, 10, 0));
        assert_eq!(lower.cost.energy, 20);

        let place = next_ready(&mut sched, &world, &mut bench);
        assert!(!place.is_clear());
        assert_eq!(place.destination, BlockPos::new(0, 10, 0));

        assert!(!sched.cleared().contains(&BlockPos::new(0, 11, 0)));
        assert_eq!(sched.cleared().len(), 2);
    }

    #[test]
    fn placement_waits_for_pending_clear() {
        let mut world = GridWorld::new();
        world.set_voxel(BlockPos::new(0, 10, 0), Voxel::new(BLOCK_DIRT));
        let mut sched = scheduler(BuildStrategy::ExcavateThenBuild);
        let mut bench = rich();
        let origin = BlockPos::new(0, 10, 0).center();

        assert!(sched.advance(&world, &mut bench, origin, SimTick(0)));
        assert!(bench.items[0].slot.is_clear());
        assert!(!sched.advance(&world, &mut bench, origin, SimTick(5)));
        assert!(!sched.is_done(&bench));

        for item in &mut bench.items {
            item.update(&mut world);
        }
        bench.items.retain(|item| !item.is_done());
        assert!(sched.advance(&world, &mut bench, origin, SimTick(6)));
        assert_eq!(bench.items[0].slot.destination, BlockPos::new(0, 10, 0));
        assert!(!bench.items[0].slot.is_clear());
    }

    #[test]
    fn advance_respects_cooldown() {
        let world = GridWorld::new();
        let mut sched = scheduler(BuildStrategy::BuildOnly);
        let mut bench = rich();
        let origin = Position::default();
        assert!(sched.advance(&world, &mut bench, origin, SimTick(10)));
        assert_eq!(sched.next_eligible(), SimTick(11));
        assert!(!sched.advance(&world, &mut bench, origin, SimTick(10)));
        assert!(sched.advance(&world, &mut bench, origin, SimTick(11)));
        assert_eq!(bench.items.len(), 2);
        assert!(bench.items.iter().all(|item| item.slot.built));
    }

    #[test]
    fn done_requires_empty_in_flight_list_and_stays_done() {
        let mut world = GridWorld::new();
        let mut sched = scheduler(BuildStrategy::BuildOnly);
        let mut bench = rich();
        let origin = Position::default();
        let mut tick = SimTick::ZERO;
        while sched.advance(&world, &mut bench, origin, tick) || !sched.done {
            tick = tick.advance(1);
        }
        assert!(!sched.is_done(&bench));
        while !bench.items.is_empty() {
            for item in &mut bench.items {
                item.update(&mut world);
            }
            bench.items.retain(|item| !item.is_done());
        }
        assert!(sched.is_done(&bench));
        assert!(!sched.advance(&world, &mut bench, origin, tick.advance(100)));
        assert!(sched.is_done(&bench));
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn restore_skips_recorded_cells() {
        let world = GridWorld::new();
        let state = BuildState {
            clear_list: Vec::new(),
            built_list: vec![BlockPos::new(0, 10, 0)],
            builders_in_action: Vec::new(),
        };
        let mut bench = rich();
        let (sched, report) = BuildScheduler::restore(
            context(),
            BuildStrategy::BuildOnly,
            CostModel::default(),
            &state,
            &mut bench,
        );
        assert!(sched.is_initialized());
        assert_eq!(report, RestoreReport::default());
        assert_eq!(
            sched.reserve_next(&world, &bench).unwrap().destination,
            BlockPos::new(1, 10, 0)
        );
        assert_eq!(sched.progress().remaining_place, 2);
    }

    #[test]
    fn rejected_slot_leaves_progress_untouched() {
        let mut world = GridWorld::new();
        world.set_voxel(BlockPos::new(0, 10, 0), Voxel::new(BLOCK_STONE));
        let mut sched = scheduler(BuildStrategy::BuildOnly);
        let mut bench = Bench::default();

        let err = sched.get_next_slot(&world, &mut bench).unwrap_err();
        assert!(matches!(err, BuildError::ResourceUnavailable { needed: 20, .. }));
        assert!(sched.built().is_empty());
        assert_eq!(sched.progress().remaining_place, 3);

        bench.energy = 20;
        let slot = next_ready(&mut sched, &world, &mut bench);
        assert_eq!(slot.destination, BlockPos::new(1, 10, 0));
        assert!(sched.built().contains(&BlockPos::new(0, 10, 0)));
    }

    fn restored_with_lost_clear(bench: &mut Bench) -> BuildScheduler {
        let state = BuildState {
            clear_list: vec![BlockPos::new(0, 10, 0)],
            built_list: Vec::new(),
            builders_in_action: Vec::new(),
        };
        let (sched, report) = BuildScheduler::restore(
            context(),
            BuildStrategy::ExcavateThenBuild,
            CostModel::default(),
            &state,
            bench,
        );
        assert_eq!(report, RestoreReport::default());
        sched
    }

    #[test]
    fn lost_clear_is_skipped_by_preview_and_commit_alike() {
        let mut world = GridWorld::new();
        world.set_voxel(BlockPos::new(0, 10, 0), Voxel::new(BLOCK_DIRT));
        let mut bench = rich();
        let mut sched = restored_with_lost_clear(&mut bench);

        let preview = sched.reserve_next(&world, &bench).unwrap();
        assert_eq!(preview.destination, BlockPos::new(1, 10, 0));
        let committed = next_ready(&mut sched, &world, &mut bench);
        assert_eq!(committed, preview);
        assert!(!sched.built().contains(&BlockPos::new(0, 10, 0)));
    }

    #[test]
    fn advance_moves_past_a_lost_clear() {
        let mut world = GridWorld::new();
        world.set_voxel(BlockPos::new(0, 10, 0), Voxel::new(BLOCK_DIRT));
        let mut bench = rich();
        let mut sched = restored_with_lost_clear(&mut bench);
        let origin = Position::default();

        let mut tick = SimTick::ZERO;
        while sched.advance(&world, &mut bench, origin, tick) {
            tick = tick.advance(10);
        }
        let placed: Vec<BlockPos> = bench.items.iter().map(|item| item.slot.destination).collect();
        assert_eq!(placed, vec![BlockPos::new(1, 10, 0), BlockPos::new(0, 11, 0)]);
        assert!(sched.done);
        assert_eq!(world.voxel_at(BlockPos::new(0, 10, 0)), Voxel::new(BLOCK_DIRT));
    }

    #[test]
    fn clear_in_flight_holds_preview_and_commit() {
        let mut world = GridWorld::new();
        world.set_voxel(BlockPos::new(0, 10, 0), Voxel::new(BLOCK_DIRT));
        let mut sched = scheduler(BuildStrategy::ExcavateThenBuild);
        let mut bench = rich();

        let clear = next_ready(&mut sched, &world, &mut bench);
        assert!(clear.is_clear());
        sched.apply_slot(clear, Position::default(), &mut bench);

        assert_eq!(sched.reserve_next(&world, &bench), None);
        assert_eq!(sched.get_next_slot(&world, &mut bench), Ok(NextSlot::Waiting));
        assert!(!sched.advance(&world, &mut bench, Position::default(), SimTick(100)));
        assert!(!sched.done);
    }
}
