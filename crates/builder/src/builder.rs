//! The entity that owns energy and in-flight items.

use blockwright_core::{merge_stacks, BlockPos, ItemStack, Position, SimTick};
use blockwright_world::Environment;

use crate::{BuildScheduler, BuildState, BuildingItem, Energy};

/// Capabilities the scheduler needs from whoever runs the build.
pub trait Builder {
    /// Energy currently available for approvals.
    fn available_energy(&self) -> Energy;

    /// Deduct `amount`. Only called after an affordability check.
    fn consume_energy(&mut self, amount: Energy);

    /// Items launched but not yet removed.
    fn in_flight_items(&self) -> &[BuildingItem];

    /// Take ownership of a freshly launched item.
    fn launch_item(&mut self, item: BuildingItem);
}

/// What happened during one [`BuilderTile::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// A new slot was launched.
    pub launched: bool,
    /// In-flight items whose effect landed this tick.
    pub arrived: usize,
}

/// Reference builder: a fixed block that regenerates energy each tick.
#[derive(Debug, Clone)]
pub struct BuilderTile {
    position: BlockPos,
    energy: Energy,
    max_energy: Energy,
    energy_per_tick: Energy,
    consumed_total: Energy,
    items: Vec<BuildingItem>,
    reclaimed: Vec<ItemStack>,
    scheduler: Option<BuildScheduler>,
}

impl BuilderTile {
    /// Empty builder at `position`.
    pub fn new(position: BlockPos, energy_per_tick: Energy, max_energy: Energy) -> Self {
        Self {
            position,
            energy: 0,
            max_energy,
            energy_per_tick,
            consumed_total: 0,
            items: Vec::new(),
            reclaimed: Vec::new(),
            scheduler: None,
        }
    }

    /// Block the builder sits on.
    pub fn position(&self) -> BlockPos {
        self.position
    }

    /// Where items are launched from.
    pub fn launch_point(&self) -> Position {
        self.position.center()
    }

    /// Stored energy.
    pub fn energy(&self) -> Energy {
        self.energy
    }

    /// Energy spent on approvals since creation.
    pub fn consumed_total(&self) -> Energy {
        self.consumed_total
    }

    /// Add energy, capped at the maximum.
    pub fn add_energy(&mut self, amount: Energy) {
        self.energy = self.energy.saturating_add(amount).min(self.max_energy);
    }

    /// Attach the scheduler to drive.
    pub fn set_scheduler(&mut self, scheduler: BuildScheduler) {
        self.scheduler = Some(scheduler);
    }

    /// Scheduler being driven, if any.
    pub fn scheduler(&self) -> Option<&BuildScheduler> {
        self.scheduler.as_ref()
    }

    /// Detach the scheduler (cancels the build; in-flight items keep going).
    pub fn take_scheduler(&mut self) -> Option<BuildScheduler> {
        self.scheduler.take()
    }

    /// One simulation step: move items, land arrivals, regenerate, schedule.
    pub fn tick<E>(&mut self, now: SimTick, env: &mut E) -> TickReport
    where
        E: Environment + ?Sized,
    {
        let mut report = TickReport::default();
        for item in &mut self.items {
            if item.update(env) {
                report.arrived += 1;
                merge_stacks(&mut self.reclaimed, item.take_reclaimed());
            }
        }
        self.remove_done_items();
        self.add_energy(self.energy_per_tick);

        if let Some(mut scheduler) = self.scheduler.take() {
            let origin = self.launch_point();
            report.launched = scheduler.advance(&*env, self, origin, now);
            self.scheduler = Some(scheduler);
        }
        report
    }

    /// Drop items whose effect has landed.
    pub fn remove_done_items(&mut self) {
        self.items.retain(|item| !item.is_done());
    }

    /// Drops collected from cleared blocks.
    pub fn reclaimed(&self) -> &[ItemStack] {
        &self.reclaimed
    }

    /// Drain collected drops.
    pub fn take_reclaimed(&mut self) -> Vec<ItemStack> {
        std::mem::take(&mut self.reclaimed)
    }

    /// True when a scheduler is attached and reports completion.
    pub fn is_build_done(&self) -> bool {
        self.scheduler
            .as_ref()
            .is_some_and(|scheduler| scheduler.is_done(self))
    }

    /// Persistable snapshot of the attached build.
    pub fn save_state(&self) -> Option<BuildState> {
        self.scheduler
            .as_ref()
            .map(|scheduler| scheduler.save_state(self))
    }
}

impl Builder for BuilderTile {
    fn available_energy(&self) -> Energy {
        self.energy
    }

    fn consume_energy(&mut self, amount: Energy) {
        self.energy = self.energy.saturating_sub(amount);
        self.consumed_total = self.consumed_total.saturating_add(amount);
    }

    fn in_flight_items(&self) -> &[BuildingItem] {
        &self.items
    }

    fn launch_item(&mut self, item: BuildingItem) {
        self.items.push(item);
    }
}
