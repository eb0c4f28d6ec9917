//! In-flight transfers between the builder and a destination cell.

use blockwright_core::{ItemStack, Position};
use blockwright_world::Environment;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{BuildContext, BuildError, BuildingSlot, SlotKind};

/// Default travel speed (ticks per block of distance).
pub const DEFAULT_TICKS_PER_BLOCK: f64 = 0.5;

/// A slot travelling from the builder to its destination.
///
/// The effect lands exactly once, on the tick the item arrives.
#[derive(Debug, Clone)]
pub struct BuildingItem {
    /// Launch point.
    pub origin: Position,
    /// Centre of the destination cell.
    pub destination: Position,
    /// Work carried.
    pub slot: BuildingSlot,
    context: BuildContext,
    display: Vec<ItemStack>,
    lifetime: u64,
    max_lifetime: u64,
    done: bool,
    reclaimed: Vec<ItemStack>,
}

impl BuildingItem {
    /// Launch `slot` from `origin`. Travel time is
    /// `max(1, ceil(distance * ticks_per_block))` ticks.
    pub fn new(origin: Position, slot: BuildingSlot, context: BuildContext, ticks_per_block: f64) -> Self {
        let destination = slot.destination.center();
        let travel = (origin.distance(destination) * ticks_per_block.max(0.0)).ceil();
        let max_lifetime = if travel.is_finite() { (travel as u64).max(1) } else { 1 };
        let display = slot.display_stacks();
        Self {
            origin,
            destination,
            slot,
            context,
            display,
            lifetime: 0,
            max_lifetime,
            done: false,
            reclaimed: Vec::new(),
        }
    }

    /// Advance one tick; returns true on the tick the effect is applied.
    pub fn update<E: Environment + ?Sized>(&mut self, env: &mut E) -> bool {
        if self.done {
            return false;
        }
        self.lifetime += 1;
        if self.lifetime < self.max_lifetime {
            return false;
        }
        let pos = self.slot.destination;
        match &self.slot.kind {
            SlotKind::Place { schematic } => env.place_at(pos, schematic.voxel()),
            SlotKind::Clear => {
                let drops = env.clear_at(pos);
                self.reclaimed.extend(drops);
            }
        }
        debug!(%pos, clear = self.slot.is_clear(), "building item arrived");
        self.done = true;
        true
    }

    /// Whether the effect has been applied.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Interpolated position for renderers.
    pub fn position(&self) -> Position {
        let t = self.lifetime as f64 / self.max_lifetime as f64;
        self.origin.lerp(self.destination, t)
    }

    /// Ticks travelled so far.
    pub fn lifetime(&self) -> u64 {
        self.lifetime
    }

    /// Total travel time in ticks.
    pub fn max_lifetime(&self) -> u64 {
        self.max_lifetime
    }

    /// Stacks shown in transit.
    pub fn display(&self) -> &[ItemStack] {
        &self.display
    }

    /// Context the item was launched for.
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    /// Drops collected by a clear on arrival; drained by the builder.
    pub fn take_reclaimed(&mut self) -> Vec<ItemStack> {
        std::mem::take(&mut self.reclaimed)
    }

    /// Snapshot for persistence.
    pub fn to_record(&self) -> BuildingItemRecord {
        BuildingItemRecord {
            origin: self.origin,
            destination: self.destination,
            slot: self.slot.clone(),
            display: self.display.clone(),
            lifetime: self.lifetime,
            max_lifetime: self.max_lifetime,
        }
    }

    /// Re-attach a persisted item to `context`.
    ///
    /// Placements must still match a blueprint request at their relative
    /// coordinate (the schematic is taken from the current blueprint); clears
    /// must still fall inside the region.
    pub fn from_record(record: &BuildingItemRecord, context: &BuildContext) -> Result<Self, BuildError> {
        let pos = record.slot.destination;
        let mut slot = record.slot.clone();
        match &mut slot.kind {
            SlotKind::Place { schematic } => match context.schematic_at(pos) {
                Some(current) if !current.is_air() => *schematic = current.clone(),
                _ => {
                    warn!(%pos, "persisted placement has no blueprint mapping");
                    return Err(BuildError::UnresolvableCoordinateMapping { pos });
                }
            },
            SlotKind::Clear => {
                if !context.contains(pos) {
                    warn!(%pos, "persisted clear lies outside the build region");
                    return Err(BuildError::UnresolvableCoordinateMapping { pos });
                }
            }
        }
        let max_lifetime = record.max_lifetime.max(1);
        Ok(Self {
            origin: record.origin,
            destination: pos.center(),
            slot,
            context: context.clone(),
            display: record.display.clone(),
            lifetime: record.lifetime.min(max_lifetime),
            max_lifetime,
            done: false,
            reclaimed: Vec::new(),
        })
    }
}

/// Persisted form of an in-flight [`BuildingItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingItemRecord {
    /// Launch point.
    pub origin: Position,
    /// Centre of the destination cell.
    pub destination: Position,
    /// Slot snapshot.
    pub slot: BuildingSlot,
    /// Stacks shown in transit.
    #[serde(default)]
    pub display: Vec<ItemStack>,
    /// Ticks travelled when saved.
    #[serde(default)]
    pub lifetime: u64,
    /// Total travel time.
    #[serde(default)]
    pub max_lifetime: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blueprint, Schematic, SlotCost};
    use blockwright_core::BlockPos;
    use blockwright_world::{GridWorld, Voxel, BLOCK_DIRT, BLOCK_STONE};
    use std::sync::Arc;

    fn context() -> BuildContext {
        let bp = Blueprint::new(BlockPos::new(2, 2, 2), BlockPos::ZERO)
            .unwrap()
            .with_placement(BlockPos::ZERO, Schematic::block(BLOCK_STONE))
            .unwrap();
        BuildContext::new(BlockPos::new(0, 10, 0), Arc::new(bp)).unwrap()
    }

    fn place_slot() -> BuildingSlot {
        BuildingSlot::place(
            BlockPos::new(0, 10, 0),
            Schematic::block(BLOCK_STONE),
            SlotCost {
                energy: 20,
                build_time: 1,
            },
        )
    }

    #[test]
    fn travel_time_scales_with_distance() {
        let origin = BlockPos::new(0, 20, 0).center();
        let item = BuildingItem::new(origin, place_slot(), context(), 0.5);
        assert_eq!(item.max_lifetime(), 5);
        assert_eq!(item.destination, BlockPos::new(0, 10, 0).center());

        let adjacent = BuildingItem::new(item.destination, place_slot(), context(), 0.5);
        assert_eq!(adjacent.max_lifetime(), 1);
    }

    #[test]
    fn effect_applies_exactly_once_on_arrival() {
        let mut world = GridWorld::new();
        let origin = BlockPos::new(0, 14, 0).center();
        let mut item = BuildingItem::new(origin, place_slot(), context(), 0.5);
        assert_eq!(item.max_lifetime(), 2);

        assert!(!item.update(&mut world));
        assert!(world.is_empty());
        assert!(item.update(&mut world));
        assert!(item.is_done());
        assert_eq!(world.voxel_at(BlockPos::new(0, 10, 0)), Voxel::new(BLOCK_STONE));

        world.set_voxel(BlockPos::new(0, 10, 0), Voxel::AIR);
        assert!(!item.update(&mut world));
        assert!(world.is_empty());
    }

    #[test]
    fn clear_collects_drops() {
        let mut world = GridWorld::new();
        let pos = BlockPos::new(1, 11, 1);
        world.set_voxel(pos, Voxel::new(BLOCK_DIRT));
        let slot = BuildingSlot::clear(pos, SlotCost::default(), Vec::new());
        let mut item = BuildingItem::new(pos.center(), slot, context(), 1.0);
        assert!(item.update(&mut world));
        assert!(world.voxel_at(pos).is_air());
        assert_eq!(item.take_reclaimed().len(), 1);
        assert!(item.take_reclaimed().is_empty());
    }

    #[test]
    fn record_restores_progress() {
        let origin = BlockPos::new(0, 20, 0).center();
        let mut item = BuildingItem::new(origin, place_slot(), context(), 0.5);
        let mut world = GridWorld::new();
        item.update(&mut world);
        item.update(&mut world);

        let record = item.to_record();
        let restored = BuildingItem::from_record(&record, &context()).unwrap();
        assert_eq!(restored.lifetime(), 2);
        assert_eq!(restored.max_lifetime(), 5);
        assert_eq!(restored.slot, item.slot);
    }

    #[test]
    fn record_without_mapping_is_rejected() {
        let mut record = BuildingItem::new(Position::default(), place_slot(), context(), 0.5).to_record();
        record.slot.destination = BlockPos::new(1, 10, 0);
        assert_eq!(
            BuildingItem::from_record(&record, &context()).unwrap_err(),
            BuildError::UnresolvableCoordinateMapping {
                pos: BlockPos::new(1, 10, 0)
            }
        );

        let far_clear = BuildingSlot::clear(BlockPos::new(50, 0, 0), SlotCost::default(), Vec::new());
        let record = BuildingItem::new(Position::default(), far_clear, context(), 0.5).to_record();
        assert!(BuildingItem::from_record(&record, &context()).is_err());
    }
}
