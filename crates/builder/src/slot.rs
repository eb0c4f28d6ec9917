use blockwright_core::{BlockPos, ItemStack};
use serde::{Deserialize, Serialize};

use crate::{Energy, Schematic};

/// Effect a slot has on arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotKind {
    /// Write the schematic's voxel.
    Place {
        /// Blueprint request being fulfilled.
        schematic: Schematic,
    },
    /// Remove whatever occupies the cell.
    Clear,
}

/// Energy and cooldown charged for one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCost {
    /// Energy deducted on approval.
    pub energy: Energy,
    /// Ticks before the scheduler offers the next slot.
    pub build_time: u64,
}

/// One unit of work at a single coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSlot {
    /// Absolute target cell.
    pub destination: BlockPos,
    /// Place or clear.
    #[serde(flatten)]
    pub kind: SlotKind,
    /// Price paid on approval.
    pub cost: SlotCost,
    /// Items the placement carries.
    #[serde(default)]
    pub consumed: Vec<ItemStack>,
    /// Material a clear yields.
    #[serde(default)]
    pub produced: Vec<ItemStack>,
    /// Set once the slot has been approved and launched.
    #[serde(default)]
    pub built: bool,
}

impl BuildingSlot {
    /// Placement slot carrying the schematic's requirements.
    pub fn place(destination: BlockPos, schematic: Schematic, cost: SlotCost) -> Self {
        Self {
            destination,
            consumed: schematic.requirements.clone(),
            kind: SlotKind::Place { schematic },
            cost,
            produced: Vec::new(),
            built: false,
        }
    }

    /// Clearing slot yielding `produced`.
    pub fn clear(destination: BlockPos, cost: SlotCost, produced: Vec<ItemStack>) -> Self {
        Self {
            destination,
            kind: SlotKind::Clear,
            cost,
            consumed: Vec::new(),
            produced,
            built: false,
        }
    }

    /// True for clearing slots.
    pub fn is_clear(&self) -> bool {
        matches!(self.kind, SlotKind::Clear)
    }

    /// Schematic of a placement slot.
    pub fn schematic(&self) -> Option<&Schematic> {
        match &self.kind {
            SlotKind::Place { schematic } => Some(schematic),
            SlotKind::Clear => None,
        }
    }

    /// Stacks shown while the slot's item is in transit.
    pub fn display_stacks(&self) -> Vec<ItemStack> {
        match self.kind {
            SlotKind::Place { .. } => self.consumed.clone(),
            SlotKind::Clear => self.produced.clone(),
        }
    }
}
