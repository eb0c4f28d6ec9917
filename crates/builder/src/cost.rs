//! Energy pricing for slots.

use blockwright_core::{ItemStack, ItemType, RECLAIMED_MATERIAL, total_count};
use serde::{Deserialize, Serialize};

use crate::{Energy, Schematic, SlotCost};

/// Energy charged per hardness step when clearing.
pub const BREAK_ENERGY_UNIT: Energy = 10;
/// Energy charged per carried item when placing.
pub const BUILD_ENERGY_UNIT: Energy = 20;
/// Cooldown after a placement whose schematic sets none.
pub const DEFAULT_PLACE_TICKS: u64 = 1;

/// Unit prices the scheduler charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// See [`BREAK_ENERGY_UNIT`].
    pub break_energy_unit: Energy,
    /// See [`BUILD_ENERGY_UNIT`].
    pub build_energy_unit: Energy,
    /// See [`DEFAULT_PLACE_TICKS`].
    pub default_place_ticks: u64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            break_energy_unit: BREAK_ENERGY_UNIT,
            build_energy_unit: BUILD_ENERGY_UNIT,
            default_place_ticks: DEFAULT_PLACE_TICKS,
        }
    }
}

impl CostModel {
    /// `(trunc(hardness) + 1) * 2`. Negative hardness counts as zero.
    pub fn hardness_factor(hardness: f32) -> u64 {
        let steps = if hardness.is_finite() && hardness > 0.0 {
            hardness.trunc() as u64
        } else {
            0
        };
        (steps + 1) * 2
    }

    /// Price of clearing a block of the given hardness.
    pub fn clear_cost(&self, hardness: f32) -> SlotCost {
        let factor = Self::hardness_factor(hardness);
        SlotCost {
            energy: factor * self.break_energy_unit,
            build_time: (factor / 2).max(1),
        }
    }

    /// Reclaimed material from clearing a block of the given hardness
    /// (`cost / BREAK_ENERGY_UNIT` units).
    pub fn clear_yield(&self, hardness: f32) -> Vec<ItemStack> {
        let units = Self::hardness_factor(hardness).min(u64::from(u32::MAX)) as u32;
        ItemStack::split_into_stacks(ItemType::Item(RECLAIMED_MATERIAL), units)
    }

    /// Price of placing `schematic`.
    pub fn place_cost(&self, schematic: &Schematic) -> SlotCost {
        let items = total_count(&schematic.requirements).max(1);
        SlotCost {
            energy: self.build_energy_unit.saturating_mul(items),
            build_time: schematic.build_time.unwrap_or(self.default_place_ticks),
        }
    }
}
