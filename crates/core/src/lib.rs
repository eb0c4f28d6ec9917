#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod item;
pub mod pos;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use item::{merge_stacks, total_count, ItemStack, ItemType, RECLAIMED_MATERIAL};
pub use pos::{BlockPos, Position};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// Ticks elapsed since `earlier` (zero if `earlier` is in the future).
    pub fn since(self, earlier: SimTick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
