#![warn(missing_docs)]
//! Blueprint-driven construction.
//!
//! A [`BuildScheduler`] walks a [`Blueprint`] anchored by a [`BuildContext`],
//! charges a [`Builder`]'s energy for each approved [`BuildingSlot`] and
//! launches it as a [`BuildingItem`] that lands on the [`Environment`] after a
//! travel delay. Progress can be saved as a [`BuildState`] and restored later.
//!
//! [`Environment`]: blockwright_world::Environment

mod blueprint;
mod builder;
mod context;
mod cost;
mod error;
mod item;
mod persist;
mod scheduler;
mod slot;

pub use blueprint::{Blueprint, Schematic};
pub use builder::{Builder, BuilderTile, TickReport};
pub use context::{BoundingBox, BuildContext};
pub use cost::{CostModel, BREAK_ENERGY_UNIT, BUILD_ENERGY_UNIT, DEFAULT_PLACE_TICKS};
pub use error::{BlueprintError, BuildError, PersistError};
pub use item::{BuildingItem, BuildingItemRecord, DEFAULT_TICKS_PER_BLOCK};
pub use persist::{
    decode_state, encode_state, load_state_file, save_state_file, BuildState, STATE_MAGIC,
    STATE_VERSION,
};
pub use scheduler::{BuildProgress, BuildScheduler, BuildStrategy, NextSlot, RestoreReport};
pub use slot::{BuildingSlot, SlotCost, SlotKind};

/// Energy units drawn by approvals.
pub type Energy = u64;
