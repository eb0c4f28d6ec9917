//! Voxel environment the builder operates on.
//!
//! The scheduler never reaches into world storage directly; it receives an
//! [`Environment`] and reads hardness/voxels or applies effects through it.

mod block_properties;
mod environment;
mod grid;
mod voxel;

pub use block_properties::*;
pub use environment::*;
pub use grid::*;
pub use voxel::*;
