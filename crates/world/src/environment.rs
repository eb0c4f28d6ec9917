use blockwright_core::{BlockPos, ItemStack};

use crate::Voxel;

/// Capability the builder uses to inspect and mutate the world.
///
/// Reads (`voxel_at`, `hardness_at`) must reflect the current state at call
/// time; callers do not cache them across ticks.
pub trait Environment {
    /// Voxel currently stored at `pos` (air when nothing is there).
    fn voxel_at(&self, pos: BlockPos) -> Voxel;

    /// Hardness of the block at `pos`. Negative values mark unbreakable blocks.
    fn hardness_at(&self, pos: BlockPos) -> f32;

    /// Whether the block at `pos` may be cleared at all.
    fn is_breakable(&self, pos: BlockPos) -> bool {
        self.hardness_at(pos) >= 0.0
    }

    /// Write `voxel` at `pos`, replacing whatever was there.
    fn place_at(&mut self, pos: BlockPos, voxel: Voxel);

    /// Remove the block at `pos`, returning what it drops.
    fn clear_at(&mut self, pos: BlockPos) -> Vec<ItemStack>;
}
