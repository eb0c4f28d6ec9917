use std::collections::BTreeMap;

use blockwright_core::{BlockPos, ItemStack};
use tracing::warn;

use crate::{BlockPropertiesRegistry, Environment, Voxel};

/// Lowest buildable Y level.
pub const WORLD_MIN_Y: i32 = 0;
/// Highest buildable Y level (inclusive).
pub const WORLD_MAX_Y: i32 = 255;

/// Sparse in-memory voxel world.
/// Uses BTreeMap for deterministic iteration order; absent entries are air.
pub struct GridWorld {
    voxels: BTreeMap<BlockPos, Voxel>,
    properties: BlockPropertiesRegistry,
}

impl GridWorld {
    /// Create an empty (all-air) world with the default block registry.
    pub fn new() -> Self {
        Self {
            voxels: BTreeMap::new(),
            properties: BlockPropertiesRegistry::new(),
        }
    }

    /// Number of non-air voxels.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Returns true when every voxel is air.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Whether `pos` lies inside the buildable height range.
    pub fn in_bounds(pos: BlockPos) -> bool {
        (WORLD_MIN_Y..=WORLD_MAX_Y).contains(&pos.y)
    }

    /// Set a voxel directly, bypassing drops. Air removes the entry.
    pub fn set_voxel(&mut self, pos: BlockPos, voxel: Voxel) {
        if !Self::in_bounds(pos) {
            warn!(%pos, "ignoring voxel write outside world height");
            return;
        }
        if voxel.is_air() {
            self.voxels.remove(&pos);
        } else {
            self.voxels.insert(pos, voxel);
        }
    }

    /// Iterate over non-air voxels in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, Voxel)> + '_ {
        self.voxels.iter().map(|(pos, voxel)| (*pos, *voxel))
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for GridWorld {
    fn voxel_at(&self, pos: BlockPos) -> Voxel {
        self.voxels.get(&pos).copied().unwrap_or_default()
    }

    fn hardness_at(&self, pos: BlockPos) -> f32 {
        self.properties.get(self.voxel_at(pos).id).hardness
    }

    fn is_breakable(&self, pos: BlockPos) -> bool {
        self.properties.get(self.voxel_at(pos).id).is_breakable()
    }

    fn place_at(&mut self, pos: BlockPos, voxel: Voxel) {
        self.set_voxel(pos, voxel);
    }

    fn clear_at(&mut self, pos: BlockPos) -> Vec<ItemStack> {
        match self.voxels.remove(&pos) {
            Some(voxel) => self.properties.get(voxel.id).drops(voxel.id),
            None => Vec::new(),
        }
    }
}
