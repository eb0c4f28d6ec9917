//! Placement of a blueprint in the world.

use std::sync::Arc;

use blockwright_core::BlockPos;

use crate::{Blueprint, BlueprintError, Schematic};

/// Inclusive axis-aligned box of block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Smallest corner.
    pub min: BlockPos,
    /// Largest corner (inclusive).
    pub max: BlockPos,
}

impl BoundingBox {
    /// Whether `pos` lies inside the box.
    pub fn contains(&self, pos: BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }

    /// Number of cells in the box.
    pub fn volume(&self) -> u64 {
        let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1).max(0) as u64;
        span(self.min.x, self.max.x) * span(self.min.y, self.max.y) * span(self.min.z, self.max.z)
    }

    /// Cells from the top layer down; x then z within a layer.
    pub fn iter_top_down(&self) -> impl Iterator<Item = BlockPos> + '_ {
        (self.min.y..=self.max.y).rev().flat_map(move |y| {
            (self.min.x..=self.max.x)
                .flat_map(move |x| (self.min.z..=self.max.z).map(move |z| BlockPos::new(x, y, z)))
        })
    }
}

/// A blueprint anchored at an absolute origin.
#[derive(Debug, Clone)]
pub struct BuildContext {
    origin: BlockPos,
    blueprint: Arc<Blueprint>,
    region: BoundingBox,
}

impl BuildContext {
    /// Anchor `blueprint` so its anchor cell lands on `origin`.
    ///
    /// Fails when any corner of the covered region falls outside `i32`.
    pub fn new(origin: BlockPos, blueprint: Arc<Blueprint>) -> Result<Self, BlueprintError> {
        let anchor = blueprint.anchor();
        let size = blueprint.size();
        let region = origin
            .checked_sub(anchor)
            .and_then(|min| {
                let max = min.checked_add(size - BlockPos::new(1, 1, 1))?;
                Some(BoundingBox { min, max })
            })
            .ok_or(BlueprintError::RegionOverflow {
                origin,
                anchor,
                size,
            })?;
        Ok(Self {
            origin,
            blueprint,
            region,
        })
    }

    /// Absolute position of the anchor cell.
    pub fn origin(&self) -> BlockPos {
        self.origin
    }

    /// Shared blueprint.
    pub fn blueprint(&self) -> &Arc<Blueprint> {
        &self.blueprint
    }

    /// Region the blueprint covers.
    pub fn region(&self) -> BoundingBox {
        self.region
    }

    /// Relative blueprint coordinate -> absolute world coordinate.
    ///
    /// `relative` must lie inside the blueprint size.
    pub fn to_absolute(&self, relative: BlockPos) -> BlockPos {
        self.region.min + relative
    }

    /// Absolute world coordinate -> relative blueprint coordinate, `None`
    /// when the offset does not fit in `i32`.
    pub fn to_relative(&self, absolute: BlockPos) -> Option<BlockPos> {
        absolute.checked_sub(self.region.min)
    }

    /// Whether `absolute` lies inside the covered region.
    pub fn contains(&self, absolute: BlockPos) -> bool {
        self.region.contains(absolute)
    }

    /// What the blueprint wants at `absolute`, if anything.
    pub fn schematic_at(&self, absolute: BlockPos) -> Option<&Schematic> {
        if !self.contains(absolute) {
            return None;
        }
        self.blueprint.placement(self.to_relative(absolute)?)
    }
}
