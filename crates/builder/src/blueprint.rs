//! Immutable build plans.
//!
//! A [`Blueprint`] lists which voxel goes where, relative to its own corner.
//! It never changes once loaded and is shared through `Arc` by the context,
//! the scheduler and every in-flight item.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use blockwright_core::{BlockPos, ItemStack, ItemType};
use blockwright_world::{BlockId, BlockState, Voxel, BLOCK_AIR};
use serde::{Deserialize, Serialize};

use crate::BlueprintError;

/// What a single blueprint cell asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schematic {
    /// Block to place.
    pub block: BlockId,
    /// State bits of the placed block.
    #[serde(default)]
    pub state: BlockState,
    /// Items carried to the destination (shown in transit, priced by the cost model).
    #[serde(default)]
    pub requirements: Vec<ItemStack>,
    /// Ticks the builder waits after launching this placement. Falls back to the
    /// configured default when absent.
    #[serde(default)]
    pub build_time: Option<u64>,
}

impl Schematic {
    /// Place `block` carrying one copy of itself.
    pub fn block(block: BlockId) -> Self {
        let requirements = if block == BLOCK_AIR {
            Vec::new()
        } else {
            vec![ItemStack::new(ItemType::Block(block), 1)]
        };
        Self {
            block,
            state: 0,
            requirements,
            build_time: None,
        }
    }

    /// Override the state bits.
    pub fn with_state(mut self, state: BlockState) -> Self {
        self.state = state;
        self
    }

    /// Override the post-launch cooldown.
    pub fn with_build_time(mut self, ticks: u64) -> Self {
        self.build_time = Some(ticks);
        self
    }

    /// Voxel written on arrival.
    pub fn voxel(&self) -> Voxel {
        Voxel::with_state(self.block, self.state)
    }

    /// Air schematics mark cells that should stay empty.
    pub fn is_air(&self) -> bool {
        self.block == BLOCK_AIR
    }
}

/// Target structure: size, anchor and the placements inside `[0, size)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BlueprintFile", into = "BlueprintFile")]
pub struct Blueprint {
    name: Option<String>,
    size: BlockPos,
    anchor: BlockPos,
    placements: BTreeMap<BlockPos, Schematic>,
}

impl Blueprint {
    /// Create an empty blueprint. Every size component must be positive.
    pub fn new(size: BlockPos, anchor: BlockPos) -> Result<Self, BlueprintError> {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return Err(BlueprintError::EmptySize { size });
        }
        Ok(Self {
            name: None,
            size,
            anchor,
            placements: BTreeMap::new(),
        })
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder-style [`Blueprint::insert`].
    pub fn with_placement(mut self, pos: BlockPos, schematic: Schematic) -> Result<Self, BlueprintError> {
        self.insert(pos, schematic)?;
        Ok(self)
    }

    /// Add or replace the placement at relative coordinate `pos`.
    pub fn insert(&mut self, pos: BlockPos, schematic: Schematic) -> Result<(), BlueprintError> {
        if !self.contains_relative(pos) {
            return Err(BlueprintError::PlacementOutOfBounds {
                pos,
                size: self.size,
            });
        }
        self.placements.insert(pos, schematic);
        Ok(())
    }

    /// Parse a blueprint from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, BlueprintError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a blueprint from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self, BlueprintError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, BlueprintError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Extent along each axis.
    pub fn size(&self) -> BlockPos {
        self.size
    }

    /// Offset of the origin inside the blueprint.
    pub fn anchor(&self) -> BlockPos {
        self.anchor
    }

    /// Placement at relative coordinate `pos`.
    pub fn placement(&self, pos: BlockPos) -> Option<&Schematic> {
        self.placements.get(&pos)
    }

    /// All placements in coordinate order.
    pub fn placements(&self) -> impl Iterator<Item = (BlockPos, &Schematic)> + '_ {
        self.placements.iter().map(|(pos, schematic)| (*pos, schematic))
    }

    /// Number of placement requests (air included).
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// True when the blueprint requests nothing.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Whether `pos` lies inside `[0, size)`.
    pub fn contains_relative(&self, pos: BlockPos) -> bool {
        (0..self.size.x).contains(&pos.x)
            && (0..self.size.y).contains(&pos.y)
            && (0..self.size.z).contains(&pos.z)
    }
}

/// On-disk form: placements as a list so keys need not be JSON strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlueprintFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    size: BlockPos,
    #[serde(default)]
    anchor: BlockPos,
    #[serde(default)]
    placements: Vec<PlacementEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlacementEntry {
    pos: BlockPos,
    #[serde(flatten)]
    schematic: Schematic,
}

impl TryFrom<BlueprintFile> for Blueprint {
    type Error = BlueprintError;

    fn try_from(file: BlueprintFile) -> Result<Self, Self::Error> {
        let mut blueprint = Blueprint::new(file.size, file.anchor)?;
        blueprint.name = file.name;
        for entry in file.placements {
            blueprint.insert(entry.pos, entry.schematic)?;
        }
        Ok(blueprint)
    }
}

impl From<Blueprint> for BlueprintFile {
    fn from(blueprint: Blueprint) -> Self {
        Self {
            name: blueprint.name,
            size: blueprint.size,
            anchor: blueprint.anchor,
            placements: blueprint
                .placements
                .into_iter()
                .map(|(pos, schematic)| PlacementEntry { pos, schematic })
                .collect(),
        }
    }
}
