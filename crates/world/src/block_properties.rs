//! Block properties - hardness and drops

use crate::{
    BlockId, BLOCK_AIR, BLOCK_BEDROCK, BLOCK_COBBLESTONE, BLOCK_DIRT, BLOCK_GLASS, BLOCK_GRASS,
    BLOCK_GRAVEL, BLOCK_IRON_ORE, BLOCK_OAK_LOG, BLOCK_OAK_PLANKS, BLOCK_OBSIDIAN, BLOCK_SAND,
    BLOCK_STONE,
};
use blockwright_core::{ItemStack, ItemType};

/// Highest block id with a registry entry.
const MAX_BLOCK_ID: usize = 255;

/// Properties of a block type
#[derive(Debug, Clone)]
pub struct BlockProperties {
    /// How hard the block is to remove. Negative means unbreakable.
    pub hardness: f32,

    /// Whether breaking the block drops itself as an item
    pub drops_self: bool,
}

impl Default for BlockProperties {
    fn default() -> Self {
        Self {
            hardness: 1.0,
            drops_self: true,
        }
    }
}

impl BlockProperties {
    /// Create properties for air (nothing to clear, nothing dropped)
    pub fn air() -> Self {
        Self {
            hardness: 0.0,
            drops_self: false,
        }
    }

    /// Create properties for dirt/grass
    pub fn dirt() -> Self {
        Self {
            hardness: 0.5,
            ..Self::default()
        }
    }

    /// Create properties for stone
    pub fn stone() -> Self {
        Self {
            hardness: 1.5,
            ..Self::default()
        }
    }

    /// Create properties for wood
    pub fn wood() -> Self {
        Self {
            hardness: 2.0,
            ..Self::default()
        }
    }

    /// Create properties for iron ore
    pub fn iron_ore() -> Self {
        Self {
            hardness: 3.0,
            ..Self::default()
        }
    }

    /// Create properties for glass (breaks without dropping itself).
    pub fn glass() -> Self {
        Self {
            hardness: 0.3,
            drops_self: false,
            ..Self::default()
        }
    }

    /// Create properties for obsidian (very expensive to clear).
    pub fn obsidian() -> Self {
        Self {
            hardness: 50.0,
            ..Self::default()
        }
    }

    /// Create properties for bedrock (unbreakable).
    pub fn bedrock() -> Self {
        Self {
            hardness: -1.0,
            drops_self: false,
            ..Self::default()
        }
    }

    /// Whether a builder is allowed to clear this block at all.
    pub fn is_breakable(&self) -> bool {
        self.hardness >= 0.0
    }

    /// Items produced when a block with these properties is removed.
    pub fn drops(&self, id: BlockId) -> Vec<ItemStack> {
        if id == BLOCK_AIR || !self.drops_self {
            return Vec::new();
        }
        vec![ItemStack::new(ItemType::Block(id), 1)]
    }
}

/// Block properties registry
pub struct BlockPropertiesRegistry {
    properties: Vec<BlockProperties>,
}

impl BlockPropertiesRegistry {
    /// Create registry with default block properties
    pub fn new() -> Self {
        let mut properties = vec![BlockProperties::default(); MAX_BLOCK_ID + 1];

        properties[BLOCK_AIR as usize] = BlockProperties::air();
        properties[BLOCK_STONE as usize] = BlockProperties::stone();
        properties[BLOCK_DIRT as usize] = BlockProperties::dirt();
        properties[BLOCK_GRASS as usize] = BlockProperties::dirt();
        properties[BLOCK_SAND as usize] = BlockProperties::dirt();
        properties[BLOCK_GRAVEL as usize] = BlockProperties {
            hardness: 0.6,
            ..BlockProperties::default()
        };
        properties[BLOCK_OAK_LOG as usize] = BlockProperties::wood();
        properties[BLOCK_OAK_PLANKS as usize] = BlockProperties::wood();
        properties[BLOCK_COBBLESTONE as usize] = BlockProperties::wood();
        properties[BLOCK_GLASS as usize] = BlockProperties::glass();
        properties[BLOCK_BEDROCK as usize] = BlockProperties::bedrock();
        properties[BLOCK_IRON_ORE as usize] = BlockProperties::iron_ore();
        properties[BLOCK_OBSIDIAN as usize] = BlockProperties::obsidian();

        Self { properties }
    }

    /// Get properties for a block ID
    pub fn get(&self, block_id: BlockId) -> &BlockProperties {
        self.properties
            .get(block_id as usize)
            .unwrap_or(&self.properties[BLOCK_AIR as usize]) // Default to air if invalid
    }
}

impl Default for BlockPropertiesRegistry {
    fn default() -> Self {
        Self::new()
    }
}
