/// Block identifier referencing the registry.
pub type BlockId = u16;
/// Block state metadata bits.
pub type BlockState = u16;

/// Reserved ID for air.
pub const BLOCK_AIR: BlockId = 0;

/// ID for stone block.
pub const BLOCK_STONE: BlockId = 1;

/// ID for dirt block.
pub const BLOCK_DIRT: BlockId = 2;

/// ID for grass block.
pub const BLOCK_GRASS: BlockId = 3;

/// ID for sand block.
pub const BLOCK_SAND: BlockId = 4;

/// ID for gravel block.
pub const BLOCK_GRAVEL: BlockId = 5;

/// ID for oak log.
pub const BLOCK_OAK_LOG: BlockId = 6;

/// ID for oak planks.
pub const BLOCK_OAK_PLANKS: BlockId = 7;

/// ID for cobblestone.
pub const BLOCK_COBBLESTONE: BlockId = 8;

/// ID for glass.
pub const BLOCK_GLASS: BlockId = 9;

/// ID for bedrock (unbreakable).
pub const BLOCK_BEDROCK: BlockId = 10;

/// ID for iron ore.
pub const BLOCK_IRON_ORE: BlockId = 15;

/// ID for obsidian.
pub const BLOCK_OBSIDIAN: BlockId = 23;

/// Per-voxel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Voxel {
    pub id: BlockId,
    #[serde(default)]
    pub state: BlockState,
}

impl Voxel {
    /// Air voxel.
    pub const AIR: Self = Self::new(BLOCK_AIR);

    pub const fn new(id: BlockId) -> Self {
        Self { id, state: 0 }
    }

    pub const fn with_state(id: BlockId, state: BlockState) -> Self {
        Self { id, state }
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.id == BLOCK_AIR
    }
}
