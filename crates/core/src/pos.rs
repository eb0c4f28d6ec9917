//! Block-grid coordinates and continuous world positions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Integer block coordinate in world space.
///
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then y, then z).
/// Serialized as an `[x, y, z]` triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct BlockPos {
    /// East/west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North/south axis.
    pub z: i32,
}

impl BlockPos {
    /// Origin of the block grid.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create a block coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Centre of this block as a continuous position.
    pub fn center(self) -> Position {
        Position::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y) + 0.5,
            f64::from(self.z) + 0.5,
        )
    }

    /// Component-wise addition, `None` if any axis overflows.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(rhs.x)?,
            self.y.checked_add(rhs.y)?,
            self.z.checked_add(rhs.z)?,
        ))
    }

    /// Component-wise subtraction, `None` if any axis overflows.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        Some(Self::new(
            self.x.checked_sub(rhs.x)?,
            self.y.checked_sub(rhs.y)?,
            self.z.checked_sub(rhs.z)?,
        ))
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<BlockPos> for [i32; 3] {
    fn from(pos: BlockPos) -> Self {
        [pos.x, pos.y, pos.z]
    }
}

impl Add for BlockPos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for BlockPos {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Continuous world position (block units).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Position {
    /// East/west axis.
    pub x: f64,
    /// Vertical axis.
    pub y: f64,
    /// North/south axis.
    pub z: f64,
}

impl Position {
    /// Create a world position.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation towards `other` (`t` clamped to 0..=1).
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }

    /// Block containing this position.
    pub fn block(self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Position> for [f64; 3] {
    fn from(pos: Position) -> Self {
        [pos.x, pos.y, pos.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_pos_orders_by_x_then_y_then_z() {
        let mut positions = vec![
            BlockPos::new(1, 0, 0),
            BlockPos::new(0, 2, 0),
            BlockPos::new(0, 1, 5),
            BlockPos::new(0, 1, 2),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                BlockPos::new(0, 1, 2),
                BlockPos::new(0, 1, 5),
                BlockPos::new(0, 2, 0),
                BlockPos::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn block_pos_serializes_as_triple() {
        let json = serde_json::to_string(&BlockPos::new(3, -4, 5)).unwrap();
        assert_eq!(json, "[3,-4,5]");
        let back: BlockPos = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BlockPos::new(3, -4, 5));
    }

    #[test]
    fn center_is_offset_by_half_a_block() {
        let c = BlockPos::new(1, -1, 0).center();
        assert_eq!(c, Position::new(1.5, -0.5, 0.5));
        assert_eq!(c.block(), BlockPos::new(1, -1, 0));
    }

    #[test]
    fn checked_ops_reject_overflow() {
        let edge = BlockPos::new(i32::MAX, 0, i32::MIN);
        assert_eq!(edge.checked_add(BlockPos::new(1, 0, 0)), None);
        assert_eq!(edge.checked_sub(BlockPos::new(0, 0, 1)), None);
        assert_eq!(
            edge.checked_sub(BlockPos::new(1, -2, -1)),
            Some(BlockPos::new(i32::MAX - 1, 2, i32::MIN + 1))
        );
    }

    #[test]
    fn lerp_clamps_progress() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(10.0, 0.0, 0.0);
        assert_eq!(a.lerp(b, 0.5), Position::new(5.0, 0.0, 0.0));
        assert_eq!(a.lerp(b, 2.0), b);
        assert!((a.distance(b) - 10.0).abs() < f64::EPSILON);
    }
}
