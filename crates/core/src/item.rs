//! Item system - placeable blocks and generic materials carried by builders

use serde::{Deserialize, Serialize};

/// Generic item id for material reclaimed when a builder clears a block.
pub const RECLAIMED_MATERIAL: u16 = 1;

/// Item type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemType {
    /// A placeable block
    Block(u16), // BlockId
    /// Generic item
    Item(u16),
}

/// An item stack in inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Type of item
    pub item_type: ItemType,
    /// Quantity in stack
    pub count: u32,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(item_type: ItemType, count: u32) -> Self {
        Self { item_type, count }
    }

    /// A stack of generic reclaimed material.
    pub fn reclaimed(count: u32) -> Self {
        Self::new(ItemType::Item(RECLAIMED_MATERIAL), count)
    }

    /// Maximum stack size for this item type
    pub fn max_stack_size(&self) -> u32 {
        match self.item_type {
            ItemType::Block(_) => 64,
            ItemType::Item(_) => 64,
        }
    }

    /// Split `total` items of one type into stacks no larger than the max stack size.
    pub fn split_into_stacks(item_type: ItemType, total: u32) -> Vec<ItemStack> {
        let max = ItemStack::new(item_type, 0).max_stack_size().max(1);
        let mut stacks = Vec::with_capacity((total / max + 1) as usize);
        let mut remaining = total;
        while remaining > 0 {
            let count = remaining.min(max);
            stacks.push(ItemStack::new(item_type, count));
            remaining -= count;
        }
        stacks
    }
}

/// Sum of item counts across `stacks`.
pub fn total_count(stacks: &[ItemStack]) -> u64 {
    stacks.iter().map(|s| u64::from(s.count)).sum()
}

/// Merge stacks of the same type into `into`, respecting max stack sizes.
pub fn merge_stacks(into: &mut Vec<ItemStack>, stacks: impl IntoIterator<Item = ItemStack>) {
    for mut stack in stacks {
        for existing in into.iter_mut() {
            if stack.count == 0 {
                break;
            }
            if existing.item_type != stack.item_type {
                continue;
            }
            let room = existing.max_stack_size().saturating_sub(existing.count);
            let moved = room.min(stack.count);
            existing.count += moved;
            stack.count -= moved;
        }
        if stack.count > 0 {
            into.extend(ItemStack::split_into_stacks(stack.item_type, stack.count));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_stack() {
        let stack = ItemStack::new(ItemType::Block(1), 64);
        assert_eq!(stack.count, 64);
        assert_eq!(stack.max_stack_size(), 64);
    }

    #[test]
    fn split_respects_max_stack_size() {
        let stacks = ItemStack::split_into_stacks(ItemType::Item(RECLAIMED_MATERIAL), 130);
        let counts: Vec<u32> = stacks.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![64, 64, 2]);
        assert_eq!(total_count(&stacks), 130);
    }

    #[test]
    fn split_of_zero_is_empty() {
        assert!(ItemStack::split_into_stacks(ItemType::Block(3), 0).is_empty());
    }

    #[test]
    fn merge_fills_existing_stacks_first() {
        let mut inv = vec![ItemStack::new(ItemType::Block(2), 60)];
        merge_stacks(
            &mut inv,
            vec![
                ItemStack::new(ItemType::Block(2), 10),
                ItemStack::reclaimed(4),
            ],
        );
        assert_eq!(inv[0].count, 64);
        assert_eq!(inv[1], ItemStack::new(ItemType::Block(2), 6));
        assert_eq!(inv[2], ItemStack::reclaimed(4));
        assert_eq!(total_count(&inv), 78);
    }
}
