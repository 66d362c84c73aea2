use super::{BlockSource, RandomAccessBlocks};
use crate::model::Block;

/// Cursor over a [`BlockSequence`](crate::backing::BlockSequence)
///
/// The block list is already compact, so this is a plain walk.
#[derive(Debug, Clone)]
pub struct LinearCursor<'a> {
    blocks: &'a [Block],
    next: usize,
}

impl<'a> LinearCursor<'a> {
    pub fn new(blocks: &'a [Block]) -> Self {
        Self { blocks, next: 0 }
    }
}

impl BlockSource for LinearCursor<'_> {
    fn next_block(&mut self) -> Option<Block> {
        let block = self.blocks.get(self.next).copied()?;
        self.next += 1;
        Some(block)
    }

    fn has_next_block(&self) -> bool {
        self.next < self.blocks.len()
    }
}

impl RandomAccessBlocks for LinearCursor<'_> {
    fn blocks(&self) -> &[Block] {
        self.blocks
    }

    fn blocks_remaining(&self) -> usize {
        self.blocks.len() - self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChangeKind;

    #[test]
    fn test_walks_blocks_in_order() {
        let blocks = [
            Block::new(ChangeKind::Delete, 1, 1),
            Block::new(ChangeKind::Insert, 3, 2),
        ];
        let mut cursor = LinearCursor::new(&blocks);
        assert_eq!(cursor.blocks_remaining(), 2);
        assert_eq!(cursor.next_block(), Some(blocks[0]));
        assert_eq!(cursor.blocks_remaining(), 1);
        assert!(cursor.has_next_block());
        assert_eq!(cursor.next_block(), Some(blocks[1]));
        assert_eq!(cursor.next_block(), None);
        assert_eq!(cursor.blocks().len(), 2);
    }
}
