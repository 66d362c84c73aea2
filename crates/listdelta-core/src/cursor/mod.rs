//! Read cursors over an edit batch
//!
//! [`ChangeCursor`] is the one cursor type callers see. Which store it reads
//! is fixed when it is created:
//! - [`LinearCursor`] walks a [`BlockSequence`](crate::backing::BlockSequence)
//! - [`TreeCursor`] folds [`IndexMap`](crate::backing::IndexMap) runs into blocks
//! - a reorder batch exposes its permutation and no blocks
//!
//! A cursor only holds position counters and a shared borrow of the store,
//! so `clone()` yields an independent cursor at the same position.
//!
//! Two stepping granularities are offered. [`ChangeCursor::advance`] moves
//! one element at a time and [`ChangeCursor::advance_block`] moves one block
//! at a time; the `Iterator` impl yields whole blocks.

pub mod linear;
pub mod tree;

pub use linear::LinearCursor;
pub use tree::TreeCursor;

use crate::backing::IndexMap;
use crate::errors::{DeltaError, Result};
use crate::model::{Block, ChangeKind};

/// A forward-only producer of compacted blocks
pub trait BlockSource {
    /// Produce the next block, or `None` once the batch is exhausted
    fn next_block(&mut self) -> Option<Block>;

    /// Whether `next_block` would produce another block
    fn has_next_block(&self) -> bool;
}

/// Random access to the whole block list
///
/// Only sources that already hold a materialized list can offer this; the
/// tree cursor synthesizes blocks as it walks and does not implement it.
pub trait RandomAccessBlocks {
    /// Every block of the batch, independent of cursor position
    fn blocks(&self) -> &[Block];

    /// Blocks not yet produced by the cursor
    fn blocks_remaining(&self) -> usize;
}

#[derive(Debug, Clone)]
enum Source<'a> {
    Linear(LinearCursor<'a>),
    Tree(TreeCursor<'a>),
    Reorder(&'a [usize]),
}

/// Cursor over the compacted changes of one batch
#[derive(Debug, Clone)]
pub struct ChangeCursor<'a> {
    source: Source<'a>,
    block: Option<Block>,
    offset: usize,
}

impl<'a> ChangeCursor<'a> {
    pub(crate) fn from_blocks(blocks: &'a [Block]) -> Self {
        Self::with_source(Source::Linear(LinearCursor::new(blocks)))
    }

    pub(crate) fn from_map(map: &'a IndexMap) -> Self {
        Self::with_source(Source::Tree(TreeCursor::new(map)))
    }

    pub(crate) fn from_permutation(reorder_map: &'a [usize]) -> Self {
        Self::with_source(Source::Reorder(reorder_map))
    }

    fn with_source(source: Source<'a>) -> Self {
        Self {
            source,
            block: None,
            offset: 0,
        }
    }

    /// Whether another element remains, in this block or a later one
    pub fn has_next(&self) -> bool {
        let in_block = self
            .block
            .is_some_and(|block| self.offset + 1 < block.len);
        in_block || self.has_next_block()
    }

    /// Whether another whole block remains after the current one
    pub fn has_next_block(&self) -> bool {
        match &self.source {
            Source::Linear(cursor) => cursor.has_next_block(),
            Source::Tree(cursor) => cursor.has_next_block(),
            Source::Reorder(_) => false,
        }
    }

    /// Step to the next changed element. Returns `false` once exhausted.
    pub fn advance(&mut self) -> bool {
        if let Some(block) = self.block {
            if self.offset + 1 < block.len {
                self.offset += 1;
                return true;
            }
        }
        self.advance_block()
    }

    /// Skip the rest of the current block and step onto the next one.
    /// Returns `false` once exhausted.
    pub fn advance_block(&mut self) -> bool {
        self.block = match &mut self.source {
            Source::Linear(cursor) => cursor.next_block(),
            Source::Tree(cursor) => cursor.next_block(),
            Source::Reorder(_) => None,
        };
        self.offset = 0;
        self.block.is_some()
    }

    /// The block the cursor is positioned on
    pub fn block(&self) -> Option<Block> {
        self.block
    }

    pub fn kind(&self) -> Option<ChangeKind> {
        self.block.map(|block| block.kind)
    }

    /// Replay index of the current element
    pub fn index(&self) -> Option<usize> {
        self.block.map(|block| block.element_index(self.offset))
    }

    pub fn block_start(&self) -> Option<usize> {
        self.block.map(|block| block.start)
    }

    /// Inclusive end of the current block
    pub fn block_end(&self) -> Option<usize> {
        self.block.map(|block| block.end())
    }

    pub fn is_reordering(&self) -> bool {
        matches!(self.source, Source::Reorder(_))
    }

    /// Permutation of a reorder batch, `map[new_index] = old_index`
    ///
    /// # Errors
    ///
    /// Returns `DeltaError::NotReordering` for an edit batch.
    pub fn reorder_map(&self) -> Result<&'a [usize]> {
        match self.source {
            Source::Reorder(map) => Ok(map),
            _ => Err(DeltaError::NotReordering),
        }
    }

    /// The linear source, when the batch is held as a block list
    pub fn as_linear(&self) -> Option<&LinearCursor<'a>> {
        match &self.source {
            Source::Linear(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// Every block of the batch
    ///
    /// # Errors
    ///
    /// Returns `DeltaError::Unsupported` unless the batch is held as a block list.
    pub fn blocks(&self) -> Result<&[Block]> {
        self.as_linear()
            .map(|cursor| cursor.blocks())
            .ok_or(DeltaError::Unsupported {
                operation: "blocks",
            })
    }

    /// Blocks not yet stepped onto
    ///
    /// # Errors
    ///
    /// Returns `DeltaError::Unsupported` unless the batch is held as a block list.
    pub fn blocks_remaining(&self) -> Result<usize> {
        self.as_linear()
            .map(|cursor| cursor.blocks_remaining())
            .ok_or(DeltaError::Unsupported {
                operation: "blocks_remaining",
            })
    }
}

impl Iterator for ChangeCursor<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if self.advance_block() {
            self.block
        } else {
            None
        }
    }
}
