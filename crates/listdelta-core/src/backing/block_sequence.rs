//! Linear block list
//!
//! Holds the batch as an ascending list of [`Block`]s, coalescing each edit
//! into the trailing block where it touches it. Only edits at or after the
//! tail of the list are accepted; anything earlier is refused so the caller
//! can move the batch to the [`IndexMap`](super::IndexMap).
//!
//! The list is kept canonical: adjacent same-kind blocks are merged and a
//! delete that lands at the same replay position as a run of inserts is
//! placed ahead of it.

use crate::commands::Edit;
use crate::model::{Block, ChangeKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSequence {
    blocks: Vec<Block>,
}

impl BlockSequence {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Blocks in ascending replay order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Record an edit. Returns `false`, leaving the list untouched, when the
    /// edit lands before the tail and cannot be expressed linearly.
    pub fn apply(&mut self, edit: Edit) -> bool {
        match edit {
            Edit::Insert(index) => self.insert(index),
            Edit::Remove(index) => self.delete(index),
            Edit::Update(index) => self.update(index),
        }
    }

    fn insert(&mut self, index: usize) -> bool {
        let Some(last) = self.blocks.last_mut() else {
            self.blocks.push(Block::new(ChangeKind::Insert, index, 1));
            return true;
        };

        if last.kind == ChangeKind::Insert && index >= last.start && index <= last.start + last.len
        {
            last.len += 1;
            return true;
        }

        if index >= last.current_end() {
            self.blocks.push(Block::new(ChangeKind::Insert, index, 1));
            return true;
        }

        false
    }

    fn delete(&mut self, index: usize) -> bool {
        let Some(last) = self.blocks.last().copied() else {
            self.blocks.push(Block::new(ChangeKind::Delete, index, 1));
            return true;
        };

        // removing an element inserted in this batch retracts the insert
        if last.kind == ChangeKind::Insert && index >= last.start && index < last.start + last.len
        {
            self.shrink_last();
            return true;
        }

        if last.kind == ChangeKind::Update && index == last.start + last.len - 1 {
            self.shrink_last();
            self.push_delete(index);
            return true;
        }

        if index >= last.current_end() {
            self.push_delete(index);
            return true;
        }

        false
    }

    fn update(&mut self, index: usize) -> bool {
        let Some(last) = self.blocks.last_mut() else {
            self.blocks.push(Block::new(ChangeKind::Update, index, 1));
            return true;
        };

        let within = index >= last.start && index < last.start + last.len;
        match last.kind {
            // an inserted element already carries its new value
            ChangeKind::Insert if within => return true,
            ChangeKind::Update if within => return true,
            ChangeKind::Update if index == last.start + last.len => {
                last.len += 1;
                return true;
            }
            _ => {}
        }

        if index >= last.current_end() {
            self.blocks.push(Block::new(ChangeKind::Update, index, 1));
            return true;
        }

        false
    }

    fn shrink_last(&mut self) {
        if let Some(last) = self.blocks.last_mut() {
            last.len -= 1;
            if last.len == 0 {
                self.blocks.pop();
            }
        }
    }

    fn push_delete(&mut self, index: usize) {
        let count = self.blocks.len();
        match self.blocks.last().copied() {
            Some(last) if last.kind == ChangeKind::Delete && last.start == index => {
                self.blocks[count - 1].len += 1;
            }
            Some(last) if last.kind == ChangeKind::Insert && last.start + last.len == index => {
                // deletes precede inserts at the same replay position
                let prev = count.checked_sub(2).map(|at| self.blocks[at]);
                match prev {
                    Some(prev) if prev.kind == ChangeKind::Delete && prev.start == last.start => {
                        self.blocks[count - 2].len += 1;
                    }
                    _ => self
                        .blocks
                        .insert(count - 1, Block::new(ChangeKind::Delete, last.start, 1)),
                }
            }
            _ => self.blocks.push(Block::new(ChangeKind::Delete, index, 1)),
        }
    }

    /// Current index of snapshot element `snapshot_index`, or `None` if it
    /// was removed.
    pub fn snapshot_to_current(&self, snapshot_index: usize) -> Option<usize> {
        let mut inserted = 0;
        let mut deleted = 0;
        for block in &self.blocks {
            let snapshot_start = block.start + deleted - inserted;
            if snapshot_index < snapshot_start {
                break;
            }
            match block.kind {
                ChangeKind::Delete => {
                    if snapshot_index < snapshot_start + block.len {
                        return None;
                    }
                    deleted += block.len;
                }
                ChangeKind::Insert => inserted += block.len,
                ChangeKind::Update => {}
            }
        }
        Some(snapshot_index + inserted - deleted)
    }

    /// Snapshot index of the element at `current_index`, or `None` if it was
    /// inserted in this batch.
    pub fn current_to_snapshot(&self, current_index: usize) -> Option<usize> {
        let mut inserted = 0;
        let mut deleted = 0;
        for block in &self.blocks {
            if current_index < block.start {
                break;
            }
            match block.kind {
                ChangeKind::Delete => deleted += block.len,
                ChangeKind::Insert => {
                    if current_index < block.start + block.len {
                        return None;
                    }
                    inserted += block.len;
                }
                ChangeKind::Update => {}
            }
        }
        Some(current_index + deleted - inserted)
    }

    pub fn current_updated(&self, current_index: usize) -> bool {
        self.blocks
            .iter()
            .take_while(|block| block.start <= current_index)
            .any(|block| {
                block.kind == ChangeKind::Update && current_index < block.start + block.len
            })
    }
}
