//! Edit accumulator
//!
//! [`EditAccumulator`] records one batch of changes against a snapshot of
//! `N` elements and answers position queries between the snapshot and the
//! live sequence. A batch is either a set of discrete edits or a single
//! permutation, never both.
//!
//! Discrete edits start on a [`BlockSequence`] and move to an [`IndexMap`]
//! the first time the block list cannot express an edit or grows past
//! [`DeltaConfig::linear_block_limit`]. Which store is active never changes
//! a query result or the blocks a cursor yields.

use std::fmt;

use crate::backing::{BlockSequence, IndexMap};
use crate::commands::Edit;
use crate::config::DeltaConfig;
use crate::cursor::ChangeCursor;
use crate::errors::{DeltaError, Result};

/// Which representation currently holds the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackingKind {
    BlockSequence,
    IndexMap,
    Permutation,
}

impl BackingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackingKind::BlockSequence => "block_sequence",
            BackingKind::IndexMap => "index_map",
            BackingKind::Permutation => "permutation",
        }
    }
}

#[derive(Debug, Clone)]
enum Store {
    Linear(BlockSequence),
    Tree(IndexMap),
}

#[derive(Debug, Clone)]
struct Permutation {
    /// `forward[new] = old`
    forward: Vec<usize>,
    /// `inverse[old] = new`
    inverse: Vec<usize>,
}

#[derive(Debug, Clone)]
enum Batch {
    Edits(Store),
    Reorder(Permutation),
}

/// Change tracker for one batch of edits against a snapshot
#[derive(Debug, Clone)]
pub struct EditAccumulator {
    config: DeltaConfig,
    snapshot_len: usize,
    current_len: usize,
    batch: Batch,
}

impl Default for EditAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl EditAccumulator {
    /// Accumulator over an empty snapshot with default configuration
    pub fn new() -> Self {
        Self::with_config(DeltaConfig::default())
    }

    pub fn with_config(config: DeltaConfig) -> Self {
        Self {
            config,
            snapshot_len: 0,
            current_len: 0,
            batch: Batch::Edits(fresh_store(&config, 0)),
        }
    }

    pub fn config(&self) -> &DeltaConfig {
        &self.config
    }

    /// Start a new batch over a snapshot of `size` elements
    ///
    /// Clears pending edits or an installed permutation.
    pub fn reset(&mut self, size: usize) {
        self.snapshot_len = size;
        self.current_len = size;
        self.batch = Batch::Edits(fresh_store(&self.config, size));
        tracing::debug!(
            snapshot_len = size,
            backing = self.backing().as_str(),
            "Reset accumulator"
        );
    }

    /// Record an insertion at `current_index`
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `current_index > current_size()`;
    /// `ReorderActive` if a permutation is installed.
    pub fn add(&mut self, current_index: usize) -> Result<()> {
        self.apply(Edit::Insert(current_index))
    }

    /// Record a removal at `current_index`
    ///
    /// Removing an element inserted earlier in the batch retracts the insert.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `current_index >= current_size()`;
    /// `ReorderActive` if a permutation is installed.
    pub fn remove(&mut self, current_index: usize) -> Result<()> {
        self.apply(Edit::Remove(current_index))
    }

    /// Mark the element at `current_index` as updated
    ///
    /// Has no visible effect on an element inserted in this batch.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `current_index >= current_size()`;
    /// `ReorderActive` if a permutation is installed.
    pub fn update(&mut self, current_index: usize) -> Result<()> {
        self.apply(Edit::Update(current_index))
    }

    /// Record a single edit
    ///
    /// # Errors
    ///
    /// As for [`add`](Self::add), [`remove`](Self::remove) and [`update`](Self::update).
    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        let op = edit.op_name();
        let index = edit.index();
        let Batch::Edits(store) = &mut self.batch else {
            return Err(DeltaError::ReorderActive { op });
        };

        let bound = match edit {
            Edit::Insert(_) => self.current_len + 1,
            Edit::Remove(_) | Edit::Update(_) => self.current_len,
        };
        if index >= bound {
            return Err(DeltaError::out_of_bounds(op, index, self.current_len));
        }

        let migrated = match store {
            Store::Linear(seq) => {
                let applied = seq.apply(edit);
                if applied && seq.len() <= self.config.linear_block_limit {
                    None
                } else {
                    let mut map = replay_into_map(seq, self.snapshot_len);
                    let trigger = if applied {
                        "block_limit"
                    } else {
                        map.apply(edit);
                        "out_of_order"
                    };
                    tracing::debug!(
                        blocks = seq.len(),
                        runs = map.run_count(),
                        trigger,
                        "Migrated batch to index map"
                    );
                    Some(map)
                }
            }
            Store::Tree(map) => {
                map.apply(edit);
                None
            }
        };
        if let Some(map) = migrated {
            *store = Store::Tree(map);
        }

        match edit {
            Edit::Insert(_) => self.current_len += 1,
            Edit::Remove(_) => self.current_len -= 1,
            Edit::Update(_) => {}
        }
        Ok(())
    }

    /// Install a permutation, `reorder_map[new_index] = old_index`
    ///
    /// Installing a second permutation in the same batch composes it with
    /// the first, so the stored map always reaches back to the snapshot.
    ///
    /// # Errors
    ///
    /// `EditsPending` if the batch already holds discrete edits;
    /// `InvalidPermutation` if the map is not a permutation of `0..N`.
    pub fn install_reorder(&mut self, reorder_map: Vec<usize>) -> Result<()> {
        if let Batch::Edits(_) = &self.batch {
            let count = self.iterator().count();
            if count > 0 {
                return Err(DeltaError::EditsPending { count });
            }
        }

        let inverse = invert(&reorder_map, self.snapshot_len)?;
        let permutation = match &self.batch {
            Batch::Reorder(existing) => {
                let forward: Vec<usize> = reorder_map
                    .iter()
                    .map(|&middle| existing.forward[middle])
                    .collect();
                let inverse = invert(&forward, self.snapshot_len)?;
                Permutation { forward, inverse }
            }
            Batch::Edits(_) => Permutation {
                forward: reorder_map,
                inverse,
            },
        };

        tracing::debug!(snapshot_len = self.snapshot_len, "Installed reorder");
        self.batch = Batch::Reorder(permutation);
        Ok(())
    }

    pub fn is_reordering(&self) -> bool {
        matches!(self.batch, Batch::Reorder(_))
    }

    /// The installed permutation, `map[new_index] = old_index`
    ///
    /// # Errors
    ///
    /// `NotReordering` if the batch holds no permutation.
    pub fn reorder_map(&self) -> Result<&[usize]> {
        match &self.batch {
            Batch::Reorder(permutation) => Ok(&permutation.forward),
            Batch::Edits(_) => Err(DeltaError::NotReordering),
        }
    }

    /// Current index of snapshot element `snapshot_index`, `None` if removed
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `snapshot_index >= snapshot_size()`.
    pub fn snapshot_to_current(&self, snapshot_index: usize) -> Result<Option<usize>> {
        if snapshot_index >= self.snapshot_len {
            return Err(DeltaError::out_of_bounds(
                "snapshot_to_current",
                snapshot_index,
                self.snapshot_len,
            ));
        }
        Ok(match &self.batch {
            Batch::Edits(Store::Linear(seq)) => seq.snapshot_to_current(snapshot_index),
            Batch::Edits(Store::Tree(map)) => map.snapshot_to_current(snapshot_index),
            Batch::Reorder(permutation) => Some(permutation.inverse[snapshot_index]),
        })
    }

    /// Snapshot index of the element at `current_index`, `None` if it was
    /// inserted in this batch
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `current_index >= current_size()`.
    pub fn current_to_snapshot(&self, current_index: usize) -> Result<Option<usize>> {
        self.check_current("current_to_snapshot", current_index)?;
        Ok(match &self.batch {
            Batch::Edits(Store::Linear(seq)) => seq.current_to_snapshot(current_index),
            Batch::Edits(Store::Tree(map)) => map.current_to_snapshot(current_index),
            Batch::Reorder(permutation) => Some(permutation.forward[current_index]),
        })
    }

    /// Whether the element at `current_index` is a snapshot element marked updated
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `current_index >= current_size()`.
    pub fn current_updated(&self, current_index: usize) -> Result<bool> {
        self.check_current("current_updated", current_index)?;
        Ok(match &self.batch {
            Batch::Edits(Store::Linear(seq)) => seq.current_updated(current_index),
            Batch::Edits(Store::Tree(map)) => map.current_updated(current_index),
            Batch::Reorder(_) => false,
        })
    }

    fn check_current(&self, op: &'static str, current_index: usize) -> Result<()> {
        if current_index >= self.current_len {
            return Err(DeltaError::out_of_bounds(op, current_index, self.current_len));
        }
        Ok(())
    }

    /// A fresh cursor over the batch as it stands
    pub fn iterator(&self) -> ChangeCursor<'_> {
        match &self.batch {
            Batch::Edits(Store::Linear(seq)) => ChangeCursor::from_blocks(seq.blocks()),
            Batch::Edits(Store::Tree(map)) => ChangeCursor::from_map(map),
            Batch::Reorder(permutation) => ChangeCursor::from_permutation(&permutation.forward),
        }
    }

    pub fn snapshot_size(&self) -> usize {
        self.snapshot_len
    }

    pub fn current_size(&self) -> usize {
        self.current_len
    }

    /// Whether the batch leaves the sequence exactly as the snapshot had it
    pub fn is_empty(&self) -> bool {
        match &self.batch {
            Batch::Edits(Store::Linear(seq)) => seq.is_empty(),
            Batch::Edits(Store::Tree(map)) => map.is_unchanged(),
            Batch::Reorder(permutation) => permutation
                .forward
                .iter()
                .enumerate()
                .all(|(new, &old)| new == old),
        }
    }

    pub fn backing(&self) -> BackingKind {
        match &self.batch {
            Batch::Edits(Store::Linear(_)) => BackingKind::BlockSequence,
            Batch::Edits(Store::Tree(_)) => BackingKind::IndexMap,
            Batch::Reorder(_) => BackingKind::Permutation,
        }
    }
}

impl fmt::Display for EditAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Batch::Reorder(permutation) = &self.batch {
            return write!(f, "REORDER{:?}", permutation.forward);
        }
        write!(f, "[")?;
        for (n, block) in self.iterator().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", block)?;
        }
        write!(f, "]")
    }
}

fn fresh_store(config: &DeltaConfig, snapshot_len: usize) -> Store {
    if config.prefer_linear {
        Store::Linear(BlockSequence::new())
    } else {
        Store::Tree(IndexMap::with_snapshot(snapshot_len))
    }
}

/// Rebuild a block list as an index map by replaying each block element
fn replay_into_map(seq: &BlockSequence, snapshot_len: usize) -> IndexMap {
    let mut map = IndexMap::with_snapshot(snapshot_len);
    for block in seq.blocks() {
        for offset in 0..block.len {
            map.apply(Edit::for_block_element(block.kind, block.start, offset));
        }
    }
    map
}

/// Inverse of `forward`, checking that it is a permutation of `0..len`
fn invert(forward: &[usize], len: usize) -> Result<Vec<usize>> {
    if forward.len() != len {
        return Err(DeltaError::InvalidPermutation {
            reason: format!("expected {} entries, got {}", len, forward.len()),
        });
    }
    let mut inverse = vec![usize::MAX; len];
    for (new, &old) in forward.iter().enumerate() {
        if old >= len {
            return Err(DeltaError::InvalidPermutation {
                reason: format!("entry {} is {}, past the end of {}", new, old, len),
            });
        }
        if inverse[old] != usize::MAX {
            return Err(DeltaError::InvalidPermutation {
                reason: format!("old index {} appears twice", old),
            });
        }
        inverse[old] = new;
    }
    Ok(inverse)
}
