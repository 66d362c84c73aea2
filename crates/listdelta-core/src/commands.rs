//! Edit commands
//!
//! An [`Edit`] is a single mutation of the live sequence, expressed in the
//! current index space at the moment it is applied. Batches of edits are
//! applied through [`crate::apply::apply_edits`].

use serde::{Deserialize, Serialize};

use crate::model::ChangeKind;

/// A single mutation against the current index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edit {
    /// Insert a new element so that it ends up at this index
    Insert(usize),
    /// Remove the element at this index
    Remove(usize),
    /// Replace the value of the element at this index
    Update(usize),
}

impl Edit {
    /// Current-space index the edit targets
    pub fn index(&self) -> usize {
        match *self {
            Edit::Insert(index) | Edit::Remove(index) | Edit::Update(index) => index,
        }
    }

    /// Operation name used in errors and logs
    pub fn op_name(&self) -> &'static str {
        match self {
            Edit::Insert(_) => "add",
            Edit::Remove(_) => "remove",
            Edit::Update(_) => "update",
        }
    }

    /// The edit that reproduces the `offset`-th element of a block on replay
    pub fn for_block_element(kind: ChangeKind, start: usize, offset: usize) -> Self {
        match kind {
            ChangeKind::Insert => Edit::Insert(start + offset),
            ChangeKind::Delete => Edit::Remove(start),
            ChangeKind::Update => Edit::Update(start + offset),
        }
    }
}
