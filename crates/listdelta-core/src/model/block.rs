use serde::{Deserialize, Serialize};

/// Kind of change a [`Block`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Elements that exist in the current sequence but not in the snapshot
    Insert,
    /// Snapshot elements that no longer exist
    Delete,
    /// Snapshot elements whose value was replaced in place
    Update,
}

impl ChangeKind {
    /// Upper-case label used in debug rendering
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Delete => "DELETE",
            ChangeKind::Update => "UPDATE",
        }
    }
}

/// A contiguous run of same-kind changes
///
/// `start` is a replay index: the position at which the block applies once
/// every earlier block of the same batch has been applied in ascending order.
/// For inserts and updates this is the element's current index. A delete
/// block removes `len` elements that all sit at `start` in turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub kind: ChangeKind,
    pub start: usize,
    pub len: usize,
}

impl Block {
    /// Create a new block
    pub fn new(kind: ChangeKind, start: usize, len: usize) -> Self {
        Self { kind, start, len }
    }

    /// Inclusive end index of the block's extent
    pub fn end(&self) -> usize {
        self.start + self.len.saturating_sub(1)
    }

    /// Index of the `offset`-th element of the block when replayed
    ///
    /// Deleting an element shifts its successor down into the same slot, so
    /// every element of a delete block is reported at `start`.
    pub fn element_index(&self, offset: usize) -> usize {
        match self.kind {
            ChangeKind::Delete => self.start,
            ChangeKind::Insert | ChangeKind::Update => self.start + offset,
        }
    }

    /// First current index past this block once it has been applied
    pub fn current_end(&self) -> usize {
        match self.kind {
            ChangeKind::Delete => self.start,
            ChangeKind::Insert | ChangeKind::Update => self.start + self.len,
        }
    }

    /// Net change in sequence length caused by this block
    pub fn size_delta(&self) -> isize {
        match self.kind {
            ChangeKind::Insert => self.len as isize,
            ChangeKind::Delete => -(self.len as isize),
            ChangeKind::Update => 0,
        }
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}..{}]", self.kind.label(), self.start, self.end())
    }
}
