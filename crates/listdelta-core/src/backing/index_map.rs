//! General snapshot/current index mapping
//!
//! An implicit treap over runs of elements. Each node is a run of `len`
//! consecutive elements sharing one [`Tag`]; every subtree carries the
//! number of elements it holds per tag. Positions are never stored, they
//! are derived from those counts, so a point edit costs one split, one
//! retag and two merges: O(log n) expected regardless of how scattered the
//! batch is.
//!
//! Three index spaces are read from the same tree:
//! - **total**: every element ever seen in the batch, deleted ones included
//! - **current**: retained, updated and inserted elements
//! - **snapshot**: retained, updated and deleted elements
//!
//! # Arena-based allocation
//!
//! Nodes live in a `Vec` arena and are referenced by [`NodeId`]. Retracted
//! inserts return their slot to a free list.

use crate::commands::Edit;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Classification of a run of elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Retained,
    Updated,
    Inserted,
    Deleted,
}

/// Index space used when counting positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Total,
    Current,
    Snapshot,
}

impl Tag {
    fn counted_in(self, space: Space) -> bool {
        match space {
            Space::Total => true,
            Space::Current => self != Tag::Deleted,
            Space::Snapshot => self != Tag::Inserted,
        }
    }
}

/// Per-tag element counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub retained: usize,
    pub updated: usize,
    pub inserted: usize,
    pub deleted: usize,
}

impl Counts {
    fn of(tag: Tag, len: usize) -> Self {
        let mut counts = Counts::default();
        match tag {
            Tag::Retained => counts.retained = len,
            Tag::Updated => counts.updated = len,
            Tag::Inserted => counts.inserted = len,
            Tag::Deleted => counts.deleted = len,
        }
        counts
    }

    fn plus(self, other: Counts) -> Self {
        Counts {
            retained: self.retained + other.retained,
            updated: self.updated + other.updated,
            inserted: self.inserted + other.inserted,
            deleted: self.deleted + other.deleted,
        }
    }

    pub fn total(&self) -> usize {
        self.retained + self.updated + self.inserted + self.deleted
    }

    pub fn current(&self) -> usize {
        self.retained + self.updated + self.inserted
    }

    pub fn snapshot(&self) -> usize {
        self.retained + self.updated + self.deleted
    }

    fn in_space(&self, space: Space) -> usize {
        match space {
            Space::Total => self.total(),
            Space::Current => self.current(),
            Space::Snapshot => self.snapshot(),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: Tag,
    len: usize,
    priority: u64,
    left: Option<NodeId>,
    right: Option<NodeId>,
    sum: Counts,
}

/// Result of a positional lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    /// Tag of the run containing the element
    pub tag: Tag,
    /// Length of that run
    pub len: usize,
    /// Offset of the element inside the run
    pub offset: usize,
    /// Counts of every element ahead of the run
    pub before: Counts,
}

impl Located {
    /// Position of the element in the total space
    pub fn total_position(&self) -> usize {
        self.before.total() + self.offset
    }

    /// Elements left in the run from this one onwards
    pub fn remaining(&self) -> usize {
        self.len - self.offset
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexMap {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    seed: u64,
}

impl IndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map over a fresh snapshot of `len` retained elements
    pub fn with_snapshot(len: usize) -> Self {
        let mut map = Self::new();
        map.reset(len);
        map
    }

    pub fn reset(&mut self, len: usize) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.seed = 0;
        if len > 0 {
            self.root = Some(self.alloc(Tag::Retained, len));
        }
    }

    /// Element counts for the whole batch
    pub fn counts(&self) -> Counts {
        self.sum(self.root)
    }

    /// True when no element has been inserted, deleted or updated
    pub fn is_unchanged(&self) -> bool {
        self.counts().retained == self.counts().total()
    }

    /// Number of runs in the tree
    pub fn run_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn apply(&mut self, edit: Edit) {
        match edit {
            Edit::Insert(index) => self.insert(index),
            Edit::Remove(index) => self.remove(index),
            Edit::Update(index) => self.update(index),
        }
    }

    /// Current index of snapshot element `snapshot_index`, or `None` if it
    /// was removed.
    pub fn snapshot_to_current(&self, snapshot_index: usize) -> Option<usize> {
        let located = self.locate(Space::Snapshot, snapshot_index)?;
        match located.tag {
            Tag::Deleted => None,
            _ => Some(located.before.current() + located.offset),
        }
    }

    /// Snapshot index of the element at `current_index`, or `None` if it was
    /// inserted in this batch.
    pub fn current_to_snapshot(&self, current_index: usize) -> Option<usize> {
        let located = self.locate(Space::Current, current_index)?;
        match located.tag {
            Tag::Inserted => None,
            _ => Some(located.before.snapshot() + located.offset),
        }
    }

    pub fn current_updated(&self, current_index: usize) -> bool {
        self.locate(Space::Current, current_index)
            .is_some_and(|located| located.tag == Tag::Updated)
    }

    /// Find the `k`-th element counted in `space`.
    pub fn locate(&self, space: Space, mut k: usize) -> Option<Located> {
        let mut node = self.root;
        let mut before = Counts::default();
        while let Some(id) = node {
            let n = &self.nodes[id.index()];
            let left = self.sum(n.left);
            if k < left.in_space(space) {
                node = n.left;
                continue;
            }
            k -= left.in_space(space);
            before = before.plus(left);

            let own = if n.tag.counted_in(space) { n.len } else { 0 };
            if k < own {
                return Some(Located {
                    tag: n.tag,
                    len: n.len,
                    offset: k,
                    before,
                });
            }
            k -= own;
            before = before.plus(Counts::of(n.tag, n.len));
            node = n.right;
        }
        None
    }

    fn insert(&mut self, current_index: usize) {
        let position = match self.locate(Space::Current, current_index) {
            Some(located) => located.total_position(),
            None => self.counts().total(),
        };
        let (left, right) = self.split(self.root, position);
        self.root = self.place(left, Tag::Inserted, right);
    }

    fn remove(&mut self, current_index: usize) {
        let Some((left, id, right)) = self.detach(current_index) else {
            return;
        };
        if self.nodes[id.index()].tag == Tag::Inserted {
            self.release(id);
            self.root = self.merge(left, right);
            return;
        }
        self.release(id);
        self.root = self.place(left, Tag::Deleted, right);
    }

    fn update(&mut self, current_index: usize) {
        let retained = self
            .locate(Space::Current, current_index)
            .is_some_and(|located| located.tag == Tag::Retained);
        if !retained {
            return;
        }
        let Some((left, id, right)) = self.detach(current_index) else {
            return;
        };
        self.release(id);
        self.root = self.place(left, Tag::Updated, right);
    }

    /// Cut the element at `current_index` out of the tree as a single node.
    fn detach(&mut self, current_index: usize) -> Option<(Option<NodeId>, NodeId, Option<NodeId>)> {
        let position = self.locate(Space::Current, current_index)?.total_position();
        let (left, rest) = self.split(self.root, position);
        let (middle, right) = self.split(rest, 1);
        match middle {
            Some(id) => Some((left, id, right)),
            None => {
                self.root = self.merge(left, right);
                None
            }
        }
    }

    /// Join `left ++ [one element tagged tag] ++ right`, growing a touching
    /// run of the same tag where possible.
    fn place(&mut self, left: Option<NodeId>, tag: Tag, right: Option<NodeId>) -> Option<NodeId> {
        if self.extend_last(left, tag) || self.extend_first(right, tag) {
            return self.merge(left, right);
        }
        let id = self.alloc(tag, 1);
        let joined = self.merge(left, Some(id));
        self.merge(joined, right)
    }

    fn extend_last(&mut self, node: Option<NodeId>, tag: Tag) -> bool {
        let Some(id) = node else {
            return false;
        };
        let (child, own_tag) = (self.nodes[id.index()].right, self.nodes[id.index()].tag);
        let extended = match child {
            Some(child) => self.extend_last(Some(child), tag),
            None if own_tag == tag => {
                self.nodes[id.index()].len += 1;
                true
            }
            None => false,
        };
        if extended {
            self.pull(id);
        }
        extended
    }

    fn extend_first(&mut self, node: Option<NodeId>, tag: Tag) -> bool {
        let Some(id) = node else {
            return false;
        };
        let (child, own_tag) = (self.nodes[id.index()].left, self.nodes[id.index()].tag);
        let extended = match child {
            Some(child) => self.extend_first(Some(child), tag),
            None if own_tag == tag => {
                self.nodes[id.index()].len += 1;
                true
            }
            None => false,
        };
        if extended {
            self.pull(id);
        }
        extended
    }

    /// Split into the first `position` total elements and the rest, cutting
    /// a run in two if the boundary falls inside it.
    fn split(&mut self, node: Option<NodeId>, position: usize) -> (Option<NodeId>, Option<NodeId>) {
        let Some(id) = node else {
            return (None, None);
        };
        let left_total = self.sum(self.nodes[id.index()].left).total();
        let len = self.nodes[id.index()].len;

        if position <= left_total {
            let (l, r) = self.split(self.nodes[id.index()].left, position);
            self.nodes[id.index()].left = r;
            self.pull(id);
            (l, Some(id))
        } else if position >= left_total + len {
            let (l, r) = self.split(self.nodes[id.index()].right, position - left_total - len);
            self.nodes[id.index()].right = l;
            self.pull(id);
            (Some(id), r)
        } else {
            let cut = position - left_total;
            let tail = self.alloc(self.nodes[id.index()].tag, len - cut);
            self.nodes[id.index()].len = cut;
            let right = self.nodes[id.index()].right.take();
            self.pull(id);
            let r = self.merge(Some(tail), right);
            (Some(id), r)
        }
    }

    fn merge(&mut self, left: Option<NodeId>, right: Option<NodeId>) -> Option<NodeId> {
        match (left, right) {
            (None, r) => r,
            (l, None) => l,
            (Some(l), Some(r)) => {
                if self.nodes[l.index()].priority > self.nodes[r.index()].priority {
                    let merged = self.merge(self.nodes[l.index()].right, Some(r));
                    self.nodes[l.index()].right = merged;
                    self.pull(l);
                    Some(l)
                } else {
                    let merged = self.merge(Some(l), self.nodes[r.index()].left);
                    self.nodes[r.index()].left = merged;
                    self.pull(r);
                    Some(r)
                }
            }
        }
    }

    fn sum(&self, node: Option<NodeId>) -> Counts {
        node.map(|id| self.nodes[id.index()].sum)
            .unwrap_or_default()
    }

    fn pull(&mut self, id: NodeId) {
        let n = &self.nodes[id.index()];
        let sum = self
            .sum(n.left)
            .plus(Counts::of(n.tag, n.len))
            .plus(self.sum(n.right));
        self.nodes[id.index()].sum = sum;
    }

    fn alloc(&mut self, tag: Tag, len: usize) -> NodeId {
        let node = Node {
            tag,
            len,
            priority: self.next_priority(),
            left: None,
            right: None,
            sum: Counts::of(tag, len),
        };
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId((self.nodes.len() - 1) as u32)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.free.push(id);
    }

    /// splitmix64 sequence; deterministic so batches replay identically
    fn next_priority(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.seed;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
