use listdelta_core::{Block, ChangeKind, DeltaConfig, Edit, EditAccumulator};
use proptest::prelude::*;

/// Accumulator paired with a plain model of the sequence it describes
///
/// Every edit is applied to both, so tests can compare the accumulator's
/// answers with what actually happened to the values.
#[allow(dead_code)]
pub struct Tracked {
    pub acc: EditAccumulator,
    pub snapshot: Vec<u32>,
    pub current: Vec<u32>,
    /// Snapshot origin of each current element, `None` if inserted
    pub origins: Vec<Option<usize>>,
    pub updated: Vec<bool>,
    next_value: u32,
}

#[allow(dead_code)]
impl Tracked {
    pub fn new(size: usize, config: DeltaConfig) -> Self {
        let mut acc = EditAccumulator::with_config(config);
        acc.reset(size);
        let snapshot: Vec<u32> = (0..size as u32).collect();
        Self {
            acc,
            current: snapshot.clone(),
            snapshot,
            origins: (0..size).map(Some).collect(),
            updated: vec![false; size],
            next_value: 1_000,
        }
    }

    fn fresh(&mut self) -> u32 {
        self.next_value += 1;
        self.next_value
    }

    pub fn apply(&mut self, edit: Edit) {
        self.acc.apply(edit).unwrap();
        match edit {
            Edit::Insert(i) => {
                let value = self.fresh();
                self.current.insert(i, value);
                self.origins.insert(i, None);
                self.updated.insert(i, false);
            }
            Edit::Remove(i) => {
                self.current.remove(i);
                self.origins.remove(i);
                self.updated.remove(i);
            }
            Edit::Update(i) => {
                let value = self.fresh();
                self.current[i] = value;
                self.updated[i] = self.origins[i].is_some();
            }
        }
    }

    /// Apply a generated step, folding its raw index into the valid range.
    /// Removes and updates on an empty sequence become inserts.
    pub fn step(&mut self, step: Step) {
        let len = self.current.len();
        let edit = match step.kind {
            StepKind::Update if len > 0 => Edit::Update(step.raw % len),
            StepKind::Remove if len > 0 => Edit::Remove(step.raw % len),
            _ => Edit::Insert(step.raw % (len + 1)),
        };
        self.apply(edit);
    }

    /// Apply steps that never move backwards: each lands `gap` elements past
    /// the previous one. Steps that would fall off the end become appends.
    pub fn walk_forward(&mut self, steps: &[(StepKind, usize)]) {
        let mut pos = 0;
        for &(kind, gap) in steps {
            pos += gap;
            let len = self.current.len();
            let edit = match kind {
                StepKind::Remove if pos < len => Edit::Remove(pos),
                StepKind::Update if pos < len => Edit::Update(pos),
                _ => Edit::Insert(pos.min(len)),
            };
            pos = match edit {
                Edit::Insert(i) | Edit::Update(i) => i + 1,
                Edit::Remove(i) => i,
            };
            self.apply(edit);
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum StepKind {
    Insert,
    Remove,
    Update,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub kind: StepKind,
    pub raw: usize,
}

#[allow(dead_code)]
pub fn arb_step() -> impl Strategy<Value = Step> {
    let kind = prop_oneof![
        Just(StepKind::Insert),
        Just(StepKind::Remove),
        Just(StepKind::Update),
    ];
    (kind, any::<usize>()).prop_map(|(kind, raw)| Step { kind, raw })
}

/// Edits that walk forward through the sequence, staying on the block list
#[allow(dead_code)]
pub fn arb_forward_steps() -> impl Strategy<Value = Vec<(StepKind, usize)>> {
    let kind = prop_oneof![
        Just(StepKind::Insert),
        Just(StepKind::Remove),
        Just(StepKind::Update),
    ];
    prop::collection::vec((kind, 0usize..3), 0..30)
}

/// Drain a fresh cursor into its blocks
#[allow(dead_code)]
pub fn blocks(acc: &EditAccumulator) -> Vec<Block> {
    acc.iterator().collect()
}

/// Shorthand for building expected blocks
#[allow(dead_code)]
pub fn block(kind: ChangeKind, start: usize, len: usize) -> Block {
    Block::new(kind, start, len)
}

/// Every (kind, element index) pair in element-wise order
#[allow(dead_code)]
pub fn elements(acc: &EditAccumulator) -> Vec<(ChangeKind, usize)> {
    let mut cursor = acc.iterator();
    let mut out = Vec::new();
    while cursor.advance() {
        out.push((cursor.kind().unwrap(), cursor.index().unwrap()));
    }
    out
}

/// Accumulator reset to `size` with `edits` applied in order
#[allow(dead_code)]
pub fn accumulate(size: usize, edits: &[Edit]) -> EditAccumulator {
    let mut acc = EditAccumulator::new();
    acc.reset(size);
    for edit in edits {
        acc.apply(*edit).unwrap();
    }
    acc
}
