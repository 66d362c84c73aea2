use super::BlockSource;
use crate::backing::index_map::{IndexMap, Space, Tag};
use crate::model::{Block, ChangeKind};

/// Cursor over an [`IndexMap`]
///
/// Walks the runs in order and folds them into blocks on the fly. A stretch
/// of deleted and inserted runs with no surviving element between them is
/// one change at one replay position: it yields the delete block first and
/// parks the insert block in `pending`.
///
/// Position is kept as plain counters, so cloning the cursor is cheap and
/// the clone advances independently over the same shared map.
#[derive(Debug, Clone)]
pub struct TreeCursor<'a> {
    map: &'a IndexMap,
    total: usize,
    current: usize,
    pending: Option<Block>,
}

impl<'a> TreeCursor<'a> {
    pub fn new(map: &'a IndexMap) -> Self {
        Self {
            map,
            total: 0,
            current: 0,
            pending: None,
        }
    }

    /// Consume consecutive runs accepted by `accept`, returning how many
    /// elements of each tag were passed.
    fn take_runs(&mut self, accept: impl Fn(Tag) -> bool) -> (usize, usize, usize) {
        let (mut updated, mut inserted, mut deleted) = (0, 0, 0);
        while let Some(located) = self.map.locate(Space::Total, self.total) {
            if !accept(located.tag) {
                break;
            }
            let run = located.remaining();
            match located.tag {
                Tag::Updated => updated += run,
                Tag::Inserted => inserted += run,
                Tag::Deleted => deleted += run,
                Tag::Retained => {}
            }
            self.total += run;
        }
        (updated, inserted, deleted)
    }
}

impl BlockSource for TreeCursor<'_> {
    fn next_block(&mut self) -> Option<Block> {
        if let Some(block) = self.pending.take() {
            return Some(block);
        }

        loop {
            let located = self.map.locate(Space::Total, self.total)?;
            match located.tag {
                Tag::Retained => {
                    self.total += located.remaining();
                    self.current += located.remaining();
                }
                Tag::Updated => {
                    let start = self.current;
                    let (updated, _, _) = self.take_runs(|tag| tag == Tag::Updated);
                    self.current += updated;
                    return Some(Block::new(ChangeKind::Update, start, updated));
                }
                Tag::Inserted | Tag::Deleted => {
                    let start = self.current;
                    let (_, inserted, deleted) =
                        self.take_runs(|tag| matches!(tag, Tag::Inserted | Tag::Deleted));
                    self.current += inserted;

                    let insert = (inserted > 0)
                        .then(|| Block::new(ChangeKind::Insert, start, inserted));
                    if deleted > 0 {
                        self.pending = insert;
                        return Some(Block::new(ChangeKind::Delete, start, deleted));
                    }
                    return insert;
                }
            }
        }
    }

    fn has_next_block(&self) -> bool {
        self.clone().next_block().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Edit;

    fn drain(map: &IndexMap) -> Vec<Block> {
        let mut cursor = TreeCursor::new(map);
        std::iter::from_fn(|| cursor.next_block()).collect()
    }

    #[test]
    fn test_unchanged_map_yields_nothing() {
        let map = IndexMap::with_snapshot(10);
        assert!(drain(&map).is_empty());
        assert!(!TreeCursor::new(&map).has_next_block());
    }

    #[test]
    fn test_insert_before_delete_is_reported_delete_first() {
        let mut map = IndexMap::with_snapshot(4);
        map.apply(Edit::Insert(1));
        map.apply(Edit::Remove(2));
        assert_eq!(
            drain(&map),
            vec![
                Block::new(ChangeKind::Delete, 1, 1),
                Block::new(ChangeKind::Insert, 1, 1),
            ]
        );
    }

    #[test]
    fn test_clone_advances_independently() {
        let mut map = IndexMap::with_snapshot(5);
        map.apply(Edit::Update(0));
        map.apply(Edit::Update(4));
        let mut first = TreeCursor::new(&map);
        assert_eq!(first.next_block(), Some(Block::new(ChangeKind::Update, 0, 1)));
        let mut second = first.clone();
        assert_eq!(first.next_block(), Some(Block::new(ChangeKind::Update, 4, 1)));
        assert_eq!(second.next_block(), Some(Block::new(ChangeKind::Update, 4, 1)));
        assert_eq!(first.next_block(), None);
    }
}
