//! Delivery of a batch to observers
//!
//! An observer implements [`ChangeSink`] and is handed a cursor through
//! [`dispatch`]. A reorder batch arrives as one `reordered` call carrying the
//! whole permutation; an edit batch arrives as one call per block in
//! ascending order. Sinks are plain values owned by the caller.

use crate::cursor::ChangeCursor;
use crate::errors::{DeltaError, Result};
use crate::model::ChangeKind;

/// Receiver of compacted changes
///
/// `start` and `end` are inclusive replay indices.
pub trait ChangeSink {
    fn reordered(&mut self, reorder_map: &[usize]);
    fn inserted(&mut self, start: usize, end: usize);
    fn deleted(&mut self, start: usize, end: usize);
    fn updated(&mut self, start: usize, end: usize);
}

/// Drain `cursor` into `sink`, returning the number of calls made
pub fn dispatch<S>(cursor: ChangeCursor<'_>, sink: &mut S) -> usize
where
    S: ChangeSink + ?Sized,
{
    if let Ok(reorder_map) = cursor.reorder_map() {
        sink.reordered(reorder_map);
        return 1;
    }

    let mut calls = 0;
    for block in cursor {
        match block.kind {
            ChangeKind::Insert => sink.inserted(block.start, block.end()),
            ChangeKind::Delete => sink.deleted(block.start, block.end()),
            ChangeKind::Update => sink.updated(block.start, block.end()),
        }
        calls += 1;
    }
    calls
}

/// Rebuild the current sequence from `snapshot` and a batch's blocks
///
/// Values for inserted and updated slots are read from `current`.
///
/// # Errors
///
/// Returns `DeltaError::IndexOutOfBounds` if a block reaches outside the
/// sequence being rebuilt or outside `current`.
pub fn replay<T: Clone>(
    cursor: ChangeCursor<'_>,
    snapshot: &[T],
    current: &[T],
) -> Result<Vec<T>> {
    if let Ok(reorder_map) = cursor.reorder_map() {
        return reorder_map
            .iter()
            .map(|&old| value_at(snapshot, old))
            .collect();
    }

    let mut rebuilt = snapshot.to_vec();
    for block in cursor {
        match block.kind {
            ChangeKind::Insert => {
                if block.start > rebuilt.len() {
                    return Err(out_of_bounds(block.start, rebuilt.len()));
                }
                for index in block.start..block.start + block.len {
                    rebuilt.insert(index, value_at(current, index)?);
                }
            }
            ChangeKind::Delete => {
                let end = block.start + block.len;
                if end > rebuilt.len() {
                    return Err(out_of_bounds(block.end(), rebuilt.len()));
                }
                rebuilt.drain(block.start..end);
            }
            ChangeKind::Update => {
                for index in block.start..block.start + block.len {
                    let value = value_at(current, index)?;
                    let len = rebuilt.len();
                    let slot = rebuilt
                        .get_mut(index)
                        .ok_or_else(|| out_of_bounds(index, len))?;
                    *slot = value;
                }
            }
        }
    }
    Ok(rebuilt)
}

fn value_at<T: Clone>(values: &[T], index: usize) -> Result<T> {
    values
        .get(index)
        .cloned()
        .ok_or_else(|| out_of_bounds(index, values.len()))
}

fn out_of_bounds(index: usize, len: usize) -> DeltaError {
    DeltaError::out_of_bounds("replay", index, len)
}
