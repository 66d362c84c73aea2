//! Batch apply boundary
//!
//! [`apply_edits`] is the entry point for recording a whole batch of edits
//! at once. It owns the lifecycle logging for that operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (accumulator, backing stores) use only `tracing::debug!()`.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: either every edit is recorded, or none is and the
//!   accumulator is left exactly as it was
//! - **Fail fast**: the first rejected edit stops the batch and its position
//!   is reported in `DeltaError::EditRejected`
//!
//! ## Example
//!
//! ```
//! use listdelta_core::{apply::apply_edits, Edit, EditAccumulator};
//!
//! let mut acc = EditAccumulator::new();
//! acc.reset(2);
//! apply_edits(&mut acc, &[Edit::Insert(2), Edit::Update(0)]).unwrap();
//! assert_eq!(acc.current_size(), 3);
//! ```

use crate::accumulator::EditAccumulator;
use crate::commands::Edit;
use crate::errors::{DeltaError, Result};
use crate::{log_op_end, log_op_error, log_op_start};

/// Record `edits` in order against `acc`
///
/// # Errors
///
/// Returns `DeltaError::EditRejected` wrapping the first edit's failure
/// (out of bounds, or a reorder already installed). `acc` is unchanged.
pub fn apply_edits(acc: &mut EditAccumulator, edits: &[Edit]) -> Result<()> {
    let snapshot_len = acc.snapshot_size();
    log_op_start!(
        "apply_edits",
        edit_count = edits.len(),
        snapshot_len = snapshot_len
    );
    let start = std::time::Instant::now();

    let mut next = acc.clone();
    for (position, edit) in edits.iter().enumerate() {
        next.apply(*edit).map_err(|source| {
            let err = DeltaError::EditRejected {
                position,
                source: Box::new(source),
            };
            log_op_error!(
                "apply_edits",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                snapshot_len = snapshot_len,
                position = position
            );
            err
        })?;
    }
    *acc = next;

    log_op_end!(
        "apply_edits",
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot_len = snapshot_len,
        current_len = acc.current_size(),
        backing = acc.backing().as_str()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_applies_all_edits() {
        let mut acc = EditAccumulator::new();
        acc.reset(3);
        apply_edits(&mut acc, &[Edit::Remove(0), Edit::Insert(2), Edit::Update(0)]).unwrap();
        assert_eq!(acc.current_size(), 3);
        assert_eq!(acc.current_to_snapshot(2), Ok(None));
        assert_eq!(acc.current_updated(0), Ok(true));
    }

    #[test]
    fn test_failed_batch_leaves_state_untouched() {
        let mut acc = EditAccumulator::new();
        acc.reset(3);
        acc.update(1).unwrap();
        let before = acc.to_string();

        let err = apply_edits(&mut acc, &[Edit::Insert(0), Edit::Remove(9)]).unwrap_err();
        match err {
            DeltaError::EditRejected { position, source } => {
                assert_eq!(position, 1);
                assert!(matches!(*source, DeltaError::IndexOutOfBounds { index: 9, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(acc.to_string(), before);
        assert_eq!(acc.current_size(), 3);
    }
}
