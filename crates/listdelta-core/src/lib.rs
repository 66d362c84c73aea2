//! ListDelta Core - change tracking for ordered sequences
//!
//! Records insert, remove and update edits made to a live sequence against
//! a fixed snapshot, and describes the net change as an ascending list of
//! compacted blocks. This crate provides:
//! - [`EditAccumulator`], the per-batch change tracker with snapshot/current
//!   position queries and a pure-permutation mode
//! - Two interchangeable backing stores: a linear block list and an
//!   order-statistics tree for scattered edits
//! - [`ChangeCursor`], a cheap-to-clone reader over the compacted blocks
//! - [`ChangeSink`] and [`dispatch`] for delivering a batch to observers
//!
//! ```
//! use listdelta_core::{Block, ChangeKind, EditAccumulator};
//!
//! let mut acc = EditAccumulator::new();
//! acc.reset(2);
//! acc.add(2).unwrap();
//! let blocks: Vec<Block> = acc.iterator().collect();
//! assert_eq!(blocks, vec![Block::new(ChangeKind::Insert, 2, 1)]);
//! ```

pub mod accumulator;
pub mod apply;
pub mod backing;
pub mod commands;
pub mod config;
pub mod consumer;
pub mod cursor;
pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use accumulator::{BackingKind, EditAccumulator};
pub use apply::apply_edits;
pub use commands::Edit;
pub use config::DeltaConfig;
pub use consumer::{dispatch, replay, ChangeSink};
pub use cursor::{ChangeCursor, RandomAccessBlocks};
pub use errors::{DeltaError, ExError, ExErrorKind, Result};
pub use model::{Block, ChangeKind};
