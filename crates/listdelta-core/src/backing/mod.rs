//! Backing stores for an edit batch.
//!
//! - [`BlockSequence`]: ascending block list, cheap while edits arrive in
//!   order and stay few
//! - [`IndexMap`]: treap over tagged runs, O(log n) for scattered edits
//!
//! Both answer the same queries with the same results; the accumulator
//! picks one per batch and migrates when the linear form gives out.

pub mod block_sequence;
pub mod index_map;

pub use block_sequence::BlockSequence;
pub use index_map::IndexMap;
