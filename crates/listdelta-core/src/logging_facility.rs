//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Only batch-level entry points such as
//! [`apply_edits`](crate::apply::apply_edits) use the boundary macros. The
//! accumulator and backing stores emit `tracing::debug!` events for resets,
//! store migrations and reorder installs.
//!
//! # Usage
//!
//! ```rust
//! use listdelta_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
