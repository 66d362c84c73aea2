//! Types shared across ListDelta facilities
//!
//! - **Schema constants**: canonical field keys and event names emitted by
//!   the logging macros in `listdelta-core`

pub mod schema;
