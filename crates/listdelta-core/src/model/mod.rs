pub mod block;

pub use block::{Block, ChangeKind};
