//! Consensus policy - reward schedule and checkpoint enforcement

mod checkpoints;
mod rewards;

pub use checkpoints::*;
pub use rewards::*;
