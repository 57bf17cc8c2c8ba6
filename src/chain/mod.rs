//! Chain-state index - FULL (block-bodied) and THIN (headers-only) variants

mod index;

pub use index::*;
