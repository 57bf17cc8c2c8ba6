//! Hash primitives

mod hash;

pub use hash::*;
