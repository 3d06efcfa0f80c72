//! Flat-to-tree assembly and node state

mod assemble;
mod state;

pub use assemble::*;
pub use state::*;
