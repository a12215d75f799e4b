//! Shared utilities for the anim-rs CLI

pub mod table;
pub mod tree;

pub use table::*;
pub use tree::*;
