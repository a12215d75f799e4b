//! anim-rs library
//!
//! Command implementations for inspecting skeletons, resolving blend
//! requests and simulating locomotion from JSON assets.

pub mod cli;
pub mod commands;
pub mod utils;
