//! Support library for the socialwalk CLI binary.
//!
//! Exposes argument parsing, simulation, and logging setup so tests can drive
//! the command pipeline in-process.

pub mod cli;
pub mod logging;
