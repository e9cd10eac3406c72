//! CLI module for envset
//!
//! Command definitions, argument parsing, and command execution.

pub mod commands;

pub use commands::*;
