//! Utility functions module
//!
//! Name rules, date parsing and output formatting helpers.

pub mod datetime;
pub mod format;
pub mod names;

pub use datetime::*;
pub use format::*;
pub use names::*;
