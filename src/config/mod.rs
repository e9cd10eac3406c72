//! Application configuration
//!
//! The setting catalog declares what the application reads; override files
//! replace values after the catalog has been resolved from the environment.

pub mod catalog;
pub mod overrides;

pub use catalog::*;
pub use overrides::*;
