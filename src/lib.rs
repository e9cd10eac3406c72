//! envset - environment-backed settings registry
//!
//! Applications declare every setting they read once, with an optional
//! default. Values come from the upper-cased environment variable of the same
//! name, fall back to the default, and can be replaced by local override
//! files. Because environment values are always strings, settings should be
//! compared with [`Settings::is`], which ignores type.
//!
//! ```
//! use envset::{MapEnvironment, Settings};
//!
//! let env = MapEnvironment::new().with_var("API_USERNAME", "deploy");
//! let mut settings = Settings::with_environment(env);
//! settings.register_with_default("api_username", "development")?;
//! settings.register_with_default("debug", false)?;
//!
//! assert_eq!(settings.get_str("api_username")?, "deploy");
//! assert!(settings.is("debug", "false")?);
//! # Ok::<(), envset::SettingsError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod utils;
pub mod value;

// Re-export commonly used types
pub use error::{Result, SettingsError};
pub use registry::{Environment, MapEnvironment, Origin, ProcessEnvironment, Setting, Settings};
pub use value::SettingValue;
