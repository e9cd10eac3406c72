//! Settings registry
//!
//! Each recognised setting is declared once with an optional default. The
//! declaration resolves the value from the environment variable of the same
//! name (upper-cased) and falls back to the default. Local override sources
//! can replace any value afterwards.

use crate::error::{Result, SettingsError};
use crate::utils::datetime::parse_iso_datetime;
use crate::utils::names::{env_key, validate_setting_name};
use crate::value::SettingValue;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Origin label for programmatic overrides
pub const CODE_SOURCE: &str = "code";

/// Source of environment variable values
#[cfg_attr(test, mockall::automock)]
pub trait Environment: Send + Sync {
    /// Value of the variable `key`, or `None` when unset
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                warn!("Ignoring environment variable {} with non-unicode value", key);
                None
            }
        }
    }
}

/// Fixed set of variables, independent of the process environment
#[derive(Debug, Default, Clone)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Where a setting's current value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Read from the environment at registration
    Environment,
    /// Declared default
    Default,
    /// Neither environment value nor default
    Unset,
    /// Replaced after registration
    Override { source: String },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Environment => write!(f, "environment"),
            Origin::Default => write!(f, "default"),
            Origin::Unset => write!(f, "unset"),
            Origin::Override { source } => write!(f, "override ({})", source),
        }
    }
}

/// A resolved setting
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub name: String,
    pub value: SettingValue,
    pub origin: Origin,
    /// Whether the name went through `register` rather than only `set`
    pub registered: bool,
}

impl Setting {
    /// Environment variable consulted for this setting
    pub fn env_key(&self) -> String {
        env_key(&self.name)
    }
}

/// Registry of named settings backed by an environment source
pub struct Settings {
    env: Box<dyn Environment>,
    entries: HashMap<String, Setting>,
    warn_on_unregistered_override: bool,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("entries", &self.entries)
            .field("warn_on_unregistered_override", &self.warn_on_unregistered_override)
            .finish_non_exhaustive()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Registry reading the process environment
    pub fn new() -> Self {
        Self::with_environment(ProcessEnvironment)
    }

    /// Registry reading from the given environment source
    pub fn with_environment<E: Environment + 'static>(env: E) -> Self {
        Self {
            env: Box::new(env),
            entries: HashMap::new(),
            warn_on_unregistered_override: false,
        }
    }

    /// Log a warning when an override targets a name that was never registered
    pub fn warn_on_unregistered_override(mut self, enabled: bool) -> Self {
        self.warn_on_unregistered_override = enabled;
        self
    }

    /// Declare a setting without a default
    pub fn register(&mut self, name: &str) -> Result<&SettingValue> {
        self.resolve(name, None)
    }

    /// Declare a setting, falling back to `default` when its variable is unset
    pub fn register_with_default<V: Into<SettingValue>>(
        &mut self,
        name: &str,
        default: V,
    ) -> Result<&SettingValue> {
        self.resolve(name, Some(default.into()))
    }

    fn resolve(&mut self, name: &str, default: Option<SettingValue>) -> Result<&SettingValue> {
        validate_setting_name(name)?;
        let key = env_key(name);

        let (value, origin) = match (self.env.var(&key), default) {
            (Some(raw), _) => (SettingValue::String(raw), Origin::Environment),
            (None, Some(default)) => (default, Origin::Default),
            (None, None) => (SettingValue::Null, Origin::Unset),
        };

        if self.entries.contains_key(name) {
            debug!("Re-registering setting {}", name);
        }
        debug!("Registered {} from {} ({})", name, origin, value.type_name());

        let setting = Setting {
            name: name.to_string(),
            value,
            origin,
            registered: true,
        };
        self.entries.insert(name.to_string(), setting);
        self.get(name)
    }

    /// Replace the value of a setting, bypassing environment and default
    pub fn set<V: Into<SettingValue>>(&mut self, name: &str, value: V) -> Result<()> {
        self.set_from(CODE_SOURCE, name, value.into())
    }

    /// Replace the value of a setting, recording `source` as its origin
    pub fn set_from(&mut self, source: &str, name: &str, value: SettingValue) -> Result<()> {
        validate_setting_name(name)?;

        let registered = self.entries.get(name).is_some_and(|s| s.registered);
        if !registered && self.warn_on_unregistered_override {
            warn!("Override of unregistered setting {} from {}", name, source);
        }
        debug!("Override {} from {} ({})", name, source, value.type_name());

        self.entries.insert(
            name.to_string(),
            Setting {
                name: name.to_string(),
                value,
                origin: Origin::Override {
                    source: source.to_string(),
                },
                registered,
            },
        );
        Ok(())
    }

    /// Apply a list of overrides in order; returns the number applied.
    ///
    /// All names are validated first, so an invalid entry leaves the registry
    /// untouched.
    pub fn apply_overrides<I>(&mut self, source: &str, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (String, SettingValue)>,
    {
        let entries: Vec<(String, SettingValue)> = entries.into_iter().collect();
        for (name, _) in &entries {
            validate_setting_name(name)?;
        }

        let applied = entries.len();
        for (name, value) in entries {
            self.set_from(source, &name, value)?;
        }
        debug!("Applied {} override(s) from {}", applied, source);
        Ok(applied)
    }

    /// Current value of a setting
    pub fn get(&self, name: &str) -> Result<&SettingValue> {
        self.setting(name).map(|s| &s.value)
    }

    /// Full record of a setting
    pub fn setting(&self, name: &str) -> Result<&Setting> {
        self.entries
            .get(name)
            .ok_or_else(|| SettingsError::not_registered(name))
    }

    /// Compare a setting with any value by canonical string form
    pub fn is<V: Into<SettingValue>>(&self, name: &str, other: V) -> Result<bool> {
        Ok(self.get(name)?.loose_eq(&other.into()))
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            SettingValue::String(s) => Ok(s),
            other => Err(SettingsError::type_mismatch(name, "string", other.type_name())),
        }
    }

    /// String value, or `None` when the setting is null
    pub fn get_opt_str(&self, name: &str) -> Result<Option<&str>> {
        match self.get(name)? {
            SettingValue::Null => Ok(None),
            SettingValue::String(s) => Ok(Some(s)),
            other => Err(SettingsError::type_mismatch(name, "string", other.type_name())),
        }
    }

    /// Boolean value; strings `true`/`false`/`1`/`0` are accepted in any case
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            SettingValue::Bool(b) => Ok(*b),
            SettingValue::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(SettingsError::type_mismatch(name, "boolean", "string")),
            },
            other => Err(SettingsError::type_mismatch(name, "boolean", other.type_name())),
        }
    }

    pub fn get_i64(&self, name: &str) -> Result<i64> {
        match self.get(name)? {
            SettingValue::Integer(i) => Ok(*i),
            SettingValue::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| SettingsError::type_mismatch(name, "integer", "string")),
            other => Err(SettingsError::type_mismatch(name, "integer", other.type_name())),
        }
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            SettingValue::Float(x) => Ok(*x),
            SettingValue::Integer(i) => Ok(*i as f64),
            SettingValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| SettingsError::type_mismatch(name, "float", "string")),
            other => Err(SettingsError::type_mismatch(name, "float", other.type_name())),
        }
    }

    pub fn get_timestamp(&self, name: &str) -> Result<DateTime<Utc>> {
        match self.get(name)? {
            SettingValue::Timestamp(dt) => Ok(*dt),
            SettingValue::String(s) => parse_iso_datetime(s)
                .map_err(|_| SettingsError::type_mismatch(name, "timestamp", "string")),
            other => Err(SettingsError::type_mismatch(name, "timestamp", other.type_name())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn origin(&self, name: &str) -> Result<&Origin> {
        self.setting(name).map(|s| &s.origin)
    }

    /// All settings sorted by name
    pub fn entries(&self) -> Vec<&Setting> {
        let mut settings: Vec<&Setting> = self.entries.values().collect();
        settings.sort_by(|a, b| a.name.cmp(&b.name));
        settings
    }
}
