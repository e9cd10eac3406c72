//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap and
//! the handlers that print the resolved settings.

use crate::config::{register_catalog, OverrideLoader};
use crate::error::Result;
use crate::registry::{Setting, Settings};
use crate::utils::datetime::format_datetime;
use crate::utils::format::{format_bool, format_raw_table, format_table, mask_value, OutputFormat};
use crate::utils::names::is_secret;
use crate::value::SettingValue;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{Table, Tabled};

#[derive(Parser, Debug)]
#[command(name = "envset")]
#[command(about = "Inspect application settings resolved from environment, defaults and local overrides")]
#[command(version, author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Directory holding settings.local.toml and settings.<environment>.toml
    #[arg(long, global = true, env = "ENVSET_CONFIG_DIR", default_value = "config")]
    pub config_dir: PathBuf,

    /// Environment name selecting settings.<environment>.toml
    #[arg(long, global = true, env = "APP_ENV")]
    pub environment: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all settings with their origin (alias: ls)
    #[command(alias = "ls")]
    List {
        /// Print secret values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Print the value of a setting
    Get {
        /// Setting name
        name: String,
    },
    /// Compare a setting with a value, ignoring type; exits with 1 on mismatch
    Is {
        /// Setting name
        name: String,
        /// Value to compare against
        value: String,
    },
    /// Show version information
    Version,
}

/// Outcome of a command, mapped to the process exit status by the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Mismatch,
}

impl Cli {
    /// Resolve the application settings for this invocation
    pub async fn load_settings(&self, mut settings: Settings) -> Result<Settings> {
        register_catalog(&mut settings)?;
        OverrideLoader::new(&self.config_dir)
            .with_environment(self.environment.clone())
            .apply(&mut settings)
            .await?;
        Ok(settings)
    }

    pub fn execute(&self, settings: &Settings) -> Result<Outcome> {
        let output = match &self.command {
            Commands::List { show_secrets } => {
                render_list(settings, *show_secrets, self.format, self.no_color)?
            }
            Commands::Get { name } => render_get(settings, name, self.format)?,
            Commands::Is { name, value } => {
                let matched = settings.is(name, value.as_str())?;
                println!("{}", format_bool(matched, self.no_color));
                return Ok(if matched {
                    Outcome::Success
                } else {
                    Outcome::Mismatch
                });
            }
            Commands::Version => format!("envset {}", env!("CARGO_PKG_VERSION")),
        };

        println!("{}", output);
        Ok(Outcome::Success)
    }
}

#[derive(Tabled, Serialize)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    name: String,
    #[tabled(rename = "Env")]
    env_key: String,
    #[tabled(rename = "Value")]
    #[serde(skip)]
    display: String,
    #[tabled(skip)]
    value: SettingValue,
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    type_name: String,
    #[tabled(rename = "Origin")]
    origin: String,
}

impl SettingRow {
    fn new(setting: &Setting, show_secrets: bool) -> Self {
        let hide = !show_secrets && is_secret(&setting.name);
        let display = match &setting.value {
            SettingValue::Timestamp(dt) => format_datetime(*dt),
            other => other.to_string(),
        };
        let (display, value) = if hide {
            let masked = mask_value(&display);
            (masked.clone(), SettingValue::String(masked))
        } else {
            (display, setting.value.clone())
        };

        Self {
            name: setting.name.clone(),
            env_key: setting.env_key(),
            display,
            value,
            type_name: setting.value.type_name().to_string(),
            origin: setting.origin.to_string(),
        }
    }
}

fn render_list(
    settings: &Settings,
    show_secrets: bool,
    format: OutputFormat,
    no_color: bool,
) -> Result<String> {
    let rows: Vec<SettingRow> = settings
        .entries()
        .into_iter()
        .map(|setting| SettingRow::new(setting, show_secrets))
        .collect();

    if rows.is_empty() {
        return Ok("No settings registered".to_string());
    }

    Ok(match format {
        OutputFormat::Table => format_table(Table::new(&rows), no_color),
        OutputFormat::Raw => format_raw_table(Table::new(&rows)),
        OutputFormat::Json => serde_json::to_string_pretty(&rows)?,
    })
}

fn render_get(settings: &Settings, name: &str, format: OutputFormat) -> Result<String> {
    let value = settings.get(name)?;
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Table | OutputFormat::Raw => value.to_string(),
    })
}
