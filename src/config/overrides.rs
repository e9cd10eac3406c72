//! Local override files
//!
//! Values that should not live in environment variables (secrets on a
//! developer machine, per-environment tweaks) go into flat files next to the
//! application config:
//!
//! - `settings.<environment>.toml` for environment specific values
//! - `settings.local.toml`, usually git-ignored, applied last
//!
//! Each file is a flat `name = value` table. Files are read as TOML first and
//! as a JSON object as fallback. Missing files are skipped.

use crate::error::{Result, SettingsError};
use crate::registry::Settings;
use crate::utils::names::validate_setting_name;
use crate::value::SettingValue;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const LOCAL_FILE_NAME: &str = "settings.local.toml";

/// Overrides read from a single file
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideSet {
    pub path: PathBuf,
    pub entries: Vec<(String, SettingValue)>,
}

impl OverrideSet {
    /// Label recorded as the origin of each override
    pub fn source(&self) -> String {
        self.path.display().to_string()
    }
}

/// Locates and reads override files in a config directory
#[derive(Debug, Clone)]
pub struct OverrideLoader {
    dir: PathBuf,
    environment: Option<String>,
}

impl OverrideLoader {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            environment: None,
        }
    }

    /// Also read `settings.<environment>.toml`
    pub fn with_environment<S: Into<String>>(mut self, environment: Option<S>) -> Self {
        self.environment = environment.map(Into::into).filter(|e| !e.trim().is_empty());
        self
    }

    /// Candidate files in application order; later files win
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(environment) = &self.environment {
            paths.push(self.dir.join(format!("settings.{}.toml", environment)));
        }
        paths.push(self.dir.join(LOCAL_FILE_NAME));
        paths
    }

    /// Read every existing candidate file
    pub async fn load(&self) -> Result<Vec<OverrideSet>> {
        let mut sets = Vec::new();
        for path in self.candidate_paths() {
            if !path.exists() {
                debug!("No override file at {}", path.display());
                continue;
            }
            let entries = load_from_file(&path).await?;
            debug!("Read {} override(s) from {}", entries.len(), path.display());
            sets.push(OverrideSet { path, entries });
        }
        Ok(sets)
    }

    /// Read every existing candidate file and apply it to `settings`.
    ///
    /// Nothing is applied unless every file loads and every name is valid.
    pub async fn apply(&self, settings: &mut Settings) -> Result<usize> {
        let sets = self.load().await?;
        for set in &sets {
            for (name, _) in &set.entries {
                validate_setting_name(name)?;
            }
        }

        let mut applied = 0;
        for set in sets {
            let source = set.source();
            applied += settings.apply_overrides(&source, set.entries)?;
            info!("Applied overrides from {}", source);
        }
        Ok(applied)
    }
}

async fn load_from_file(path: &Path) -> Result<Vec<(String, SettingValue)>> {
    let contents = tokio::fs::read_to_string(path).await?;
    parse_overrides(&contents).map_err(|details| SettingsError::parse(path.display().to_string(), details))
}

/// Parse override file contents, TOML first and a JSON object as fallback
pub fn parse_overrides(contents: &str) -> std::result::Result<Vec<(String, SettingValue)>, String> {
    let toml_error = match toml::from_str::<toml::Table>(contents) {
        Ok(table) => {
            return Ok(table
                .into_iter()
                .map(|(name, value)| (name, SettingValue::from_toml(value)))
                .collect())
        }
        Err(e) => e,
    };

    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(contents) {
        Ok(object) => Ok(object
            .into_iter()
            .map(|(name, value)| (name, SettingValue::from_json(value)))
            .collect()),
        Err(_) => Err(toml_error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MapEnvironment, Origin};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_toml() {
        let entries = parse_overrides("api_password = \"secret\"\nport = 3001\n").unwrap();
        assert!(entries.contains(&("api_password".to_string(), SettingValue::from("secret"))));
        assert!(entries.contains(&("port".to_string(), SettingValue::Integer(3001))));
    }

    #[test]
    fn test_parse_json_fallback() {
        let entries = parse_overrides(r#"{"debug": true, "ratio": 0.5}"#).unwrap();
        assert!(entries.contains(&("debug".to_string(), SettingValue::Bool(true))));
        assert!(entries.contains(&("ratio".to_string(), SettingValue::Float(0.5))));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_overrides("this is = = not valid").is_err());
        assert!(parse_overrides("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_candidate_paths() {
        let loader = OverrideLoader::new("config").with_environment(Some("staging"));
        assert_eq!(
            loader.candidate_paths(),
            vec![
                PathBuf::from("config/settings.staging.toml"),
                PathBuf::from("config/settings.local.toml"),
            ]
        );

        let loader = OverrideLoader::new("config").with_environment(Some("  "));
        assert_eq!(loader.candidate_paths(), vec![PathBuf::from("config/settings.local.toml")]);
    }

    #[tokio::test]
    async fn test_missing_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let loader = OverrideLoader::new(dir.path()).with_environment(Some("test"));
        assert!(loader.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_file_applied_after_environment_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("settings.staging.toml"),
            "api_base_url = \"http://staging.example.com/api\"\nwifi_name = \"staging\"\n",
        )
        .unwrap();
        fs::write(dir.path().join(LOCAL_FILE_NAME), "wifi_name = \"local\"\n").unwrap();

        let mut settings = Settings::with_environment(MapEnvironment::new());
        settings.register_with_default("api_base_url", "https://example.com/api").unwrap();
        settings.register_with_default("wifi_name", "XING-GUEST").unwrap();

        let loader = OverrideLoader::new(dir.path()).with_environment(Some("staging"));
        let applied = loader.apply(&mut settings).await.unwrap();

        assert_eq!(applied, 3);
        assert_eq!(settings.get_str("wifi_name").unwrap(), "local");
        assert_eq!(
            settings.get_str("api_base_url").unwrap(),
            "http://staging.example.com/api"
        );
        assert!(matches!(
            settings.origin("wifi_name").unwrap(),
            Origin::Override { source } if source.ends_with(LOCAL_FILE_NAME)
        ));
    }

    #[tokio::test]
    async fn test_invalid_local_file_leaves_environment_file_unapplied() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("settings.staging.toml"), "api_username = \"staging\"\n").unwrap();
        fs::write(
            dir.path().join(LOCAL_FILE_NAME),
            "api_password = \"leaked\"\n\"bad-name\" = 1\n",
        )
        .unwrap();

        let mut settings = Settings::with_environment(MapEnvironment::new());
        settings.register_with_default("api_username", "development").unwrap();
        settings.register_with_default("api_password", "not_secret").unwrap();

        let loader = OverrideLoader::new(dir.path()).with_environment(Some("staging"));
        let err = loader.apply(&mut settings).await.unwrap_err();

        assert!(matches!(err, SettingsError::InvalidName { .. }));
        assert_eq!(settings.get_str("api_username").unwrap(), "development");
        assert_eq!(settings.get_str("api_password").unwrap(), "not_secret");
        assert_eq!(settings.origin("api_username").unwrap(), &Origin::Default);
    }

    #[tokio::test]
    async fn test_unparsable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LOCAL_FILE_NAME), "not = [valid").unwrap();

        let loader = OverrideLoader::new(dir.path());
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, SettingsError::ParseError { .. }));
    }
}
