//! Application setting catalog
//!
//! Every setting the application reads is declared here, so all externally
//! settable keys are visible in one place. Secrets must not get real defaults;
//! provide them through environment variables or `settings.local.toml`.

use crate::error::{Result, SettingsError};
use crate::registry::Settings;
use chrono::Utc;
use url::Url;

/// Declare all application settings with their defaults
pub fn register_catalog(settings: &mut Settings) -> Result<()> {
    // WiFi credentials
    settings.register_with_default("wifi_name", "XING-GUEST")?;
    settings.register_with_default("wifi_password", "goxinggo")?;

    // API credentials
    settings.register_with_default("api_base_url", "https://example.com/api")?;
    settings.register_with_default("api_username", "development")?;
    settings.register_with_default("api_password", "not_secret")?;

    // Mailer link generation
    settings.register_with_default("host", "localhost")?;
    settings.register_with_default("port", 3000)?;

    settings.register_with_default("booted_at", Utc::now())?;

    Ok(())
}

/// Host and port used when building absolute links, e.g. in mails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOptions {
    pub host: String,
    pub port: u16,
}

impl UrlOptions {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let host = settings.get_str("host")?.to_string();
        let port = settings.get_i64("port")?;
        let port = u16::try_from(port)
            .map_err(|_| SettingsError::type_mismatch("port", "port number (0-65535)", "integer"))?;

        Ok(Self { host, port })
    }

    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!("http://{}:{}/", self.host, self.port))?)
    }
}
