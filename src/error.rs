use thiserror::Error;

/// Main error type for envset operations
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Setting not registered: {name}")]
    NotRegistered { name: String },

    #[error("Invalid setting name: '{name}' (expected letters, digits and underscores, not starting with a digit)")]
    InvalidName { name: String },

    #[error("Setting '{name}' holds a {actual} value, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Failed to parse '{path}': {details}")]
    ParseError { path: String, details: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl SettingsError {
    pub fn not_registered<S: Into<String>>(name: S) -> Self {
        Self::NotRegistered { name: name.into() }
    }

    pub fn invalid_name<S: Into<String>>(name: S) -> Self {
        Self::InvalidName { name: name.into() }
    }

    pub fn type_mismatch<S: Into<String>>(name: S, expected: &str, actual: &str) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn invalid_value<S: Into<String>>(msg: S) -> Self {
        Self::InvalidValue(msg.into())
    }

    pub fn parse<P: Into<String>, D: Into<String>>(path: P, details: D) -> Self {
        Self::ParseError {
            path: path.into(),
            details: details.into(),
        }
    }
}

/// Result type alias for envset operations
pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_messages() {
        assert_eq!(
            SettingsError::not_registered("wifi_name").to_string(),
            "Setting not registered: wifi_name"
        );
        assert_eq!(
            SettingsError::type_mismatch("port", "integer", "string").to_string(),
            "Setting 'port' holds a string value, expected integer"
        );
        assert_eq!(
            SettingsError::parse("settings.local.toml", "not a table").to_string(),
            "Failed to parse 'settings.local.toml': not a table"
        );
        assert!(matches!(
            SettingsError::invalid_value("bad date"),
            SettingsError::InvalidValue(msg) if msg == "bad date"
        ));
    }

    #[test]
    fn test_from_conversions() {
        let err: SettingsError = url::Url::parse("http://").unwrap_err().into();
        assert!(matches!(err, SettingsError::UrlError(_)));

        let err: SettingsError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, SettingsError::IoError(_)));
    }
}
