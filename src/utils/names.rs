//! Setting name rules
//!
//! A setting name doubles as the key of its environment variable, so it is
//! limited to what shells accept in variable names.

use crate::error::{Result, SettingsError};

/// Suffixes that mark a setting as secret in listings
const SECRET_SUFFIXES: [&str; 3] = ["password", "secret", "token"];

/// Check if a name is usable as a setting name: ASCII letters, digits and
/// underscores, not starting with a digit
pub fn is_valid_setting_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Validate a setting name, returning it unchanged on success
pub fn validate_setting_name(name: &str) -> Result<&str> {
    if is_valid_setting_name(name) {
        Ok(name)
    } else {
        Err(SettingsError::invalid_name(name))
    }
}

/// Environment variable key for a setting name
pub fn env_key(name: &str) -> String {
    name.to_uppercase()
}

/// Whether a setting should be masked when listed
pub fn is_secret(name: &str) -> bool {
    let lower = name.to_lowercase();
    SECRET_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["wifi_name", "API_BASE_URL", "_private", "port2", "x"] {
            assert!(is_valid_setting_name(name), "'{}' should be valid", name);
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "2fast", "api-url", "with space", "dotted.name", "ümlaut"] {
            assert!(!is_valid_setting_name(name), "'{}' should be invalid", name);
        }
        assert!(matches!(
            validate_setting_name("api-url"),
            Err(SettingsError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_env_key() {
        assert_eq!(env_key("some_test_env_var"), "SOME_TEST_ENV_VAR");
        assert_eq!(env_key("Mixed_Case"), "MIXED_CASE");
    }

    #[test]
    fn test_is_secret() {
        assert!(is_secret("wifi_password"));
        assert!(is_secret("API_TOKEN"));
        assert!(is_secret("client_secret"));
        assert!(!is_secret("api_username"));
        assert!(!is_secret("password_hint"));
    }
}
