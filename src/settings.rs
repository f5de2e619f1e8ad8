//! Parser configuration.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Feature flags fixed when a [`Parser`](crate::parser::Parser) is built.
///
/// Only the set of inline handlers depends on these; the block engine is
/// the same for every configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Treat `~~text~~` as strikethrough.
    pub strikethrough_tilde: bool,
}

impl ParserSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the `~` strikethrough delimiter.
    pub fn strikethrough_tilde(mut self, enabled: bool) -> Self {
        self.strikethrough_tilde = enabled;
        self
    }

    /// Load settings from a JSON object. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_extensions() {
        assert!(!ParserSettings::default().strikethrough_tilde);
    }

    #[test]
    fn json_with_missing_keys_uses_defaults() {
        let settings = ParserSettings::from_json("{}").unwrap();
        assert_eq!(settings, ParserSettings::default());
    }

    #[test]
    fn json_enables_strikethrough() {
        let settings = ParserSettings::from_json(r#"{"strikethrough_tilde": true}"#).unwrap();
        assert!(settings.strikethrough_tilde);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(ParserSettings::from_json(r#"{"strikethrough_tilde": 3}"#).is_err());
    }
}
