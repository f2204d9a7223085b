//! Configuration types for coercion

use serde::{Deserialize, Serialize};

/// How textual input is turned into a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextParsing {
    /// Best-effort numeric prefix; non-numeric text becomes zero
    #[default]
    Permissive,
    /// The whole (trimmed) text must be a finite decimal literal
    Strict,
}

/// Float coercion configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatCoercerConfig {
    /// Text parsing mode
    pub text_parsing: TextParsing,
}

impl FloatCoercerConfig {
    pub fn permissive() -> Self {
        Self {
            text_parsing: TextParsing::Permissive,
        }
    }

    pub fn strict() -> Self {
        Self {
            text_parsing: TextParsing::Strict,
        }
    }
}

/// Coercion configuration for all built-in types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionConfig {
    /// Float coercion settings
    pub float: FloatCoercerConfig,
}

impl CoercionConfig {
    /// Create a config that accepts text leniently (the default)
    pub fn permissive() -> Self {
        Self {
            float: FloatCoercerConfig::permissive(),
        }
    }

    /// Create a config that rejects malformed text
    pub fn strict() -> Self {
        Self {
            float: FloatCoercerConfig::strict(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_permissive() {
        let config = CoercionConfig::default();
        assert_eq!(config.float.text_parsing, TextParsing::Permissive);
        assert_eq!(config, CoercionConfig::permissive());
    }

    #[test]
    fn test_strict_config() {
        let config = CoercionConfig::strict();
        assert_eq!(config.float.text_parsing, TextParsing::Strict);
    }

    #[test]
    fn test_config_from_json() {
        let config: CoercionConfig =
            serde_json::from_str(r#"{"float": {"text_parsing": "strict"}}"#).unwrap();
        assert_eq!(config, CoercionConfig::strict());

        let config: CoercionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CoercionConfig::default());
    }
}
