// ============================================================
// INTERCHANGE CONFIGURATION
// ============================================================
// Limits and dialect settings for reading and writing playlist files

use serde::{Deserialize, Serialize};

/// Largest accepted source, 50MB
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Configuration for the playlist CSV reader and writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterchangeConfig {
    /// Sources larger than this are rejected before parsing (default: 50MB)
    pub max_input_bytes: u64,

    /// Field separator (default: comma)
    pub delimiter: char,

    /// Trim surrounding whitespace from every field when reading
    pub trim_fields: bool,
}

impl Default for InterchangeConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            delimiter: ',',
            trim_fields: false,
        }
    }
}

impl InterchangeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_input_bytes == 0 {
            return Err("max_input_bytes must be > 0".to_string());
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(format!("delimiter {:?} is not usable", self.delimiter));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = InterchangeConfig::default();
        assert_eq!(config.max_input_bytes, 50 * 1024 * 1024);
        assert_eq!(config.delimiter_byte(), b',');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = InterchangeConfig {
            max_input_bytes: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let unicode = InterchangeConfig {
            delimiter: '¦',
            ..Default::default()
        };
        assert!(unicode.validate().is_err());

        // Would collide with quoting or record terminators
        for delimiter in ['"', '\n', '\r'] {
            let config = InterchangeConfig {
                delimiter,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{:?} accepted", delimiter);
        }

        let semicolon = InterchangeConfig {
            delimiter: ';',
            ..Default::default()
        };
        assert!(semicolon.validate().is_ok());
    }
}
