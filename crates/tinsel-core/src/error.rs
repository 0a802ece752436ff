//! Error types for Tinsel

use thiserror::Error;

/// The main error type for Tinsel operations
#[derive(Debug, Error)]
pub enum TinselError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Invalid enum value: {value} is not one of {allowed:?}")]
    InvalidEnumValue {
        value: String,
        allowed: Vec<String>,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Entity index {index} out of range for binding of {count} entities")]
    EntityOutOfRange { index: u32, count: u32 },

    #[error("Category {0} does not support focus")]
    NotFocusable(String),
}

impl TinselError {
    /// Build an `InvalidEnumValue` from a list of accepted names
    pub fn invalid_enum(value: &str, allowed: &[&str]) -> Self {
        TinselError::InvalidEnumValue {
            value: value.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Result type alias for Tinsel operations
pub type Result<T> = std::result::Result<T, TinselError>;

impl From<toml::de::Error> for TinselError {
    fn from(err: toml::de::Error) -> Self {
        TinselError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for TinselError {
    fn from(err: toml::ser::Error) -> Self {
        TinselError::TomlSerError(err.to_string())
    }
}
