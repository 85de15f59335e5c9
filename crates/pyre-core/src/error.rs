//! Error types for Pyre

use thiserror::Error;

/// The main error type for Pyre operations
#[derive(Debug, Error)]
pub enum PyreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Inverted range: {field} has min {min} greater than max {max}")]
    InvertedRange { field: String, min: f64, max: f64 },

    #[error("Unknown preset: {value} is not one of {allowed:?}")]
    UnknownPreset { value: String, allowed: Vec<String> },
}

/// Result type alias for Pyre operations
pub type Result<T> = std::result::Result<T, PyreError>;

impl From<toml::de::Error> for PyreError {
    fn from(err: toml::de::Error) -> Self {
        PyreError::TomlParseError(err.to_string())
    }
}
