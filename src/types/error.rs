//! Error types for configuration and persistence

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid pattern in {list}: {pattern} ({message})")]
    InvalidPattern {
        list: String,
        pattern: String,
        message: String,
    },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize lead record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lead store lock poisoned")]
    Poisoned,

    #[error("Stored record for {requested} belongs to {found}")]
    IdMismatch { requested: String, found: String },
}
