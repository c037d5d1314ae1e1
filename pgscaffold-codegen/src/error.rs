//! Error types for pgscaffold-codegen

use thiserror::Error;

/// Result type alias for pgscaffold-codegen operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur during scaffold generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to parse schema: {0}")]
    SchemaError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<config::ConfigError> for GeneratorError {
    fn from(err: config::ConfigError) -> Self {
        GeneratorError::ConfigError(err.to_string())
    }
}
