//! Error types for nameseek

use thiserror::Error;

/// Result type alias using nameseek's Error
pub type Result<T> = std::result::Result<T, Error>;

/// nameseek error types
///
/// Expansion and encoding never produce these; they only surface from the
/// search backend, configuration loading and the CLI.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Index not found: {name}")]
    IndexNotFound { name: String },

    #[error("Index error: {message}")]
    IndexError { message: String },

    #[error("Search error: {message}")]
    SearchError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}
