//! Error types for Kartei.

use thiserror::Error;

/// Library-level error type for Kartei operations.
#[derive(Error, Debug)]
pub enum KarteiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Card store error: {0}")]
    Store(String),

    #[error("Content generation failed: {0}")]
    Generation(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Kartei operations.
pub type Result<T> = std::result::Result<T, KarteiError>;
