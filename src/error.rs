//! Error types for the engine's outer surfaces
//!
//! Structuring itself never fails: malformed notation becomes error markers
//! and diagnostics. These errors only cover what the host hands in (trees,
//! configuration) before a pass starts.

use thiserror::Error;

pub use crate::syntax::TreeError;

/// Configuration could not be read
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fill tolerance must be between 0 and 1, got {0}")]
    Tolerance(f64),

    #[error("default for '{key}:' is itself invalid: '{value}'")]
    InvalidDefault { key: char, value: String },
}

/// Top-level error type
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("syntax tree rejected: {0}")]
    Tree(#[from] TreeError),

    #[error("configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
