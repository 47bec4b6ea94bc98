//! Error types for serialization and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning a tree into source text.
///
/// Every variant is an upstream contract violation. Mutation operators and
/// node factories never leave an unset node behind, so these only fire for
/// trees that came from elsewhere (hand-written JSON, a broken operator).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmitError {
    #[error("unset expression in required position: {context}")]
    UnsetExpression { context: &'static str },

    #[error("unset literal in required position: {context}")]
    UnsetLiteral { context: &'static str },

    #[error("inheritance nested deeper than {limit} levels")]
    InheritanceTooDeep { limit: usize },
}

/// Result type for emission.
pub type EmitResult<T> = Result<T, EmitError>;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
