//! Error types for proze compilation
//!
//! Scrubbing, state tracking and formatting never fail. Errors only come from
//! the edges: reading configuration, choosing an output strategy and file I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating or reading a project configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unrecognized config file type: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to parse JSON config file at {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML config file at {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid search pattern for proze files: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Errors that abort a compilation
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unrecognized strategy {0}")]
    UnknownStrategy(String),

    #[error("Strategy '{0}' is not implemented yet")]
    NotImplemented(String),

    #[error("Failed to create output file {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
