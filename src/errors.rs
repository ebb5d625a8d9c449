// src/errors.rs

//! Crate-wide error type.
//!
//! Everything that ends the program before the mirroring tool reports an
//! outcome of its own is a `CopypastaError`. `main.rs` maps all of them to
//! exit code 1.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopypastaError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid URL: unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Error starting command `{program}`: {source}")]
    LaunchError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error creating {0} pipe")]
    StreamUnavailable(&'static str),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: crate::exec::SupervisorState,
        to: crate::exec::SupervisorState,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CopypastaError>;
