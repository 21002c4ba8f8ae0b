//! Application error types.

use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors for address-relink.
///
/// Only failures that abort the run surface as `AppError`. Registry lookups
/// never do: an exhausted lookup becomes a no-match outcome instead.
#[derive(Error, Debug)]
pub enum AppError {
    // Transport errors
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    // SPARQL errors
    #[error("Malformed SPARQL results: {0}")]
    MalformedResults(String),

    // Output errors
    #[error("Failed to write patch to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Wraps a reqwest error with the URL that produced it.
    pub fn http(url: &str, source: reqwest::Error) -> Self {
        AppError::Http {
            url: url.to_string(),
            source,
        }
    }

    /// Wraps an I/O error with the path being written.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}
