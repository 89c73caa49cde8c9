//! Typed errors callers match on. Application flow uses `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems detected at startup, before any document is processed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("nepali majority threshold must be a number within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("translation endpoint must not be empty when a translation provider is enabled")]
    EmptyEndpoint,

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Translation provider failures; never escape `Translator::translate`
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("translation provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("translation provider unavailable: {0}")]
    Unavailable(String),
}
