//! Application error types

use folio_animation::AnimationError;
use std::path::PathBuf;
use thiserror::Error;

/// Content loading errors
#[derive(Error, Debug)]
pub enum ContentError {
    /// Failed to read the content file
    #[error("Failed to read content file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML content
    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Malformed JSON content
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Extension other than .toml / .json
    #[error("Unsupported content format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value that parsed but cannot be used
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Contact submission errors
///
/// Every variant is recoverable: the form keeps its fields and shows a notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// A required field is empty or malformed
    #[error("{0}")]
    Invalid(&'static str),

    /// The endpoint could not be reached
    #[error("Could not reach the contact service: {0}")]
    Network(String),

    /// The endpoint answered with an error status
    #[error("Contact service rejected the message (status {status})")]
    Rejected { status: u16 },

    /// A submission is already in flight
    #[error("A message is already being sent")]
    Busy,
}

/// Page composition errors
#[derive(Error, Debug)]
pub enum PageError {
    /// A section descriptor failed to build
    #[error("Invalid animation setup for {region}: {source}")]
    Animation {
        region: String,
        #[source]
        source: AnimationError,
    },

    /// Referenced a region that is not mounted
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Operation on an unmounted page
    #[error("Page is not mounted")]
    NotMounted,
}

/// Result type for page operations
pub type Result<T> = std::result::Result<T, PageError>;
