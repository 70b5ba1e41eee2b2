/// Error types for the leaf classifier
///
/// Provider-facing failures (`ClassificationError`) are the only errors the user
/// ever sees. Everything else is absorbed close to where it happens.
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a classification request
///
/// Every variant is recoverable: the session moves to `Failed` and the user
/// may re-submit or pick another file. Carries strings instead of the
/// underlying `reqwest` errors so it can travel inside UI messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassificationError {
    /// Provider unreachable, timed out, or the body could not be read
    #[error("Classification provider unreachable: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("Classification provider returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Reply is missing required fields or carries invalid values
    #[error("Malformed classification reply: {0}")]
    MalformedResponse(String),
}

/// Failure while reading or decoding a user-selected file
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("{0} is empty")]
    Empty(PathBuf),

    #[error("{path} is not a readable image: {message}")]
    Undecodable { path: PathBuf, message: String },
}

/// Settings file could not be loaded or failed validation
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A model identifier outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported model '{0}' (expected one of resnet18, mobilenet_v2, efficientnet_b0, densenet121)")]
pub struct ParseModelError(pub String);
