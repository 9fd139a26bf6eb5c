//! Error types for nbsim.
//!
//! Bad simulation parameters are never errors (they are coerced, see
//! `simulation::params`). What remains is configuration loading, protocol
//! errors local to one viewer, and the OS refusing to start a tick thread.

use thiserror::Error;

/// Failure to load a YAML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// An inbound viewer message that cannot be acted on.
///
/// The `Display` text is sent back verbatim to the viewer that sent it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Unparsable JSON, or a required field is absent.
    #[error("Invalid message format")]
    InvalidFormat,

    #[error("Unknown action received: {0:?}")]
    UnknownAction(String),
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn tick thread: {0}")]
    Spawn(#[from] std::io::Error),
}
