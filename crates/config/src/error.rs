//! Error types for configuration operations.
//!
//! Every variant here is fatal for a run: without a readable teams file,
//! secrets payload, and templates nothing can be synchronized.

use std::path::PathBuf;

/// Errors that can occur while loading or interpreting configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration or template file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the teams YAML document.
    #[error("failed to parse teams config {path}: {source}")]
    ParseYaml {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Failed to parse the secrets JSON object.
    #[error("failed to parse secrets input: {0}")]
    ParseSecrets(#[source] serde_json::Error),

    /// A team entry is structurally valid YAML but semantically invalid.
    #[error("invalid team '{team}': {reason}")]
    InvalidTeam {
        /// The team name.
        team: String,
        /// Why the entry was rejected.
        reason: String,
    },

    /// The list of workflow kinds contained an unknown name.
    #[error(transparent)]
    UnknownWorkflowKind(#[from] wfsync_protocol::ProtocolError),

    /// No workflow kind was requested.
    #[error("no workflow kind requested")]
    NoWorkflowKind,
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
