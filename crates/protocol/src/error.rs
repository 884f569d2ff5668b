//! Error types for the wfsync-protocol crate.

use thiserror::Error;

/// Errors that can occur when working with protocol types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The given name does not match any supported workflow kind.
    #[error("unknown workflow kind '{0}' (expected one of: project-automation, phpcs, phpunit)")]
    UnknownWorkflowKind(String),
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
