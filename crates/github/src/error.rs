//! Error types for GitHub API operations.
//!
//! Errors returned by octocrab are classified by HTTP status on conversion,
//! because callers react differently to each class:
//!
//! - `404` becomes [`Error::NotFound`] (a missing variable or file)
//! - `401` and `403` become [`Error::Authentication`], which aborts a run
//! - `429` becomes [`Error::RateLimited`]
//! - any other status becomes [`Error::Status`]
//! - transport and decoding failures stay [`Error::Api`]

/// Errors that can occur during GitHub API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport, decoding, or client construction error.
    #[error("GitHub API error: {0}")]
    Api(#[source] octocrab::Error),

    /// The requested resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// The message returned by GitHub.
        message: String,
    },

    /// The token was rejected or lacks the required permission.
    #[error("authentication failed (HTTP {status}): {message}")]
    Authentication {
        /// The HTTP status, 401 or 403.
        status: u16,
        /// The message returned by GitHub.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limit exceeded: {message}")]
    RateLimited {
        /// The message returned by GitHub.
        message: String,
    },

    /// GitHub answered with another error status.
    #[error("GitHub API returned HTTP {status}: {message}")]
    Status {
        /// The HTTP status.
        status: u16,
        /// The message returned by GitHub.
        message: String,
    },

    /// A write was attempted through a read-only client.
    #[error("refusing to write {path} with a read-only client")]
    ReadOnlyClient {
        /// The path that was about to be written.
        path: String,
    },

    /// The contents API returned something other than a text file.
    #[error("unexpected content at {path}: {reason}")]
    InvalidContent {
        /// The repository path.
        path: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl Error {
    /// Returns `true` for authentication-class failures.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                let message = source.message.clone();
                match status {
                    404 => Self::NotFound { message },
                    401 | 403 => Self::Authentication { status, message },
                    429 => Self::RateLimited { message },
                    _ => Self::Status { status, message },
                }
            }
            other => Self::Api(other),
        }
    }
}

/// A specialized Result type for GitHub API operations.
pub type Result<T> = std::result::Result<T, Error>;
