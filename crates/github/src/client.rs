//! GitHub API client implementation.
//!
//! This module provides the [`GitHubClient`] struct for talking to the GitHub
//! REST API with a single personal access token.

use std::fmt;

use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::error::Result;

/// What a client is allowed to do.
///
/// A read-only client is used for eligibility checks; a text-file client for
/// creating, updating, and deleting workflow files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Reads variables and file metadata only.
    ReadOnly,
    /// Also creates, updates, and deletes text files.
    TextFileCrud,
}

impl Capability {
    /// Returns `true` if writes are allowed.
    #[must_use]
    pub fn can_write(self) -> bool {
        matches!(self, Self::TextFileCrud)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => f.write_str("read-only"),
            Self::TextFileCrud => f.write_str("text-file-crud"),
        }
    }
}

/// GitHub API client bound to one token and one capability.
///
/// # Security
///
/// The token is handed to octocrab at construction and never stored here.
///
/// # Examples
///
/// ```no_run
/// use secrecy::SecretString;
/// use wfsync_github::{Capability, GitHubClient};
///
/// # async fn example() -> wfsync_github::Result<()> {
/// let token = SecretString::from("ghp_your_token".to_string());
/// let client = GitHubClient::new(&token, Capability::ReadOnly, None)?;
///
/// let repos = client.list_org_repos("acme").await?;
/// println!("{} repositories", repos.len());
/// # Ok(())
/// # }
/// ```
pub struct GitHubClient {
    inner: Octocrab,
    capability: Capability,
}

impl GitHubClient {
    /// Creates a new client.
    ///
    /// `api_url` overrides the API base, as on GitHub Enterprise Server.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or octocrab fails to initialize.
    #[instrument(skip(token), fields(capability = %capability))]
    pub fn new(
        token: &SecretString,
        capability: Capability,
        api_url: Option<&str>,
    ) -> Result<Self> {
        debug!("creating GitHub client");
        let mut builder = Octocrab::builder().personal_token(token.expose_secret());
        if let Some(url) = api_url {
            builder = builder.base_uri(url.to_string())?;
        }
        let inner = builder.build()?;

        Ok(Self { inner, capability })
    }

    /// Returns what this client is allowed to do.
    #[must_use]
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Returns a reference to the underlying octocrab client.
    #[must_use]
    pub fn inner(&self) -> &Octocrab {
        &self.inner
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}
