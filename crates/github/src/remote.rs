//! Remote capability traits.
//!
//! The sync executor and the skip evaluator only talk to GitHub through
//! [`RepoRemote`], and obtain clients through [`Connect`]. Production code
//! uses [`GitHubClient`] and [`OctocrabConnector`]; tests substitute an
//! in-memory fake.

use async_trait::async_trait;
use secrecy::SecretString;
use wfsync_protocol::WriteOutcome;

use crate::client::{Capability, GitHubClient};
use crate::contents::TextFileWrite;
use crate::error::Result;

/// Per-repository remote operations.
#[async_trait]
pub trait RepoRemote: Send + Sync {
    /// Reads a repository-level Actions variable.
    async fn repo_variable(&self, owner: &str, repo: &str, name: &str) -> Result<String>;

    /// Returns `true` if `path` exists in the repository.
    async fn file_exists(&self, owner: &str, repo: &str, path: &str) -> Result<bool>;

    /// Brings one text file to the desired state.
    async fn write_text_file(&self, write: &TextFileWrite<'_>) -> Result<WriteOutcome>;
}

#[async_trait]
impl RepoRemote for GitHubClient {
    async fn repo_variable(&self, owner: &str, repo: &str, name: &str) -> Result<String> {
        GitHubClient::repo_variable(self, owner, repo, name).await
    }

    async fn file_exists(&self, owner: &str, repo: &str, path: &str) -> Result<bool> {
        GitHubClient::file_exists(self, owner, repo, path).await
    }

    async fn write_text_file(&self, write: &TextFileWrite<'_>) -> Result<WriteOutcome> {
        GitHubClient::write_text_file(self, write).await
    }
}

/// Builds authenticated clients.
pub trait Connect {
    /// The client type produced.
    type Client: RepoRemote;

    /// Creates a client for `token` limited to `capability`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    fn connect(&self, token: &SecretString, capability: Capability) -> Result<Self::Client>;
}

/// Connects to the GitHub REST API through octocrab.
#[derive(Debug, Clone, Default)]
pub struct OctocrabConnector {
    api_url: Option<String>,
}

impl OctocrabConnector {
    /// Creates a connector for `api.github.com`, or for `api_url` if given.
    #[must_use]
    pub fn new(api_url: Option<String>) -> Self {
        Self { api_url }
    }
}

impl Connect for OctocrabConnector {
    type Client = GitHubClient;

    fn connect(&self, token: &SecretString, capability: Capability) -> Result<GitHubClient> {
        GitHubClient::new(token, capability, self.api_url.as_deref())
    }
}
