//! GitHub layer for wfsync.
//!
//! This crate talks to the GitHub REST API and drives the synchronization of
//! workflow files across an organization.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - [`GitHubClient`]: octocrab-backed client bound to one token and one
//!   [`Capability`]
//! - [`RepoRemote`] and [`Connect`]: the seams through which the executor
//!   reaches GitHub, implemented by [`GitHubClient`] and
//!   [`OctocrabConnector`]
//! - [`CredentialCache`]: memoized client handles keyed by token and
//!   capability
//! - [`evaluate_skip`]: the per-repository skip checks
//! - [`Synchronizer`]: the per-repository create/update/delete loop
//! - [`Error`]: error types for GitHub API operations
//!
//! # Authentication
//!
//! Two kinds of token are used. A single read-only token performs every skip
//! check; each team's `workflow-manage` token performs the writes for its
//! repositories. Tokens are handled as [`secrecy::SecretString`] and never
//! logged.
//!
//! # Examples
//!
//! Listing an organization and synchronizing one workflow:
//!
//! ```no_run
//! use secrecy::SecretString;
//! use wfsync_config::{SecretStore, TeamsConfig, resolve_repos};
//! use wfsync_github::{Capability, GitHubClient, OctocrabConnector, SyncOptions, Synchronizer};
//! use wfsync_protocol::WorkflowKind;
//!
//! # async fn example(teams: TeamsConfig, secrets: SecretStore, template: String) -> wfsync_github::Result<()> {
//! let token = SecretString::from("ghp_read".to_string());
//! let client = GitHubClient::new(&token, Capability::ReadOnly, None)?;
//! let repos = resolve_repos(&teams, &client.list_org_repos("acme").await?);
//!
//! let options = SyncOptions {
//!     org: "acme".to_string(),
//!     process_deletion: false,
//!     dry_run: false,
//!     read_secret: "CSPF_REPO_READ_PAT".to_string(),
//! };
//! let mut sync = Synchronizer::new(options, &secrets, OctocrabConnector::default());
//! let summary = sync.sync_workflow(WorkflowKind::Phpcs, &template, &repos).await?;
//! assert!(!summary.has_failures());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod contents;
pub mod eligibility;
pub mod error;
pub mod remote;
mod repos;
pub mod sync;
mod variables;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cache::CredentialCache;
pub use client::{Capability, GitHubClient};
pub use contents::TextFileWrite;
pub use eligibility::{SkipCheck, any_file_exists, evaluate_skip};
pub use error::{Error, Result};
pub use remote::{Connect, OctocrabConnector, RepoRemote};
pub use sync::{SyncOptions, Synchronizer};
