//! Configuration for wfsync.
//!
//! This crate turns the run's inputs into the data the sync executor works
//! on: who owns which repository, and which secret authorizes what.
//!
//! # Overview
//!
//! - [`teams`]: the teams YAML file, kept in document order
//! - [`resolve`]: per-repository ownership with last-write-wins and token
//!   sharding
//! - [`secrets`]: the secret store and alias → key → value resolution
//! - [`inputs`]: normalization of stringly-typed action inputs
//! - [`persistence`]: workspace layout and file reading
//! - [`error`]: error types for configuration operations
//!
//! # Examples
//!
//! ```no_run
//! use wfsync_config::{SecretStore, TeamsConfig, Workspace, resolve_repos};
//! use wfsync_protocol::{RepoRecord, WORKFLOW_MANAGE_ALIAS};
//!
//! # fn example() -> wfsync_config::Result<()> {
//! let workspace = Workspace::new(".");
//! let teams = TeamsConfig::load_from(workspace.teams_config_path())?;
//! let secrets = SecretStore::from_json(r#"{"CORE_PAT": "ghp_xxx"}"#)?;
//!
//! let repos = resolve_repos(&teams, &[RepoRecord::new("svc-a")]);
//! for repo in &repos {
//!     let credential = secrets.resolve_alias(&repo.config, WORKFLOW_MANAGE_ALIAS);
//!     println!("{}: {credential}", repo.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod inputs;
pub mod persistence;
pub mod resolve;
pub mod secrets;
pub mod teams;

// Re-export primary types at crate root for convenience
pub use error::{ConfigError, Result};
pub use inputs::{parse_flag, parse_kinds};
pub use persistence::Workspace;
pub use resolve::{PAT_SHARD_SIZE, resolve_repo, resolve_repos, shard_key};
pub use secrets::{Credential, SecretStore};
pub use teams::{TeamConfig, TeamsConfig};
