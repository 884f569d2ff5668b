//! Shared protocol types for wfsync.
//!
//! This crate defines the types passed between the configuration resolver,
//! the GitHub layer, and the binary.
//!
//! # Overview
//!
//! - [`repo`]: repositories as listed by GitHub and their resolved ownership
//! - [`workflow`]: the workflow kinds wfsync manages
//! - [`template`]: placeholder substitution in workflow templates
//! - [`outcome`]: per-repository actions and the run summary
//! - [`error`]: error types for protocol operations
//!
//! # Examples
//!
//! ```
//! use wfsync_protocol::{RepoConfig, ResolvedRepos, WorkflowKind, render_workflow};
//!
//! let mut repos = ResolvedRepos::new();
//! repos.insert("svc-a", RepoConfig::new(Some("42"), Some("alice")));
//!
//! for repo in &repos {
//!     let content = render_workflow(
//!         WorkflowKind::ProjectAutomation,
//!         "project: {{{PROJECT_ID}}}",
//!         "acme",
//!         &repo.config,
//!     );
//!     assert_eq!(content.as_deref(), Some("project: 42"));
//! }
//! ```

pub mod error;
pub mod outcome;
pub mod repo;
pub mod template;
pub mod workflow;

// Re-export primary types at crate root for convenience
pub use error::{ProtocolError, Result};
pub use outcome::{FailureStage, RepoOutcome, RunSummary, SkipReason, SyncAction, WriteOutcome};
pub use repo::{RepoConfig, RepoRecord, ResolvedRepo, ResolvedRepos};
pub use template::{Placeholder, RenderValues, render, render_workflow};
pub use workflow::{ISSUE_MANAGE_ALIAS, WORKFLOW_MANAGE_ALIAS, WorkflowKind};
