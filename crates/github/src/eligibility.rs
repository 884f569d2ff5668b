//! Per-repository skip evaluation.
//!
//! Before a workflow file is touched, [`evaluate_skip`] checks, in order:
//!
//! 1. the repository is unowned and deletion is disabled
//! 2. the repository opted out through its skip variable
//! 3. none of the workflow's required files exist
//!
//! The first reason found wins and no further remote call is made.

use tracing::{debug, instrument};
use wfsync_protocol::{RepoConfig, SkipReason, WorkflowKind};

use crate::error::{Error, Result};
use crate::remote::RepoRemote;

/// What to check for one workflow kind.
#[derive(Debug, Clone, Copy)]
pub struct SkipCheck<'a> {
    /// Whether unowned repositories are still processed (to delete files).
    pub process_deletion: bool,
    /// Variable that opts a repository out when set to `"true"`.
    pub skip_variable: Option<&'a str>,
    /// Files of which at least one must exist. Empty means no requirement.
    pub required_files: &'a [&'a str],
}

impl SkipCheck<'static> {
    /// Builds the checks for `kind`.
    #[must_use]
    pub fn for_kind(kind: WorkflowKind, process_deletion: bool) -> Self {
        Self {
            process_deletion,
            skip_variable: Some(kind.skip_variable()),
            required_files: kind.required_files(),
        }
    }
}

/// Decides whether a repository should be skipped.
///
/// Returns `Ok(None)` when the repository should be processed.
///
/// # Errors
///
/// A failed skip variable lookup is returned as is, except for a 404, which
/// means the variable is not set. Callers abort the run on
/// [`Error::Authentication`] and fail only this repository otherwise. File
/// checks never fail: an error counts as "not present".
#[instrument(skip(remote, config, check))]
pub async fn evaluate_skip<R: RepoRemote>(
    remote: &R,
    org: &str,
    repo: &str,
    config: &RepoConfig,
    check: &SkipCheck<'_>,
) -> Result<Option<SkipReason>> {
    if !config.is_owned() && !check.process_deletion {
        return Ok(Some(SkipReason::Unowned));
    }

    if let Some(variable) = check.skip_variable
        && opted_out(remote, org, repo, variable).await?
    {
        return Ok(Some(SkipReason::OptedOut {
            variable: variable.to_string(),
        }));
    }

    if !check.required_files.is_empty()
        && !any_file_exists(remote, org, repo, check.required_files).await
    {
        return Ok(Some(SkipReason::MissingRequiredFiles));
    }

    Ok(None)
}

/// Returns `true` if the variable is set to exactly `"true"`.
async fn opted_out<R: RepoRemote>(remote: &R, org: &str, repo: &str, variable: &str) -> Result<bool> {
    match remote.repo_variable(org, repo, variable).await {
        Ok(value) => Ok(value == "true"),
        Err(Error::NotFound { .. }) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Returns `true` as soon as one of `paths` exists.
pub async fn any_file_exists<R: RepoRemote>(
    remote: &R,
    org: &str,
    repo: &str,
    paths: &[&str],
) -> bool {
    for path in paths {
        match remote.file_exists(org, repo, path).await {
            Ok(true) => return true,
            Ok(false) => {}
            Err(err) => debug!(path, error = %err, "file check failed, treating as absent"),
        }
    }
    false
}
