//! Workflow file synchronization across an organization.
//!
//! [`Synchronizer`] drives one workflow kind over every resolved repository,
//! one repository at a time:
//!
//! 1. evaluate the skip checks with the read-only client
//! 2. render the template, or decide on deletion
//! 3. resolve the repository's `workflow-manage` credential
//! 4. create, update, or delete the file with a client for that credential
//!
//! Per-repository failures are recorded in the [`RunSummary`] and the loop
//! continues. An authentication failure during the skip checks aborts the
//! run, since the read-only token is shared by every repository.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use wfsync_config::SecretStore;
use wfsync_protocol::{
    FailureStage, ResolvedRepo, ResolvedRepos, RunSummary, SkipReason, SyncAction,
    WORKFLOW_MANAGE_ALIAS, WorkflowKind, render_workflow,
};

use crate::cache::CredentialCache;
use crate::client::Capability;
use crate::contents::TextFileWrite;
use crate::eligibility::{SkipCheck, evaluate_skip};
use crate::error::Result;
use crate::remote::{Connect, RepoRemote};

/// Run-wide options.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// The organization that owns every repository.
    pub org: String,
    /// Delete workflow files from repositories that do not qualify.
    pub process_deletion: bool,
    /// Evaluate and render without writing.
    pub dry_run: bool,
    /// Secret key of the read-only token used for skip checks.
    pub read_secret: String,
}

/// Synchronizes workflow files, owning the run's client cache.
///
/// # Examples
///
/// ```no_run
/// use wfsync_config::SecretStore;
/// use wfsync_github::{OctocrabConnector, SyncOptions, Synchronizer};
/// use wfsync_protocol::{ResolvedRepos, WorkflowKind};
///
/// # async fn example(repos: ResolvedRepos, template: String) -> wfsync_github::Result<()> {
/// let secrets = SecretStore::from_json(r#"{"CSPF_REPO_READ_PAT": "ghp_xxx"}"#).unwrap();
/// let options = SyncOptions {
///     org: "acme".to_string(),
///     process_deletion: false,
///     dry_run: true,
///     read_secret: "CSPF_REPO_READ_PAT".to_string(),
/// };
///
/// let mut sync = Synchronizer::new(options, &secrets, OctocrabConnector::default());
/// let summary = sync.sync_workflow(WorkflowKind::Phpcs, &template, &repos).await?;
/// println!("{} changed", summary.changed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Synchronizer<'a, C: Connect> {
    options: SyncOptions,
    secrets: &'a SecretStore,
    clients: CredentialCache<C>,
}

impl<'a, C: Connect> Synchronizer<'a, C> {
    /// Creates a synchronizer that builds clients with `connector`.
    #[must_use]
    pub fn new(options: SyncOptions, secrets: &'a SecretStore, connector: C) -> Self {
        Self {
            options,
            secrets,
            clients: CredentialCache::new(connector),
        }
    }

    /// Returns the run options.
    #[must_use]
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Returns the client cache.
    #[must_use]
    pub fn clients(&self) -> &CredentialCache<C> {
        &self.clients
    }

    /// Returns the read-only client used for skip checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    pub fn read_client(&mut self) -> Result<Arc<C::Client>> {
        let credential = self.secrets.credential(&self.options.read_secret);
        if !credential.is_resolved() {
            warn!(%credential, "read-only token unavailable, skip checks will be rejected");
        }
        self.clients.get(&credential.token(), Capability::ReadOnly)
    }

    /// Synchronizes one workflow kind across `repos`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read-only client cannot be built, or if a
    /// skip variable lookup is rejected for authentication. Every other
    /// failure is recorded in the summary.
    #[instrument(skip(self, template, repos), fields(repos = repos.len()))]
    pub async fn sync_workflow(
        &mut self,
        kind: WorkflowKind,
        template: &str,
        repos: &ResolvedRepos,
    ) -> Result<RunSummary> {
        let read = self.read_client()?;
        let check = SkipCheck::for_kind(kind, self.options.process_deletion);
        let mut summary = RunSummary::new(kind);

        for repo in repos {
            let action = self.sync_repo(read.as_ref(), kind, template, &check, repo).await?;
            log_action(kind, &repo.name, &action);
            summary.record(repo.name.clone(), action);
        }

        info!(
            workflow = %kind,
            changed = summary.changed(),
            skipped = summary.skipped(),
            failed = summary.failures().count(),
            "workflow synchronized"
        );
        Ok(summary)
    }

    async fn sync_repo(
        &mut self,
        read: &C::Client,
        kind: WorkflowKind,
        template: &str,
        check: &SkipCheck<'_>,
        repo: &ResolvedRepo,
    ) -> Result<SyncAction> {
        let org = self.options.org.as_str();

        match evaluate_skip(read, org, &repo.name, &repo.config, check).await {
            Ok(Some(reason)) => return Ok(SyncAction::Skipped { reason }),
            Ok(None) => {}
            Err(err) if err.is_authentication() => {
                error!(repo = %repo.name, error = %err, "read-only token rejected, aborting");
                return Err(err);
            }
            Err(err) => {
                return Ok(SyncAction::Failed {
                    stage: FailureStage::Eligibility,
                    message: err.to_string(),
                });
            }
        }

        let content = render_workflow(kind, template, org, &repo.config);
        if content.is_none() && !self.options.process_deletion {
            return Ok(SyncAction::Skipped {
                reason: SkipReason::NoContent,
            });
        }
        let delete = content.is_none();

        let credential = self.secrets.resolve_alias(&repo.config, WORKFLOW_MANAGE_ALIAS);
        if !credential.is_resolved() {
            warn!(
                repo = %repo.name,
                alias = WORKFLOW_MANAGE_ALIAS,
                %credential,
                "write token unavailable"
            );
        }

        if self.options.dry_run {
            return Ok(SyncAction::WouldWrite { delete });
        }

        let client = match self.clients.get(&credential.token(), Capability::TextFileCrud) {
            Ok(client) => client,
            Err(err) => {
                return Ok(SyncAction::Failed {
                    stage: FailureStage::Credential,
                    message: err.to_string(),
                });
            }
        };

        let path = kind.destination();
        let message = if delete {
            format!("Deleting {path}")
        } else {
            format!("Creating/Updating {path}")
        };
        let write = TextFileWrite {
            owner: org,
            repo: &repo.name,
            path,
            content: content.as_deref(),
            message: &message,
        };

        match client.write_text_file(&write).await {
            Ok(outcome) => Ok(SyncAction::Written { outcome }),
            Err(err) => Ok(SyncAction::Failed {
                stage: FailureStage::Write,
                message: err.to_string(),
            }),
        }
    }
}

/// Emits the per-repository log line.
fn log_action(kind: WorkflowKind, repo: &str, action: &SyncAction) {
    match action {
        SyncAction::Failed { message, .. } => {
            error!(workflow = %kind, repo, error = %message, "{action}");
        }
        _ => info!(workflow = %kind, repo, "{action}"),
    }
}
