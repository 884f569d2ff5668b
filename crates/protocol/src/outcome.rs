//! Per-repository sync outcomes and the run summary.
//!
//! Every repository visited during a run ends up with exactly one
//! [`SyncAction`]. The [`Display`](std::fmt::Display) form of an action is the
//! classification written to the log: `create/update`, `delete`,
//! `skip(<reason>)`, or `failed(<stage>)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflow::WorkflowKind;

/// What the remote text-file write actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// The file did not exist and was created.
    Created,
    /// The file existed with different content and was replaced.
    Updated,
    /// The file already had the rendered content; no commit was made.
    Unchanged,
    /// The file existed and was deleted.
    Deleted,
    /// Deletion was requested but the file did not exist.
    AlreadyAbsent,
}

impl WriteOutcome {
    /// Returns `true` if a commit was pushed to the repository.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Deleted)
    }
}

/// Why a repository was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum SkipReason {
    /// No team owns the repository and deletion is disabled.
    Unowned,
    /// The repository opted out through a variable set to `"true"`.
    OptedOut {
        /// The variable name.
        variable: String,
    },
    /// None of the files the workflow needs exist in the repository.
    MissingRequiredFiles,
    /// The repository does not qualify for the workflow and deletion is
    /// disabled.
    NoContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unowned => f.write_str("unowned"),
            Self::OptedOut { variable } => write!(f, "opted out via {variable}"),
            Self::MissingRequiredFiles => f.write_str("missing required files"),
            Self::NoContent => f.write_str("no content, deletion disabled"),
        }
    }
}

/// The stage at which a repository failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Looking up the skip variable failed.
    Eligibility,
    /// Building the write client failed.
    Credential,
    /// The remote write failed.
    Write,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eligibility => "eligibility",
            Self::Credential => "credential",
            Self::Write => "write",
        })
    }
}

/// The action taken for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum SyncAction {
    /// The file was written (or found already up to date).
    Written {
        /// What the write did.
        outcome: WriteOutcome,
    },
    /// Dry run: the file would have been written or deleted.
    WouldWrite {
        /// `true` if the file would have been deleted.
        delete: bool,
    },
    /// The repository was skipped.
    Skipped {
        /// Why.
        reason: SkipReason,
    },
    /// Processing the repository failed.
    Failed {
        /// Where it failed.
        stage: FailureStage,
        /// The error message.
        message: String,
    },
}

impl SyncAction {
    /// Returns `true` for [`SyncAction::Failed`].
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns `true` for [`SyncAction::Skipped`].
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written {
                outcome: WriteOutcome::Deleted | WriteOutcome::AlreadyAbsent,
            }
            | Self::WouldWrite { delete: true } => f.write_str("delete"),
            Self::Written { .. } | Self::WouldWrite { delete: false } => {
                f.write_str("create/update")
            }
            Self::Skipped { reason } => write!(f, "skip({reason})"),
            Self::Failed { stage, .. } => write!(f, "failed({stage})"),
        }
    }
}

/// The outcome of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOutcome {
    /// The repository name.
    pub repo: String,
    /// What happened.
    pub action: SyncAction,
}

/// Outcomes of one workflow kind across the organization.
///
/// # Examples
///
/// ```
/// use wfsync_protocol::{RunSummary, SkipReason, SyncAction, WorkflowKind, WriteOutcome};
///
/// let mut summary = RunSummary::new(WorkflowKind::Phpcs);
/// summary.record("svc-a", SyncAction::Written { outcome: WriteOutcome::Created });
/// summary.record("svc-b", SyncAction::Skipped { reason: SkipReason::Unowned });
///
/// assert!(!summary.has_failures());
/// assert_eq!(summary.changed(), 1);
/// assert_eq!(summary.skipped(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// The workflow kind that was synchronized.
    pub kind: WorkflowKind,
    /// One entry per visited repository, in visiting order.
    pub outcomes: Vec<RepoOutcome>,
}

impl RunSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new(kind: WorkflowKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
        }
    }

    /// Appends the outcome of a repository.
    pub fn record(&mut self, repo: impl Into<String>, action: SyncAction) {
        self.outcomes.push(RepoOutcome {
            repo: repo.into(),
            action,
        });
    }

    /// Returns the action recorded for `repo`.
    #[must_use]
    pub fn action_for(&self, repo: &str) -> Option<&SyncAction> {
        self.outcomes
            .iter()
            .find(|o| o.repo == repo)
            .map(|o| &o.action)
    }

    /// Returns `true` if any repository failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.action.is_failure())
    }

    /// Returns the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &RepoOutcome> {
        self.outcomes.iter().filter(|o| o.action.is_failure())
    }

    /// Number of repositories that received a commit.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.action, SyncAction::Written { outcome } if outcome.changed()))
            .count()
    }

    /// Number of skipped repositories.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.action.is_skip()).count()
    }
}
