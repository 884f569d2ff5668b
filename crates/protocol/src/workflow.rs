//! Workflow kinds that wfsync knows how to synchronize.
//!
//! Each [`WorkflowKind`] carries its own template location, destination path,
//! opt-out variable, and the files a repository must contain for the workflow
//! to make sense there:
//!
//! | Kind | Destination | Skip variable | Requires any of |
//! |------|-------------|---------------|-----------------|
//! | `project-automation` | `.github/workflows/project-automation.yml` | `WFSYNC_SKIP_PROJECT_AUTOMATION` | - |
//! | `phpcs` | `.github/workflows/phpcs.yml` | `WFSYNC_SKIP_PHPCS` | a PHPCS ruleset |
//! | `phpunit` | `.github/workflows/phpunit.yml` | `WFSYNC_SKIP_PHPUNIT` | a PHPUnit config |
//!
//! # Examples
//!
//! ```
//! use wfsync_protocol::WorkflowKind;
//!
//! let kind: WorkflowKind = "phpcs".parse().unwrap();
//! assert_eq!(kind.destination(), ".github/workflows/phpcs.yml");
//! assert!(kind.required_files().contains(&"phpcs.xml.dist"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::repo::RepoConfig;

/// Secret alias whose key authorizes writes to workflow files.
pub const WORKFLOW_MANAGE_ALIAS: &str = "workflow-manage";

/// Secret alias whose key name is injected into the project automation template.
pub const ISSUE_MANAGE_ALIAS: &str = "issue-manage";

/// Directory, relative to the workspace, holding the workflow templates.
pub const TEMPLATE_DIR: &str = ".github/workflow-templates";

/// A workflow file managed across the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowKind {
    /// Moves issues and pull requests onto the owning team's project board.
    ProjectAutomation,
    /// Runs PHP_CodeSniffer.
    Phpcs,
    /// Runs PHPUnit.
    Phpunit,
}

impl WorkflowKind {
    /// Every kind, in the order they are documented.
    pub const ALL: [WorkflowKind; 3] = [Self::ProjectAutomation, Self::Phpcs, Self::Phpunit];

    /// Returns the kebab-case name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProjectAutomation => "project-automation",
            Self::Phpcs => "phpcs",
            Self::Phpunit => "phpunit",
        }
    }

    /// Returns the file name shared by the template and the destination.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::ProjectAutomation => "project-automation.yml",
            Self::Phpcs => "phpcs.yml",
            Self::Phpunit => "phpunit.yml",
        }
    }

    /// Returns the template path relative to the workspace root.
    #[must_use]
    pub fn template_path(self) -> String {
        format!("{TEMPLATE_DIR}/{}", self.file_name())
    }

    /// Returns the path of the generated file inside each repository.
    #[must_use]
    pub const fn destination(self) -> &'static str {
        match self {
            Self::ProjectAutomation => ".github/workflows/project-automation.yml",
            Self::Phpcs => ".github/workflows/phpcs.yml",
            Self::Phpunit => ".github/workflows/phpunit.yml",
        }
    }

    /// Returns the repository variable that opts a repository out when set
    /// to `"true"`.
    #[must_use]
    pub const fn skip_variable(self) -> &'static str {
        match self {
            Self::ProjectAutomation => "WFSYNC_SKIP_PROJECT_AUTOMATION",
            Self::Phpcs => "WFSYNC_SKIP_PHPCS",
            Self::Phpunit => "WFSYNC_SKIP_PHPUNIT",
        }
    }

    /// Returns the files of which at least one must exist in a repository.
    ///
    /// An empty slice means the workflow has no file requirement.
    #[must_use]
    pub const fn required_files(self) -> &'static [&'static str] {
        match self {
            Self::ProjectAutomation => &[],
            Self::Phpcs => &[
                "phpcs.xml",
                "phpcs.xml.dist",
                ".phpcs.xml.dist",
                "phpcs.ruleset.xml",
            ],
            Self::Phpunit => &["phpunit.xml", "phpunit.xml.dist", ".phpunit.xml.dist"],
        }
    }

    /// Returns `true` if the repository configuration calls for this workflow.
    ///
    /// Project automation needs a project board; the lint and test workflows
    /// only need an owning team.
    #[must_use]
    pub fn qualifies(self, config: &RepoConfig) -> bool {
        match self {
            Self::ProjectAutomation => config.project.is_some(),
            Self::Phpcs | Self::Phpunit => config.owner.is_some(),
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkflowKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == trimmed)
            .ok_or_else(|| ProtocolError::UnknownWorkflowKind(s.to_string()))
    }
}
