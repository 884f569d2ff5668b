//! Workspace file layout and file reading.
//!
//! A run reads two kinds of files from the checked-out workspace:
//!
//! - the teams configuration, `defs/teams-config.yml` by default
//! - one workflow template per kind, under `.github/workflow-templates/`
//!
//! # Examples
//!
//! ```
//! use wfsync_config::Workspace;
//! use wfsync_protocol::WorkflowKind;
//!
//! let workspace = Workspace::new("/checkout");
//! assert!(workspace.teams_config_path().ends_with("defs/teams-config.yml"));
//! assert!(workspace
//!     .template_path(WorkflowKind::Phpcs)
//!     .ends_with(".github/workflow-templates/phpcs.yml"));
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;
use wfsync_protocol::WorkflowKind;

use crate::error::{ConfigError, Result};

/// Default teams configuration path, relative to the workspace root.
pub const DEFAULT_TEAMS_CONFIG: &str = "defs/teams-config.yml";

/// The checked-out repository holding the teams file and the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    teams_config: PathBuf,
}

impl Workspace {
    /// Creates a workspace rooted at `root` with the default teams file.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let teams_config = root.join(DEFAULT_TEAMS_CONFIG);
        Self { root, teams_config }
    }

    /// Overrides the teams configuration path.
    ///
    /// Relative paths are resolved against the workspace root.
    #[must_use]
    pub fn with_teams_config(mut self, path: impl AsRef<Path>) -> Self {
        self.teams_config = self.root.join(path);
        self
    }

    /// Returns the workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the teams configuration path.
    #[must_use]
    pub fn teams_config_path(&self) -> &Path {
        &self.teams_config
    }

    /// Returns the template path of `kind`.
    #[must_use]
    pub fn template_path(&self, kind: WorkflowKind) -> PathBuf {
        self.root.join(kind.template_path())
    }

    /// Reads the template of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] if the template cannot be read.
    pub fn read_template(&self, kind: WorkflowKind) -> Result<String> {
        read_text_file(self.template_path(kind))
    }
}

/// Reads a UTF-8 text file.
///
/// # Errors
///
/// Returns [`ConfigError::ReadFile`] if the file cannot be read.
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    debug!(?path, "reading file");
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}
