//! Placeholder substitution for workflow templates.
//!
//! Templates are plain workflow files containing `{{{NAME}}}` tokens. The
//! recognized tokens are listed in [`Placeholder`]; anything else between
//! triple braces is left untouched. Substitution is a single left-to-right
//! pass, so substituted values are never re-scanned for tokens.
//!
//! # Examples
//!
//! ```
//! use wfsync_protocol::{RepoConfig, WorkflowKind, render_workflow};
//!
//! let template = "project: {{{PROJECT_ID}}}\nowner: {{{PRIMARY_CODEOWNER}}}\n";
//! let config = RepoConfig::new(Some("42"), Some("alice"));
//!
//! let rendered = render_workflow(WorkflowKind::ProjectAutomation, template, "acme", &config);
//! assert_eq!(rendered.as_deref(), Some("project: 42\nowner: \"@alice\"\n"));
//!
//! // No project configured: nothing to write, the file should go away.
//! let unowned = render_workflow(WorkflowKind::ProjectAutomation, template, "acme", &Default::default());
//! assert!(unowned.is_none());
//! ```

use crate::repo::RepoConfig;
use crate::workflow::{ISSUE_MANAGE_ALIAS, WorkflowKind};

const OPEN: &str = "{{{";
const CLOSE: &str = "}}}";

/// A token recognized in workflow templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `{{{PROJECT_ORG}}}`: the organization name.
    ProjectOrg,
    /// `{{{PROJECT_ID}}}`: the owning team's project id.
    ProjectId,
    /// `{{{PRIMARY_CODEOWNER}}}`: `"@owner"`, quoted for YAML.
    PrimaryCodeowner,
    /// `{{{ISSUE_MANAGE_PAT}}}`: the name of the secret holding the
    /// issue-management token.
    IssueManagePat,
}

impl Placeholder {
    /// Every recognized placeholder.
    pub const ALL: [Placeholder; 4] = [
        Self::ProjectOrg,
        Self::ProjectId,
        Self::PrimaryCodeowner,
        Self::IssueManagePat,
    ];

    /// Returns the name between the braces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProjectOrg => "PROJECT_ORG",
            Self::ProjectId => "PROJECT_ID",
            Self::PrimaryCodeowner => "PRIMARY_CODEOWNER",
            Self::IssueManagePat => "ISSUE_MANAGE_PAT",
        }
    }

    /// Returns the full token, braces included.
    #[must_use]
    pub fn token(self) -> String {
        format!("{OPEN}{}{CLOSE}", self.name())
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Values substituted for each [`Placeholder`].
///
/// Missing values render as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderValues {
    /// Value for [`Placeholder::ProjectOrg`].
    pub org: String,
    /// Value for [`Placeholder::ProjectId`].
    pub project: Option<String>,
    /// Value for [`Placeholder::PrimaryCodeowner`], without the `@` and quotes.
    pub owner: Option<String>,
    /// Value for [`Placeholder::IssueManagePat`].
    pub issue_manage_secret: Option<String>,
}

impl RenderValues {
    /// Collects the values for a repository.
    ///
    /// The issue-management entry is the secret key name, never the secret
    /// itself: the generated workflow reads it through `${{ secrets.* }}`.
    #[must_use]
    pub fn for_repo(org: &str, config: &RepoConfig) -> Self {
        Self {
            org: org.to_string(),
            project: config.project.clone(),
            owner: config.owner.clone(),
            issue_manage_secret: config.secret_key(ISSUE_MANAGE_ALIAS).map(str::to_string),
        }
    }

    fn value(&self, placeholder: Placeholder) -> String {
        match placeholder {
            Placeholder::ProjectOrg => self.org.clone(),
            Placeholder::ProjectId => self.project.clone().unwrap_or_default(),
            Placeholder::PrimaryCodeowner => {
                format!("\"@{}\"", self.owner.as_deref().unwrap_or_default())
            }
            Placeholder::IssueManagePat => self.issue_manage_secret.clone().unwrap_or_default(),
        }
    }
}

/// Replaces every recognized token in `template`.
#[must_use]
pub fn render(template: &str, values: &RenderValues) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        let Some(end) = after.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        match Placeholder::from_name(&after[..end]) {
            Some(placeholder) => {
                out.push_str(&values.value(placeholder));
                rest = &after[end + CLOSE.len()..];
            }
            None => {
                // Not a token here; retry one brace further so `{{{{ID}}}}`
                // still matches the inner token.
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Renders the workflow of `kind` for one repository.
///
/// Returns `None` when the repository does not qualify for the workflow
/// (see [`WorkflowKind::qualifies`]), meaning the file should not exist.
#[must_use]
pub fn render_workflow(
    kind: WorkflowKind,
    template: &str,
    org: &str,
    config: &RepoConfig,
) -> Option<String> {
    if !kind.qualifies(config) {
        return None;
    }
    Some(render(template, &RenderValues::for_repo(org, config)))
}
