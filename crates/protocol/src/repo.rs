//! Repository types shared by the resolver and the sync executor.
//!
//! - [`RepoRecord`]: a repository as listed by the GitHub organization API
//! - [`RepoConfig`]: the ownership data resolved for one repository
//! - [`ResolvedRepos`]: every eligible repository with its [`RepoConfig`], in
//!   listing order

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A repository as returned by `GET /orgs/{org}/repos`.
///
/// Only the fields needed to decide eligibility are kept; everything else in
/// the API payload is ignored.
///
/// # Examples
///
/// ```
/// use wfsync_protocol::RepoRecord;
///
/// let json = r#"{"name": "svc-a", "archived": false, "disabled": false, "fork": false, "private": true}"#;
/// let record: RepoRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.name, "svc-a");
/// assert!(record.is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    /// The repository name, without the organization prefix.
    pub name: String,
    /// Whether the repository is archived (read-only).
    #[serde(default)]
    pub archived: bool,
    /// Whether the repository has been disabled by GitHub.
    #[serde(default)]
    pub disabled: bool,
    /// Whether the repository is a fork.
    #[serde(default, rename = "fork")]
    pub is_fork: bool,
}

impl RepoRecord {
    /// Creates an active (not archived, not disabled, not a fork) record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            archived: false,
            disabled: false,
            is_fork: false,
        }
    }

    /// Returns `true` if the repository takes part in synchronization.
    ///
    /// Archived, disabled, and forked repositories never do.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.archived && !self.disabled && !self.is_fork
    }
}

/// Ownership data resolved for a single repository.
///
/// A repository claimed by no team resolves to the default value: no
/// project, no owner, no secrets.
///
/// # Examples
///
/// ```
/// use wfsync_protocol::RepoConfig;
///
/// let config = RepoConfig::default();
/// assert!(!config.is_owned());
///
/// let config = RepoConfig::new(Some("42"), Some("alice"))
///     .with_secret("workflow-manage", "CORE_WORKFLOW_PAT");
/// assert!(config.is_owned());
/// assert_eq!(config.secret_key("workflow-manage"), Some("CORE_WORKFLOW_PAT"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// The project board id of the owning team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// The login of the owning team's primary code owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Secret aliases (e.g. `workflow-manage`) mapped to secret key names.
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
}

impl RepoConfig {
    /// Creates a config with the given project and owner and no secrets.
    ///
    /// Empty strings are treated as absent.
    #[must_use]
    pub fn new(project: Option<&str>, owner: Option<&str>) -> Self {
        Self {
            project: non_empty(project),
            owner: non_empty(owner),
            secrets: BTreeMap::new(),
        }
    }

    /// Adds a secret alias mapping.
    #[must_use]
    pub fn with_secret(mut self, alias: impl Into<String>, key: impl Into<String>) -> Self {
        self.secrets.insert(alias.into(), key.into());
        self
    }

    /// Returns `true` if a team with a primary code owner claims the repository.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    /// Returns the secret key name mapped to `alias`, if any.
    #[must_use]
    pub fn secret_key(&self, alias: &str) -> Option<&str> {
        self.secrets.get(alias).map(String::as_str)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// A repository name paired with its resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRepo {
    /// The repository name.
    pub name: String,
    /// The resolved configuration.
    pub config: RepoConfig,
}

/// Every eligible repository with its resolved configuration.
///
/// Iteration follows insertion order, which is the organization listing
/// order. Inserting a name twice keeps the first entry.
#[derive(Debug, Clone, Default)]
pub struct ResolvedRepos {
    entries: Vec<ResolvedRepo>,
    index: HashMap<String, usize>,
}

impl ResolvedRepos {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a repository. Returns `false` if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>, config: RepoConfig) -> bool {
        let name = name.into();
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(ResolvedRepo { name, config });
        true
    }

    /// Returns the configuration of `name`, if it was resolved.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RepoConfig> {
        self.index.get(name).map(|&i| &self.entries[i].config)
    }

    /// Returns `true` if `name` was resolved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates over the repositories in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedRepo> {
        self.entries.iter()
    }

    /// Returns the number of repositories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no repository was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedRepos {
    type Item = &'a ResolvedRepo;
    type IntoIter = std::slice::Iter<'a, ResolvedRepo>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
