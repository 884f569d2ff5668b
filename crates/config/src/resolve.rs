//! Resolution of repository ownership from the teams configuration.
//!
//! For every active repository in the organization, [`resolve_repos`] finds
//! the team that owns it and builds its [`RepoConfig`]:
//!
//! - Teams are scanned in document order and the **last** team listing the
//!   repository wins. Configs are not merged.
//! - A repository listed by no team gets an empty config.
//! - Secret keys are sharded: one token can only address
//!   [`PAT_SHARD_SIZE`] repositories, so the key of a repository at index
//!   `i >= 50` in its team's list gets a `_<i / 50>` suffix.
//!
//! # Examples
//!
//! ```
//! use wfsync_config::{TeamsConfig, resolve_repos};
//! use wfsync_protocol::RepoRecord;
//!
//! let teams = TeamsConfig::from_yaml_str(
//!     "core:\n  project: 42\n  owner: alice\n  repos: [svc-a]\n",
//! )
//! .unwrap();
//! let records = [RepoRecord::new("svc-a"), RepoRecord::new("svc-b")];
//!
//! let repos = resolve_repos(&teams, &records);
//! assert_eq!(repos.get("svc-a").unwrap().owner.as_deref(), Some("alice"));
//! assert!(!repos.get("svc-b").unwrap().is_owned());
//! ```

use tracing::debug;
use wfsync_protocol::{RepoConfig, RepoRecord, ResolvedRepos};

use crate::teams::{TeamConfig, TeamsConfig};

/// Maximum number of repositories a single token is issued for.
pub const PAT_SHARD_SIZE: usize = 50;

/// Returns the shard of the repository at `index` in its team's list.
#[must_use]
pub const fn shard_number(index: usize) -> usize {
    index / PAT_SHARD_SIZE
}

/// Returns the secret key name to use for the repository at `index`.
///
/// # Examples
///
/// ```
/// use wfsync_config::shard_key;
///
/// assert_eq!(shard_key("CORE_PAT", 49), "CORE_PAT");
/// assert_eq!(shard_key("CORE_PAT", 50), "CORE_PAT_1");
/// assert_eq!(shard_key("CORE_PAT", 149), "CORE_PAT_2");
/// ```
#[must_use]
pub fn shard_key(key: &str, index: usize) -> String {
    match shard_number(index) {
        0 => key.to_string(),
        shard => format!("{key}_{shard}"),
    }
}

/// Builds the config of the repository at `index` in `team`'s list.
///
/// The team is left untouched; sharded keys live in the returned copy only.
#[must_use]
pub fn team_repo_config(team: &TeamConfig, index: usize) -> RepoConfig {
    RepoConfig {
        project: team.project.clone(),
        owner: team.owner.clone(),
        secrets: team
            .secrets
            .iter()
            .map(|(alias, key)| (alias.clone(), shard_key(key, index)))
            .collect(),
    }
}

/// Resolves the config of a single repository.
#[must_use]
pub fn resolve_repo(teams: &TeamsConfig, repo: &str) -> RepoConfig {
    let mut owner: Option<(&TeamConfig, usize)> = None;
    for team in teams {
        if let Some(index) = team.position(repo) {
            if let Some((previous, _)) = owner {
                debug!(
                    repo,
                    previous = %previous.name,
                    team = %team.name,
                    "repository claimed by several teams, last one wins"
                );
            }
            owner = Some((team, index));
        }
    }

    owner
        .map(|(team, index)| team_repo_config(team, index))
        .unwrap_or_default()
}

/// Resolves every active repository of the organization listing.
///
/// Archived, disabled, and forked repositories are dropped. The result keeps
/// the listing order.
#[must_use]
pub fn resolve_repos<'a>(
    teams: &TeamsConfig,
    records: impl IntoIterator<Item = &'a RepoRecord>,
) -> ResolvedRepos {
    let mut resolved = ResolvedRepos::new();
    for record in records {
        if !record.is_active() {
            debug!(repo = %record.name, "ignoring archived, disabled, or forked repository");
            continue;
        }
        resolved.insert(record.name.clone(), resolve_repo(teams, &record.name));
    }
    debug!(count = resolved.len(), "resolved repositories");
    resolved
}
