//! The teams configuration file.
//!
//! The file maps team names to the repositories they own:
//!
//! ```yaml
//! core:
//!   project: 42
//!   owner: alice
//!   repos:
//!     - svc-a
//!     - svc-b
//!   secrets:
//!     workflow-manage: CORE_WORKFLOW_PAT
//!     issue-manage: CORE_ISSUE_PAT
//! ```
//!
//! Team order in the document matters: when two teams claim the same
//! repository, the later one wins. [`TeamsConfig`] therefore keeps the
//! document order instead of collecting into a hash map.
//!
//! # Examples
//!
//! ```
//! use wfsync_config::TeamsConfig;
//!
//! let teams = TeamsConfig::from_yaml_str(
//!     "core:\n  project: 42\n  owner: alice\n  repos: [svc-a]\n",
//! )
//! .unwrap();
//!
//! let core = teams.get("core").unwrap();
//! assert_eq!(core.project.as_deref(), Some("42"));
//! assert!(core.claims("svc-a"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::persistence::read_text_file;

/// One team entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamConfig {
    /// The team name (the key in the YAML document).
    pub name: String,
    /// The team's project board id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// The team's primary code owner login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Repositories owned by the team, in document order.
    pub repos: Vec<String>,
    /// Secret aliases mapped to secret key names.
    pub secrets: BTreeMap<String, String>,
}

impl TeamConfig {
    /// Creates a team with no project, owner, repositories, or secrets.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns `true` if the team lists `repo`.
    #[must_use]
    pub fn claims(&self, repo: &str) -> bool {
        self.position(repo).is_some()
    }

    /// Returns the first index of `repo` in the team's repository list.
    #[must_use]
    pub fn position(&self, repo: &str) -> Option<usize> {
        self.repos.iter().position(|r| r == repo)
    }

    fn validate(&self) -> Result<()> {
        if let Some(i) = self.repos.iter().position(|r| r.trim().is_empty()) {
            return Err(ConfigError::InvalidTeam {
                team: self.name.clone(),
                reason: format!("repository #{i} has an empty name"),
            });
        }
        if let Some(alias) = self
            .secrets
            .iter()
            .find_map(|(alias, key)| key.trim().is_empty().then_some(alias))
        {
            return Err(ConfigError::InvalidTeam {
                team: self.name.clone(),
                reason: format!("secret alias '{alias}' maps to an empty key"),
            });
        }
        Ok(())
    }
}

/// The body of a team entry, before the name is attached.
#[derive(Debug, Default, Deserialize)]
struct TeamBody {
    #[serde(default, deserialize_with = "scalar_string")]
    project: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    owner: Option<String>,
    #[serde(default)]
    repos: Vec<String>,
    #[serde(default)]
    secrets: BTreeMap<String, String>,
}

impl TeamBody {
    fn into_team(self, name: String) -> TeamConfig {
        TeamConfig {
            name,
            project: self.project,
            owner: self.owner,
            repos: self.repos,
            secrets: self.secrets,
        }
    }
}

/// Accepts a string or a number; null and empty strings become `None`.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
            let v = v.trim();
            Ok((!v.is_empty()).then(|| v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

/// All teams, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamsConfig {
    teams: Vec<TeamConfig>,
}

impl TeamsConfig {
    /// Creates a configuration from already-built teams.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTeam`] if a team lists an empty
    /// repository name or maps an alias to an empty key, or if two teams
    /// share a name.
    pub fn new(teams: Vec<TeamConfig>) -> Result<Self> {
        for (i, team) in teams.iter().enumerate() {
            team.validate()?;
            if teams[..i].iter().any(|t| t.name == team.name) {
                return Err(ConfigError::InvalidTeam {
                    team: team.name.clone(),
                    reason: "duplicate team name".to_string(),
                });
            }
        }
        Ok(Self { teams })
    }

    /// Loads the teams configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// contains an invalid team.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_text_file(path)?;
        let parsed: TeamsConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::new(parsed.teams)
    }

    /// Parses the teams configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or contains an
    /// invalid team.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let parsed: TeamsConfig =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
                path: "<inline>".into(),
                source: e,
            })?;
        Self::new(parsed.teams)
    }

    /// Returns the team called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TeamConfig> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Iterates over the teams in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, TeamConfig> {
        self.teams.iter()
    }

    /// Returns the number of teams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Returns `true` if no team is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

impl<'a> IntoIterator for &'a TeamsConfig {
    type Item = &'a TeamConfig;
    type IntoIter = std::slice::Iter<'a, TeamConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.teams.iter()
    }
}

impl<'de> Deserialize<'de> for TeamsConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TeamsVisitor;

        impl<'de> Visitor<'de> for TeamsVisitor {
            type Value = TeamsConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mapping of team names to team entries")
            }

            fn visit_map<M>(self, mut map: M) -> std::result::Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut teams = Vec::new();
                while let Some(name) = map.next_key::<String>()? {
                    // `team:` with no body is an empty team
                    let body: Option<TeamBody> = map.next_value()?;
                    teams.push(body.unwrap_or_default().into_team(name));
                }
                Ok(TeamsConfig { teams })
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(TeamsConfig::default())
            }
        }

        deserializer.deserialize_map(TeamsVisitor)
    }
}
