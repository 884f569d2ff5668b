//! Secret lookup through alias and key indirection.
//!
//! Tokens are reached in two steps:
//!
//! 1. A repository's [`RepoConfig`] maps a semantic alias (such as
//!    `workflow-manage`) to a secret key name.
//! 2. The [`SecretStore`], parsed from the `secrets` input, maps the key name
//!    to the token value.
//!
//! Either step may fail. The failure is kept as a distinct [`Credential`]
//! variant instead of collapsing into an empty string, so callers can report
//! exactly what is misconfigured. A failed lookup still yields a token
//! ([`Credential::token`]) that carries no permission: it is empty, and the
//! GitHub API rejects it rather than treating the call as anonymous.

use std::collections::HashMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use wfsync_protocol::RepoConfig;

use crate::error::{ConfigError, Result};

/// Secret values keyed by secret name.
///
/// Values are held as [`SecretString`] and never appear in debug output.
#[derive(Default)]
pub struct SecretStore {
    values: HashMap<String, SecretString>,
}

impl SecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the JSON object passed as the `secrets` input.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseSecrets`] if the input is not a JSON object
    /// of strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use wfsync_config::SecretStore;
    ///
    /// let store = SecretStore::from_json(r#"{"CORE_PAT": "ghp_xxx"}"#).unwrap();
    /// assert!(store.contains("CORE_PAT"));
    /// assert!(SecretStore::from_json("[1, 2]").is_err());
    /// ```
    pub fn from_json(input: &str) -> Result<Self> {
        let raw: HashMap<String, String> =
            serde_json::from_str(input).map_err(ConfigError::ParseSecrets)?;
        Ok(raw.into_iter().collect())
    }

    /// Adds or replaces a secret.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        self.values.insert(key.into(), SecretString::from(value));
    }

    /// Returns `true` if a secret named `key` exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of secrets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the store holds no secret.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolves a secret key name to a credential.
    #[must_use]
    pub fn credential(&self, key: &str) -> Credential {
        match self.values.get(key) {
            Some(value) if value.expose_secret().is_empty() => Credential::Empty {
                key: key.to_string(),
            },
            Some(value) => Credential::Resolved {
                key: key.to_string(),
                token: value.clone(),
            },
            None => Credential::MissingKey {
                key: key.to_string(),
            },
        }
    }

    /// Resolves a repository's secret alias to a credential.
    ///
    /// # Examples
    ///
    /// ```
    /// use wfsync_config::{Credential, SecretStore};
    /// use wfsync_protocol::RepoConfig;
    ///
    /// let mut store = SecretStore::new();
    /// store.insert("CORE_PAT", "ghp_xxx");
    ///
    /// let config = RepoConfig::default().with_secret("workflow-manage", "CORE_PAT");
    /// assert!(store.resolve_alias(&config, "workflow-manage").is_resolved());
    ///
    /// let missing = store.resolve_alias(&config, "issue-manage");
    /// assert!(matches!(missing, Credential::MissingAlias { .. }));
    /// ```
    #[must_use]
    pub fn resolve_alias(&self, config: &RepoConfig, alias: &str) -> Credential {
        match config.secret_key(alias) {
            Some(key) => self.credential(key),
            None => Credential::MissingAlias {
                alias: alias.to_string(),
            },
        }
    }
}

impl fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("SecretStore").field("keys", &keys).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SecretStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            store.insert(key, value);
        }
        store
    }
}

/// The result of resolving a secret.
#[derive(Debug, Clone)]
pub enum Credential {
    /// The secret exists and is non-empty.
    Resolved {
        /// The secret key name.
        key: String,
        /// The secret value.
        token: SecretString,
    },
    /// The secret exists but its value is empty.
    Empty {
        /// The secret key name.
        key: String,
    },
    /// No secret with this key name exists.
    MissingKey {
        /// The secret key name.
        key: String,
    },
    /// The repository has no key for this alias.
    MissingAlias {
        /// The alias that was looked up.
        alias: String,
    },
}

impl Credential {
    /// Returns `true` if a usable token was found.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Returns the token to authenticate with.
    ///
    /// Unresolved credentials yield an empty token, which the API rejects.
    #[must_use]
    pub fn token(&self) -> SecretString {
        match self {
            Self::Resolved { token, .. } => token.clone(),
            _ => SecretString::from(String::new()),
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { key, .. } => write!(f, "secret '{key}'"),
            Self::Empty { key } => write!(f, "secret '{key}' is empty"),
            Self::MissingKey { key } => write!(f, "secret '{key}' is not defined"),
            Self::MissingAlias { alias } => write!(f, "no secret configured for alias '{alias}'"),
        }
    }
}
