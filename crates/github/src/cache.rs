//! Client handle cache.
//!
//! Building an authenticated client is not free, and a run touches the same
//! token for many repositories. [`CredentialCache`] memoizes client handles
//! keyed by `(token, capability)` for the lifetime of a run. There is no
//! eviction.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use secrecy::SecretString;
//! use wfsync_github::{Capability, CredentialCache, OctocrabConnector};
//!
//! # fn example() -> wfsync_github::Result<()> {
//! let mut cache = CredentialCache::new(OctocrabConnector::default());
//! let token = SecretString::from("ghp_xxx".to_string());
//!
//! let first = cache.get(&token, Capability::TextFileCrud)?;
//! let second = cache.get(&token, Capability::TextFileCrud)?;
//! assert!(Arc::ptr_eq(&first, &second));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::client::Capability;
use crate::error::Result;
use crate::remote::Connect;

/// Cache key. Holds the raw token, so it is never printed.
#[derive(PartialEq, Eq, Hash)]
struct HandleKey {
    token: String,
    capability: Capability,
}

/// Lookup-or-create cache of client handles.
pub struct CredentialCache<C: Connect> {
    connector: C,
    handles: HashMap<HandleKey, Arc<C::Client>>,
}

impl<C: Connect> CredentialCache<C> {
    /// Creates an empty cache that builds clients with `connector`.
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            handles: HashMap::new(),
        }
    }

    /// Returns the client for `token` and `capability`, creating it on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector fails to build a new client.
    #[instrument(skip(self, token))]
    pub fn get(&mut self, token: &SecretString, capability: Capability) -> Result<Arc<C::Client>> {
        let key = HandleKey {
            token: token.expose_secret().to_string(),
            capability,
        };
        if let Some(handle) = self.handles.get(&key) {
            return Ok(Arc::clone(handle));
        }

        debug!("creating client handle");
        let handle = Arc::new(self.connector.connect(token, capability)?);
        self.handles.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// Returns the number of cached handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if no handle has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns the connector.
    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }
}

impl<C: Connect> fmt::Debug for CredentialCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCache")
            .field("handles", &self.handles.len())
            .finish_non_exhaustive()
    }
}
