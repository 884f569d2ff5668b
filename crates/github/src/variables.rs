//! Repository Actions variables.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::GitHubClient;
use crate::error::Result;

/// A repository variable as returned by the API.
#[derive(Debug, Clone, Deserialize)]
struct Variable {
    value: String,
}

impl GitHubClient {
    /// Reads a repository-level Actions variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the variable is
    /// not defined, and [`Error::Authentication`](crate::Error::Authentication)
    /// if the token cannot read it.
    #[instrument(skip(self))]
    pub async fn repo_variable(&self, owner: &str, repo: &str, name: &str) -> Result<String> {
        let url = format!("/repos/{owner}/{repo}/actions/variables/{name}");
        let variable: Variable = self.inner().get(&url, None::<&()>).await?;
        debug!("read variable");
        Ok(variable.value)
    }
}
