//! Organization repository listing.

use tracing::{debug, instrument};
use wfsync_protocol::RepoRecord;

use crate::client::GitHubClient;
use crate::error::Result;

/// Page size requested from the listing endpoint.
const PER_PAGE: usize = 100;

impl GitHubClient {
    /// Lists every repository of an organization.
    ///
    /// Pages are fetched until a short page is returned. Archived, disabled,
    /// and forked repositories are included; filtering is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fails to load.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use secrecy::SecretString;
    /// use wfsync_github::{Capability, GitHubClient};
    ///
    /// # async fn example() -> wfsync_github::Result<()> {
    /// let token = SecretString::from("ghp_xxx".to_string());
    /// let client = GitHubClient::new(&token, Capability::ReadOnly, None)?;
    ///
    /// for repo in client.list_org_repos("acme").await? {
    ///     println!("{} (active: {})", repo.name, repo.is_active());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn list_org_repos(&self, org: &str) -> Result<Vec<RepoRecord>> {
        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!("/orgs/{org}/repos?per_page={PER_PAGE}&page={page}");
            let batch: Vec<RepoRecord> = self.inner().get(&url, None::<&()>).await?;
            let len = batch.len();
            debug!(page, count = len, "listed repositories page");
            repos.extend(batch);

            if len < PER_PAGE {
                break;
            }
            page += 1;
        }

        debug!(count = repos.len(), "listed repositories");
        Ok(repos)
    }
}
