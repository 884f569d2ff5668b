//! Repository contents: existence checks and text file writes.
//!
//! A write is expressed as the desired state of one file. The current state
//! is fetched first so that:
//!
//! - identical content produces no commit ([`WriteOutcome::Unchanged`])
//! - deleting a missing file is a no-op ([`WriteOutcome::AlreadyAbsent`])
//! - updates and deletes carry the blob sha the API requires

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use wfsync_protocol::WriteOutcome;

use crate::client::GitHubClient;
use crate::error::{Error, Result};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The desired state of one text file.
#[derive(Debug, Clone, Copy)]
pub struct TextFileWrite<'a> {
    /// Repository owner (the organization).
    pub owner: &'a str,
    /// Repository name.
    pub repo: &'a str,
    /// Path of the file inside the repository.
    pub path: &'a str,
    /// New content, or `None` to delete the file.
    pub content: Option<&'a str>,
    /// Commit message.
    pub message: &'a str,
}

/// A file entry from `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    #[serde(default)]
    content: Option<String>,
}

/// Request body for creating or updating a file.
#[derive(Debug, Serialize)]
struct PutFileRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Request body for deleting a file.
#[derive(Debug, Serialize)]
struct DeleteFileRequest<'a> {
    message: &'a str,
    sha: &'a str,
}

/// Builds the contents route, escaping each path segment.
fn contents_route(owner: &str, repo: &str, path: &str) -> String {
    let escaped: Vec<String> = path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect();
    format!("/repos/{owner}/{repo}/contents/{}", escaped.join("/"))
}

/// Decodes the base64 payload of a file entry.
///
/// The API wraps the payload at 60 columns, so line breaks are dropped
/// before decoding. Returns `None` for content that is not UTF-8 text.
fn decode_content(encoded: &str) -> Option<String> {
    let compact: String = encoded.split_whitespace().collect();
    let bytes = STANDARD.decode(compact).ok()?;
    String::from_utf8(bytes).ok()
}

impl GitHubClient {
    /// Returns `true` if `path` exists in the repository.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than a 404.
    #[instrument(skip(self))]
    pub async fn file_exists(&self, owner: &str, repo: &str, path: &str) -> Result<bool> {
        let route = contents_route(owner, repo, path);
        match self.inner().get::<serde_json::Value, _, _>(&route, None::<&()>).await {
            Ok(_) => Ok(true),
            Err(err) => match Error::from(err) {
                Error::NotFound { .. } => Ok(false),
                other => Err(other),
            },
        }
    }

    /// Fetches the current file entry, `None` if the file does not exist.
    async fn file_entry(&self, owner: &str, repo: &str, path: &str) -> Result<Option<ContentEntry>> {
        let route = contents_route(owner, repo, path);
        match self.inner().get::<ContentEntry, _, _>(&route, None::<&()>).await {
            Ok(entry) if entry.kind == "file" => Ok(Some(entry)),
            Ok(entry) => Err(Error::InvalidContent {
                path: path.to_string(),
                reason: format!("expected a file, found {}", entry.kind),
            }),
            Err(err) => match Error::from(err) {
                Error::NotFound { .. } => Ok(None),
                other => Err(other),
            },
        }
    }

    /// Brings one text file to the desired state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnlyClient`] if this client may not write, and an
    /// API error if reading or writing the file fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use secrecy::SecretString;
    /// use wfsync_github::{Capability, GitHubClient, TextFileWrite};
    ///
    /// # async fn example() -> wfsync_github::Result<()> {
    /// let token = SecretString::from("ghp_xxx".to_string());
    /// let client = GitHubClient::new(&token, Capability::TextFileCrud, None)?;
    ///
    /// let outcome = client
    ///     .write_text_file(&TextFileWrite {
    ///         owner: "acme",
    ///         repo: "svc-a",
    ///         path: ".github/workflows/phpcs.yml",
    ///         content: Some("name: PHPCS\n"),
    ///         message: "Creating/Updating .github/workflows/phpcs.yml",
    ///     })
    ///     .await?;
    /// println!("{outcome:?}");
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, write), fields(owner = %write.owner, repo = %write.repo, path = %write.path))]
    pub async fn write_text_file(&self, write: &TextFileWrite<'_>) -> Result<WriteOutcome> {
        if !self.capability().can_write() {
            return Err(Error::ReadOnlyClient {
                path: write.path.to_string(),
            });
        }

        let existing = self.file_entry(write.owner, write.repo, write.path).await?;
        let route = contents_route(write.owner, write.repo, write.path);

        match (write.content, existing) {
            (None, None) => {
                debug!("file already absent");
                Ok(WriteOutcome::AlreadyAbsent)
            }
            (None, Some(entry)) => {
                let body = DeleteFileRequest {
                    message: write.message,
                    sha: &entry.sha,
                };
                let _: serde_json::Value = self.inner().delete(&route, Some(&body)).await?;
                debug!("deleted file");
                Ok(WriteOutcome::Deleted)
            }
            (Some(content), existing) => {
                let current = existing
                    .as_ref()
                    .and_then(|entry| entry.content.as_deref())
                    .and_then(decode_content);
                if current.as_deref() == Some(content) {
                    debug!("file unchanged");
                    return Ok(WriteOutcome::Unchanged);
                }

                let body = PutFileRequest {
                    message: write.message,
                    content: STANDARD.encode(content),
                    sha: existing.as_ref().map(|entry| entry.sha.as_str()),
                };
                let _: serde_json::Value = self.inner().put(&route, Some(&body)).await?;

                if existing.is_some() {
                    debug!("updated file");
                    Ok(WriteOutcome::Updated)
                } else {
                    debug!("created file");
                    Ok(WriteOutcome::Created)
                }
            }
        }
    }
}
