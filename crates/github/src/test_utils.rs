//! GitHub doubles for tests.
//!
//! [`FakeGitHub`] implements [`Connect`]; every client it hands out shares
//! one [`FakeState`], so tests can seed variables and files, inject
//! failures, and inspect the calls made afterwards.
//!
//! [`HttpStub`] is a canned-response HTTP server that a real
//! [`GitHubClient`](crate::GitHubClient) can be pointed at.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use wfsync_protocol::WriteOutcome;

use crate::client::Capability;
use crate::contents::TextFileWrite;
use crate::error::{Error, Result};
use crate::remote::{Connect, RepoRemote};

/// How a variable lookup answers.
#[derive(Debug, Clone)]
pub(crate) enum VariableAnswer {
    Value(String),
    Forbidden,
    ServerError,
}

/// A write call as received by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedWrite {
    pub repo: String,
    pub path: String,
    pub content: Option<String>,
    pub message: String,
    pub token: String,
}

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    variables: HashMap<(String, String), VariableAnswer>,
    files: HashMap<(String, String), String>,
    failing_file_checks: HashSet<(String, String)>,
    failing_writes: HashSet<String>,
    variable_lookups: Vec<String>,
    file_checks: Vec<(String, String)>,
    writes: Vec<RecordedWrite>,
    connections: Vec<(String, Capability)>,
}

/// Shared in-memory GitHub.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeGitHub {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn with_variable(self, repo: &str, name: &str, value: &str) -> Self {
        self.answer_variable(repo, name, VariableAnswer::Value(value.to_string()))
    }

    pub fn answer_variable(self, repo: &str, name: &str, answer: VariableAnswer) -> Self {
        self.state()
            .variables
            .insert((repo.to_string(), name.to_string()), answer);
        self
    }

    pub fn with_file(self, repo: &str, path: &str, content: &str) -> Self {
        self.state()
            .files
            .insert((repo.to_string(), path.to_string()), content.to_string());
        self
    }

    pub fn failing_file_check(self, repo: &str, path: &str) -> Self {
        self.state()
            .failing_file_checks
            .insert((repo.to_string(), path.to_string()));
        self
    }

    pub fn failing_write(self, repo: &str) -> Self {
        self.state().failing_writes.insert(repo.to_string());
        self
    }

    pub fn file(&self, repo: &str, path: &str) -> Option<String> {
        self.state()
            .files
            .get(&(repo.to_string(), path.to_string()))
            .cloned()
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.state().writes.clone()
    }

    pub fn variable_lookups(&self) -> Vec<String> {
        self.state().variable_lookups.clone()
    }

    pub fn file_checks(&self) -> Vec<(String, String)> {
        self.state().file_checks.clone()
    }

    pub fn connections(&self) -> Vec<(String, Capability)> {
        self.state().connections.clone()
    }

    /// Number of remote calls of any kind.
    pub fn remote_calls(&self) -> usize {
        let state = self.state();
        state.variable_lookups.len() + state.file_checks.len() + state.writes.len()
    }
}

impl Connect for FakeGitHub {
    type Client = FakeClient;

    fn connect(&self, token: &SecretString, capability: Capability) -> Result<FakeClient> {
        let token = token.expose_secret().to_string();
        self.state().connections.push((token.clone(), capability));
        Ok(FakeClient {
            token,
            capability,
            state: Arc::clone(&self.state),
        })
    }
}

/// A client handed out by [`FakeGitHub`].
#[derive(Debug)]
pub(crate) struct FakeClient {
    token: String,
    capability: Capability,
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl RepoRemote for FakeClient {
    async fn repo_variable(&self, _owner: &str, repo: &str, name: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.variable_lookups.push(repo.to_string());
        match state.variables.get(&(repo.to_string(), name.to_string())) {
            Some(VariableAnswer::Value(value)) => Ok(value.clone()),
            Some(VariableAnswer::Forbidden) => Err(Error::Authentication {
                status: 403,
                message: "Resource not accessible by personal access token".to_string(),
            }),
            Some(VariableAnswer::ServerError) => Err(Error::Status {
                status: 502,
                message: "Bad Gateway".to_string(),
            }),
            None => Err(Error::NotFound {
                message: "Not Found".to_string(),
            }),
        }
    }

    async fn file_exists(&self, _owner: &str, repo: &str, path: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let key = (repo.to_string(), path.to_string());
        state.file_checks.push(key.clone());
        if state.failing_file_checks.contains(&key) {
            return Err(Error::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(state.files.contains_key(&key))
    }

    async fn write_text_file(&self, write: &TextFileWrite<'_>) -> Result<WriteOutcome> {
        if !self.capability.can_write() {
            return Err(Error::ReadOnlyClient {
                path: write.path.to_string(),
            });
        }

        let mut state = self.state.lock().unwrap();
        state.writes.push(RecordedWrite {
            repo: write.repo.to_string(),
            path: write.path.to_string(),
            content: write.content.map(str::to_string),
            message: write.message.to_string(),
            token: self.token.clone(),
        });

        if self.token.is_empty() {
            return Err(Error::Authentication {
                status: 401,
                message: "Requires authentication".to_string(),
            });
        }
        if state.failing_writes.contains(write.repo) {
            return Err(Error::Status {
                status: 409,
                message: "Conflict".to_string(),
            });
        }

        let key = (write.repo.to_string(), write.path.to_string());
        let current = state.files.get(&key).cloned();
        let outcome = match (write.content, current) {
            (None, None) => WriteOutcome::AlreadyAbsent,
            (None, Some(_)) => {
                state.files.remove(&key);
                WriteOutcome::Deleted
            }
            (Some(content), Some(current)) if current == content => WriteOutcome::Unchanged,
            (Some(content), current) => {
                state.files.insert(key, content.to_string());
                if current.is_some() {
                    WriteOutcome::Updated
                } else {
                    WriteOutcome::Created
                }
            }
        };
        Ok(outcome)
    }
}

/// A request received by [`HttpStub`].
#[derive(Debug, Clone)]
pub(crate) struct StubRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

type Routes = Arc<Mutex<HashMap<(String, String), (u16, Value)>>>;

/// A one-request-per-connection HTTP/1.1 server answering canned JSON.
///
/// Unknown routes answer 404 the way GitHub does.
pub(crate) struct HttpStub {
    url: String,
    routes: Routes,
    requests: Arc<Mutex<Vec<StubRequest>>>,
    server: JoinHandle<()>,
}

impl HttpStub {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let routes = Routes::default();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let server = tokio::spawn({
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let routes = Arc::clone(&routes);
                    let requests = Arc::clone(&requests);
                    tokio::spawn(async move {
                        let _ = answer(stream, &routes, &requests).await;
                    });
                }
            }
        });

        Self {
            url,
            routes,
            requests,
            server,
        }
    }

    /// Base URL to hand to the client.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Answers `method path` with `status` and a JSON body.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body));
        self
    }

    pub fn requests(&self) -> Vec<StubRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests with the given method, in arrival order.
    pub fn requests_with(&self, method: &str) -> Vec<StubRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method)
            .collect()
    }
}

impl Drop for HttpStub {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn answer(
    mut stream: TcpStream,
    routes: &Routes,
    requests: &Mutex<Vec<StubRequest>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default();
    let path = target.split('?').next().unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }
    while buf.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
    }
    let end = buf.len().min(header_end + content_length);
    let body = serde_json::from_slice(&buf[header_end..end]).ok();

    let (status, reply) = routes
        .lock()
        .unwrap()
        .get(&(method.clone(), path.clone()))
        .cloned()
        .unwrap_or_else(|| (404, serde_json::json!({ "message": "Not Found" })));
    requests.lock().unwrap().push(StubRequest {
        method,
        path,
        authorization,
        body,
    });

    let reply = reply.to_string();
    let response = format!(
        "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
        reason(status),
        reply.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        429 => "Too Many Requests",
        _ => "Error",
    }
}
