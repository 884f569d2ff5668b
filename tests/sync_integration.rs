//! End-to-end tests: workspace files, teams configuration, and secrets
//! flowing through the synchronizer into an in-memory GitHub.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tempfile::TempDir;
use wfsync_config::{SecretStore, TeamsConfig, Workspace, parse_kinds, resolve_repos};
use wfsync_github::{
    Capability, Connect, Error, RepoRemote, Result, SyncOptions, Synchronizer, TextFileWrite,
};
use wfsync_protocol::{RepoRecord, SkipReason, SyncAction, WorkflowKind, WriteOutcome};

const TEAMS: &str = "\
core:
  project: 42
  owner: alice
  repos: [svc-a, svc-c]
  secrets:
    workflow-manage: CORE_WORKFLOW_PAT
    issue-manage: CORE_ISSUE_PAT
";

const PROJECT_TEMPLATE: &str = "\
name: Project automation
on:
  issues:
    types: [opened]
jobs:
  add:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/add-to-project@v1
        with:
          project-url: https://github.com/orgs/{{{PROJECT_ORG}}}/projects/{{{PROJECT_ID}}}
          github-token: ${{ secrets.{{{ISSUE_MANAGE_PAT}}} }}
";

const PHPCS_TEMPLATE: &str = "name: PHPCS\n# owner: {{{PRIMARY_CODEOWNER}}}\n";

const LISTING: &str = r#"[
    {"name": "svc-a", "archived": false, "disabled": false, "fork": false},
    {"name": "svc-b", "archived": false, "disabled": false, "fork": false},
    {"name": "svc-c", "archived": false, "disabled": false, "fork": false},
    {"name": "old", "archived": true, "disabled": false, "fork": false},
    {"name": "mirror", "archived": false, "disabled": false, "fork": true}
]"#;

const SECRETS: &str = r#"{
    "CSPF_REPO_READ_PAT": "ghp_read",
    "CORE_WORKFLOW_PAT": "ghp_core",
    "CORE_ISSUE_PAT": "ghp_issue"
}"#;

/// Files per (repo, path), shared by every client.
#[derive(Clone, Default)]
struct MemoryGitHub {
    files: Arc<Mutex<HashMap<(String, String), String>>>,
    commits: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemoryGitHub {
    fn with_file(self, repo: &str, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert((repo.to_string(), path.to_string()), content.to_string());
        self
    }

    fn file(&self, repo: &str, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(&(repo.to_string(), path.to_string()))
            .cloned()
    }

    fn commits(&self) -> Vec<(String, String)> {
        self.commits.lock().unwrap().clone()
    }
}

struct MemoryClient {
    github: MemoryGitHub,
    token: String,
    capability: Capability,
}

impl Connect for MemoryGitHub {
    type Client = MemoryClient;

    fn connect(&self, token: &SecretString, capability: Capability) -> Result<MemoryClient> {
        Ok(MemoryClient {
            github: self.clone(),
            token: token.expose_secret().to_string(),
            capability,
        })
    }
}

#[async_trait]
impl RepoRemote for MemoryClient {
    async fn repo_variable(&self, _owner: &str, _repo: &str, _name: &str) -> Result<String> {
        Err(Error::NotFound {
            message: "Not Found".to_string(),
        })
    }

    async fn file_exists(&self, _owner: &str, repo: &str, path: &str) -> Result<bool> {
        Ok(self.github.file(repo, path).is_some())
    }

    async fn write_text_file(&self, write: &TextFileWrite<'_>) -> Result<WriteOutcome> {
        if !self.capability.can_write() {
            return Err(Error::ReadOnlyClient {
                path: write.path.to_string(),
            });
        }
        if self.token.is_empty() {
            return Err(Error::Authentication {
                status: 401,
                message: "Requires authentication".to_string(),
            });
        }

        let key = (write.repo.to_string(), write.path.to_string());
        let mut files = self.github.files.lock().unwrap();
        let outcome = match (write.content, files.get(&key).cloned()) {
            (None, None) => return Ok(WriteOutcome::AlreadyAbsent),
            (None, Some(_)) => {
                files.remove(&key);
                WriteOutcome::Deleted
            }
            (Some(content), Some(current)) if current == content => {
                return Ok(WriteOutcome::Unchanged);
            }
            (Some(content), current) => {
                files.insert(key, content.to_string());
                if current.is_some() {
                    WriteOutcome::Updated
                } else {
                    WriteOutcome::Created
                }
            }
        };
        self.github
            .commits
            .lock()
            .unwrap()
            .push((write.repo.to_string(), write.message.to_string()));
        Ok(outcome)
    }
}

fn workspace(dir: &Path) -> Workspace {
    let templates = dir.join(".github/workflow-templates");
    fs::create_dir_all(dir.join("defs")).unwrap();
    fs::create_dir_all(&templates).unwrap();
    fs::write(dir.join("defs/teams-config.yml"), TEAMS).unwrap();
    fs::write(templates.join("project-automation.yml"), PROJECT_TEMPLATE).unwrap();
    fs::write(templates.join("phpcs.yml"), PHPCS_TEMPLATE).unwrap();
    Workspace::new(dir)
}

fn options(process_deletion: bool) -> SyncOptions {
    SyncOptions {
        org: "acme".to_string(),
        process_deletion,
        dry_run: false,
        read_secret: "CSPF_REPO_READ_PAT".to_string(),
    }
}

#[tokio::test]
async fn project_automation_across_the_organization() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace(dir.path());
    let teams = TeamsConfig::load_from(workspace.teams_config_path()).unwrap();
    let listing: Vec<RepoRecord> = serde_json::from_str(LISTING).unwrap();
    let repos = resolve_repos(&teams, &listing);
    let secrets = SecretStore::from_json(SECRETS).unwrap();
    let github = MemoryGitHub::default();

    let template = workspace
        .read_template(WorkflowKind::ProjectAutomation)
        .unwrap();
    let mut sync = Synchronizer::new(options(false), &secrets, github.clone());
    let summary = sync
        .sync_workflow(WorkflowKind::ProjectAutomation, &template, &repos)
        .await
        .unwrap();

    let visited: Vec<&str> = summary.outcomes.iter().map(|o| o.repo.as_str()).collect();
    assert_eq!(visited, ["svc-a", "svc-b", "svc-c"]);
    assert_eq!(
        summary.action_for("svc-b"),
        Some(&SyncAction::Skipped {
            reason: SkipReason::Unowned
        })
    );
    assert_eq!(summary.changed(), 2);
    assert!(!summary.has_failures());

    let written = github
        .file("svc-a", ".github/workflows/project-automation.yml")
        .unwrap();
    assert!(written.contains("https://github.com/orgs/acme/projects/42"));
    assert!(written.contains("${{ secrets.CORE_ISSUE_PAT }}"));
    assert_eq!(
        github.commits()[0],
        (
            "svc-a".to_string(),
            "Creating/Updating .github/workflows/project-automation.yml".to_string()
        )
    );
}

#[tokio::test]
async fn phpcs_requires_a_ruleset() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace(dir.path());
    let teams = TeamsConfig::load_from(workspace.teams_config_path()).unwrap();
    let listing: Vec<RepoRecord> = serde_json::from_str(LISTING).unwrap();
    let repos = resolve_repos(&teams, &listing);
    let secrets = SecretStore::from_json(SECRETS).unwrap();
    let github = MemoryGitHub::default().with_file("svc-c", "phpcs.xml.dist", "<ruleset/>");

    let kinds = parse_kinds("phpcs").unwrap();
    let template = workspace.read_template(kinds[0]).unwrap();
    let mut sync = Synchronizer::new(options(false), &secrets, github.clone());
    let summary = sync.sync_workflow(kinds[0], &template, &repos).await.unwrap();

    assert_eq!(
        summary.action_for("svc-a"),
        Some(&SyncAction::Skipped {
            reason: SkipReason::MissingRequiredFiles
        })
    );
    assert_eq!(
        github.file("svc-c", ".github/workflows/phpcs.yml").as_deref(),
        Some("name: PHPCS\n# owner: \"@alice\"\n")
    );
}

#[tokio::test]
async fn rerun_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace(dir.path());
    let teams = TeamsConfig::load_from(workspace.teams_config_path()).unwrap();
    let repos = resolve_repos(&teams, &[RepoRecord::new("svc-a")]);
    let secrets = SecretStore::from_json(SECRETS).unwrap();
    let github = MemoryGitHub::default();
    let template = workspace
        .read_template(WorkflowKind::ProjectAutomation)
        .unwrap();

    let mut sync = Synchronizer::new(options(false), &secrets, github.clone());
    sync.sync_workflow(WorkflowKind::ProjectAutomation, &template, &repos)
        .await
        .unwrap();
    let second = sync
        .sync_workflow(WorkflowKind::ProjectAutomation, &template, &repos)
        .await
        .unwrap();

    assert_eq!(second.changed(), 0);
    assert_eq!(github.commits().len(), 1);
}

#[tokio::test]
async fn team_leaving_a_repository_deletes_its_workflow() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace(dir.path());
    let teams = TeamsConfig::from_yaml_str(
        "\
core:
  owner: alice
  repos: [svc-a]
  secrets:
    workflow-manage: CORE_WORKFLOW_PAT
",
    )
    .unwrap();
    let repos = resolve_repos(&teams, &[RepoRecord::new("svc-a")]);
    let secrets = SecretStore::from_json(SECRETS).unwrap();
    let path = ".github/workflows/project-automation.yml";
    let github = MemoryGitHub::default().with_file("svc-a", path, "name: old\n");
    let template = workspace
        .read_template(WorkflowKind::ProjectAutomation)
        .unwrap();

    let mut sync = Synchronizer::new(options(true), &secrets, github.clone());
    let summary = sync
        .sync_workflow(WorkflowKind::ProjectAutomation, &template, &repos)
        .await
        .unwrap();

    assert_eq!(
        summary.action_for("svc-a"),
        Some(&SyncAction::Written {
            outcome: WriteOutcome::Deleted
        })
    );
    assert_eq!(github.file("svc-a", path), None);
    assert_eq!(
        github.commits(),
        [("svc-a".to_string(), format!("Deleting {path}"))]
    );
}

#[test]
fn demo_workspace_loads() {
    let workspace = Workspace::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("demos"));
    let teams = TeamsConfig::load_from(workspace.teams_config_path()).unwrap();
    for kind in WorkflowKind::ALL {
        assert!(workspace.read_template(kind).is_ok(), "{kind} template");
    }

    let repos = resolve_repos(&teams, &[RepoRecord::new("svc-c")]);
    let config = repos.get("svc-c").unwrap();
    assert_eq!(config.owner.as_deref(), Some("bob"));
    assert_eq!(config.secret_key("workflow-manage"), Some("PAYMENTS_WORKFLOW_PAT"));
}
