//! wfsync - Synchronize GitHub Actions workflow files across an organization.
//!
//! Runs as a GitHub Action step or from a terminal. Loads the teams
//! configuration, lists the organization's repositories, and for each
//! requested workflow kind creates, updates, or deletes the workflow file of
//! every repository.

mod annotation;
mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wfsync_config::{SecretStore, TeamsConfig, Workspace, parse_kinds, resolve_repos};
use wfsync_github::{OctocrabConnector, SyncOptions, Synchronizer};
use wfsync_protocol::SyncAction;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("WFSYNC_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            println!("{}", annotation::error("some repositories could not be synchronized"));
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "run aborted");
            println!("{}", annotation::error(format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

/// Executes a run. Returns `false` if any repository failed.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let kinds = parse_kinds(&cli.what).context("invalid 'what' input")?;
    let secrets = SecretStore::from_json(&cli.secrets).context("invalid 'secrets' input")?;

    let mut workspace = Workspace::new(&cli.workspace);
    if let Some(path) = &cli.teams_config {
        workspace = workspace.with_teams_config(path);
    }
    let teams = TeamsConfig::load_from(workspace.teams_config_path())
        .context("failed to load teams configuration")?;

    let mut templates = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let template = workspace
            .read_template(kind)
            .with_context(|| format!("failed to load the {kind} template"))?;
        templates.push((kind, template));
    }

    let options = SyncOptions {
        org: cli.org.clone(),
        process_deletion: cli.process_deletion,
        dry_run: cli.dry_run,
        read_secret: cli.read_secret.clone(),
    };
    let connector = OctocrabConnector::new(cli.api_url.clone());
    let mut sync = Synchronizer::new(options, &secrets, connector);

    let listing = sync
        .read_client()?
        .list_org_repos(&cli.org)
        .await
        .with_context(|| format!("failed to list repositories of {}", cli.org))?;
    let repos = resolve_repos(&teams, &listing);
    info!(
        org = %cli.org,
        listed = listing.len(),
        eligible = repos.len(),
        teams = teams.len(),
        dry_run = cli.dry_run,
        "starting synchronization"
    );

    let mut succeeded = true;
    for (kind, template) in &templates {
        let summary = sync
            .sync_workflow(*kind, template, &repos)
            .await
            .with_context(|| format!("{kind} synchronization aborted"))?;
        for failure in summary.failures() {
            if let SyncAction::Failed { stage, message } = &failure.action {
                let message = format!("{kind}: {} failed at {stage}: {message}", failure.repo);
                println!("{}", annotation::warning(message));
            }
        }
        succeeded &= !summary.has_failures();
    }

    Ok(succeeded)
}
