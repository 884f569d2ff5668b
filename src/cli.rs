//! Command-line interface.
//!
//! Every argument can also be supplied through the environment variable a
//! GitHub Action step exposes for it (`INPUT_*`), so the same binary runs
//! both from a workflow and from a terminal.

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use wfsync_config::parse_flag;

/// Default secret key of the read-only token.
pub const DEFAULT_READ_SECRET: &str = "CSPF_REPO_READ_PAT";

#[derive(Parser)]
#[command(
    name = "wfsync",
    about = "Synchronize GitHub Actions workflow files across an organization",
    version
)]
pub struct Cli {
    /// Organization whose repositories are synchronized
    #[arg(long, env = "INPUT_ORG")]
    pub org: String,

    /// JSON object mapping secret key names to values
    #[arg(long, env = "INPUT_SECRETS", hide_env_values = true)]
    pub secrets: String,

    /// Comma-separated workflow kinds (project-automation, phpcs, phpunit)
    #[arg(long, env = "INPUT_WHAT")]
    pub what: String,

    /// Delete workflow files from repositories that do not qualify
    #[arg(
        long,
        env = "INPUT_PROCESS_DELETION",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = flag_value
    )]
    pub process_deletion: bool,

    /// Root holding defs/ and .github/workflow-templates/
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// Teams configuration file, relative to the workspace
    #[arg(long, env = "INPUT_TEAMS_CONFIG")]
    pub teams_config: Option<PathBuf>,

    /// Secret key of the read-only token
    #[arg(long, env = "INPUT_READ_SECRET", default_value = DEFAULT_READ_SECRET)]
    pub read_secret: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Evaluate and render without writing anything
    #[arg(
        long,
        env = "INPUT_DRY_RUN",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = flag_value
    )]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Boolean-like inputs never fail to parse; unknown values are false.
fn flag_value(value: &str) -> Result<bool, Infallible> {
    Ok(parse_flag(value))
}
