//! Normalization of GitHub Action inputs.
//!
//! Action inputs arrive as strings. They are converted to typed values once,
//! at the boundary, and never re-parsed downstream.

use wfsync_protocol::WorkflowKind;

use crate::error::{ConfigError, Result};

/// Normalizes a boolean-like input.
///
/// Only `"true"` and `"1"` are true; everything else, including an empty
/// or missing input, is false.
///
/// # Examples
///
/// ```
/// use wfsync_config::parse_flag;
///
/// assert!(parse_flag("true"));
/// assert!(parse_flag("1"));
/// assert!(!parse_flag("yes"));
/// assert!(!parse_flag(""));
/// ```
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

/// Parses a comma-separated list of workflow kinds.
///
/// Duplicates are dropped, keeping the first occurrence.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownWorkflowKind`] for an unknown name and
/// [`ConfigError::NoWorkflowKind`] if the list is empty.
///
/// # Examples
///
/// ```
/// use wfsync_config::parse_kinds;
/// use wfsync_protocol::WorkflowKind;
///
/// let kinds = parse_kinds("phpcs, phpunit").unwrap();
/// assert_eq!(kinds, [WorkflowKind::Phpcs, WorkflowKind::Phpunit]);
/// ```
pub fn parse_kinds(value: &str) -> Result<Vec<WorkflowKind>> {
    let mut kinds = Vec::new();
    for name in value.split(',').filter(|s| !s.trim().is_empty()) {
        let kind: WorkflowKind = name.parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        return Err(ConfigError::NoWorkflowKind);
    }
    Ok(kinds)
}
