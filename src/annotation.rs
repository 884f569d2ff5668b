//! GitHub Actions workflow commands.
//!
//! Messages are escaped so that `%` and line breaks cannot end the command
//! early.

use std::fmt::Display;

/// Escapes the message part of a workflow command.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Formats an `::error::` command.
pub fn error(message: impl Display) -> String {
    format!("::error::{}", escape_data(&message.to_string()))
}

/// Formats a `::warning::` command.
pub fn warning(message: impl Display) -> String {
    format!("::warning::{}", escape_data(&message.to_string()))
}
