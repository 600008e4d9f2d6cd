//! Output reporters for essay feedback
//!
//! Supports multiple output formats:
//! - `text` - Full terminal output with colors
//! - `compact` - One line per category, first tip only
//! - `json` - Machine-readable JSON (camelCase, same shape as the web client)
//! - `html` - Standalone HTML page
//! - `markdown` - GitHub-flavored Markdown

mod html;
mod json;
mod markdown;
mod text;

use crate::models::{FeedbackReport, Status, StatusThresholds};
use anyhow::{anyhow, Result};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Compact,
    Json,
    Html,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "compact" | "short" => Ok(OutputFormat::Compact),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, compact, json, html, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Compact => write!(f, "compact"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render a feedback report; `thresholds` decide the overall status wording
pub fn report_with_format(
    report: &FeedbackReport,
    format: OutputFormat,
    thresholds: StatusThresholds,
) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report, thresholds),
        OutputFormat::Compact => text::render_compact(report, thresholds),
        OutputFormat::Json => json::render(report),
        OutputFormat::Html => html::render(report, thresholds),
        OutputFormat::Markdown => markdown::render(report, thresholds),
    }
}

/// Whether a format embeds ANSI colors and should only go to a terminal
pub fn is_terminal_format(format: OutputFormat) -> bool {
    matches!(format, OutputFormat::Text | OutputFormat::Compact)
}

/// Remove ANSI color sequences, for terminal formats written to files or pipes
pub fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    ANSI.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid regex"))
        .replace_all(s, "")
        .into_owned()
}

/// Verbal summary of the overall status
pub(crate) fn assessment(status: Status) -> &'static str {
    match status {
        Status::Excellent => "Excellent work",
        Status::Good => "Good work with room to grow",
        Status::NeedsImprovement => "Keep practicing",
    }
}
