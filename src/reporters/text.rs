//! Text (terminal) reporters with colors and formatting

use super::assessment;
use crate::models::{FeedbackItem, FeedbackReport, Status, StatusThresholds};
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

fn status_color(status: Status) -> &'static str {
    match status {
        Status::Excellent => GREEN,
        Status::Good => YELLOW,
        Status::NeedsImprovement => RED,
    }
}


/// Ten-cell bar for a 0-100 score
fn score_bar(score: u8) -> String {
    let filled = usize::from(score.min(100)).div_ceil(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// Render the full report
pub fn render(report: &FeedbackReport, thresholds: StatusThresholds) -> Result<String> {
    let mut out = String::new();

    // Header
    let overall = thresholds.classify(report.overall_score);
    let score_c = status_color(overall);
    out.push_str(&format!(
        "\n{BOLD}Essay Analysis: {}{RESET}\n",
        report.title
    ));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Overall Writing Quality: {score_c}{BOLD}{}/100{RESET}  {DIM}{}{RESET}\n",
        report.overall_score,
        assessment(overall)
    ));
    out.push_str(&format!(
        "{DIM}Words: {}  Sentences: {}  Avg words/sentence: {}{RESET}\n\n",
        report.stats.word_count, report.stats.sentence_count, report.stats.avg_words_per_sentence
    ));

    // Category cards
    for item in &report.feedback {
        out.push_str(&render_item(item));
        out.push('\n');
    }

    out.push_str(&format!("{BOLD}{GREEN}KEY STRENGTHS{RESET}\n"));
    for strength in &report.strengths {
        out.push_str(&format!("  {GREEN}+{RESET} {}\n", strength));
    }
    out.push('\n');

    out.push_str(&format!("{BOLD}{YELLOW}AREAS FOR IMPROVEMENT{RESET}\n"));
    for improvement in &report.improvements {
        out.push_str(&format!("  {YELLOW}>{RESET} {}\n", improvement));
    }

    Ok(out)
}

fn render_item(item: &FeedbackItem) -> String {
    let c = status_color(item.status);
    let mut out = format!(
        "{BOLD}{:<26}{RESET} {c}{} {:>3}{RESET}  {c}[{}]{RESET}\n",
        item.category.label(),
        score_bar(item.score),
        item.score,
        item.status.label()
    );
    out.push_str(&format!("  {}\n", item.feedback));
    if !item.suggestions.is_empty() {
        out.push_str(&format!("  {DIM}Suggestions:{RESET}\n"));
        for suggestion in &item.suggestions {
            out.push_str(&format!("    - {}\n", suggestion));
        }
    }
    out
}

/// Render a one-screen summary: one line per category and its first tip
pub fn render_compact(report: &FeedbackReport, thresholds: StatusThresholds) -> Result<String> {
    let mut out = String::new();
    let score_c = status_color(thresholds.classify(report.overall_score));
    out.push_str(&format!(
        "{BOLD}{}{RESET}  Overall Score: {score_c}{BOLD}{}{RESET}\n",
        report.title, report.overall_score
    ));

    for item in &report.feedback {
        let c = status_color(item.status);
        out.push_str(&format!(
            "  {:<26} {c}{:>3}{RESET}",
            item.category.label(),
            item.score
        ));
        if let Some(tip) = item.suggestions.first() {
            out.push_str(&format!("  {DIM}Tip: {}{RESET}", tip));
        }
        out.push('\n');
    }

    Ok(out)
}
