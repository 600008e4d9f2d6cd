//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Suitable for pasting into a learning journal, a wiki page or an issue.

use super::assessment;
use crate::models::{FeedbackItem, FeedbackReport, Status, StatusThresholds};
use anyhow::Result;
use chrono::Local;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &FeedbackReport, thresholds: StatusThresholds) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report, thresholds));
    md.push('\n');

    md.push_str(&render_summary(report));
    md.push('\n');

    md.push_str("## Detailed Feedback\n\n");
    for item in &report.feedback {
        md.push_str(&render_item(item));
    }

    md.push_str(&render_list("Key Strengths", "✅", &report.strengths));
    md.push('\n');
    md.push_str(&render_list("Areas for Improvement", "🎯", &report.improvements));
    md.push('\n');

    md.push_str(&render_footer(report));

    Ok(md)
}

fn render_header(report: &FeedbackReport, thresholds: StatusThresholds) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        r#"# Essay Analysis: {}

**Overall Writing Quality: {}/100** | {}

Generated: {}
"#,
        escape_inline(&report.title),
        report.overall_score,
        assessment(thresholds.classify(report.overall_score)),
        timestamp
    )
}

fn render_summary(report: &FeedbackReport) -> String {
    let mut md = String::from(
        "## Summary\n\n| Category | Score | Status |\n|----------|-------|--------|\n",
    );
    for item in &report.feedback {
        md.push_str(&format!(
            "| {} | {} | {} {} |\n",
            item.category.label(),
            item.score,
            status_emoji(item.status),
            item.status.label()
        ));
    }
    md.push_str(&format!(
        "\n**Words:** {} | **Sentences:** {} | **Avg words/sentence:** {}\n",
        report.stats.word_count, report.stats.sentence_count, report.stats.avg_words_per_sentence
    ));
    md
}

fn render_item(item: &FeedbackItem) -> String {
    let mut md = format!(
        "### {} {} ({}/100)\n\n{}\n\n",
        status_emoji(item.status),
        item.category.label(),
        item.score,
        item.feedback
    );
    if !item.suggestions.is_empty() {
        md.push_str("**Suggestions:**\n\n");
        for suggestion in &item.suggestions {
            md.push_str(&format!("- {}\n", suggestion));
        }
        md.push('\n');
    }
    md
}

fn render_list(heading: &str, marker: &str, items: &[String]) -> String {
    let mut md = format!("## {} {}\n\n", marker, heading);
    for item in items {
        md.push_str(&format!("- {}\n", item));
    }
    md
}

fn render_footer(report: &FeedbackReport) -> String {
    format!(
        "---\n\n*Generated by EssaySpark ({} provider)*\n",
        report.provider
    )
}

fn status_emoji(status: Status) -> &'static str {
    match status {
        Status::Excellent => "🟢",
        Status::Good => "🟡",
        Status::NeedsImprovement => "🔴",
    }
}

/// Keep user-supplied titles from opening markdown constructs
fn escape_inline(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
