//! HTML reporter with embedded styles
//!
//! Generates a standalone HTML page that can be viewed in any browser.
//! Includes:
//! - Overall score badge
//! - One card per category with a score bar and suggestions
//! - Strengths and improvements side by side
//! - Responsive layout for mobile and desktop

use super::assessment;
use crate::models::{FeedbackItem, FeedbackReport, Status, StatusThresholds};
use anyhow::Result;
use chrono::Local;

/// Render report as standalone HTML
pub fn render(report: &FeedbackReport, thresholds: StatusThresholds) -> Result<String> {
    let mut html = String::new();

    html.push_str(&render_head(report));
    html.push_str("<body>\n<div class=\"container\">\n");
    html.push_str(&render_header(report));
    html.push_str("<div class=\"content\">\n");
    html.push_str(&render_score_section(report, thresholds));

    html.push_str("<div class=\"section\">\n    <h2 class=\"section-title\">Detailed Feedback</h2>\n    <div class=\"cards\">\n");
    for item in &report.feedback {
        html.push_str(&render_item(item));
    }
    html.push_str("    </div>\n</div>\n");

    html.push_str(&render_lists(report));
    html.push_str("</div>\n"); // content

    html.push_str(&render_footer(report));
    html.push_str("</div>\n</body>\n</html>");

    Ok(html)
}

fn render_head(report: &FeedbackReport) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Essay Analysis - {}</title>
    <style>
{CSS}
    </style>
</head>
"#,
        html_escape(&report.title)
    )
}

fn render_header(report: &FeedbackReport) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        r#"<div class="header">
    <h1>Essay Analysis: {}</h1>
    <p class="timestamp">AI-Powered Writing Assessment &middot; Generated {}</p>
</div>
"#,
        html_escape(&report.title),
        timestamp
    )
}

fn render_score_section(report: &FeedbackReport, thresholds: StatusThresholds) -> String {
    let overall = thresholds.classify(report.overall_score);
    format!(
        r#"<div class="score-section">
    <div class="score-badge {}">{}</div>
    <div class="score-label">Overall Writing Quality</div>
    <p class="assessment">{}</p>
    <p class="stats">{} words &middot; {} sentences &middot; {} words per sentence</p>
</div>
"#,
        status_class(overall),
        report.overall_score,
        assessment(overall),
        report.stats.word_count,
        report.stats.sentence_count,
        report.stats.avg_words_per_sentence
    )
}

fn render_item(item: &FeedbackItem) -> String {
    let suggestions = if item.suggestions.is_empty() {
        String::new()
    } else {
        let lis: String = item
            .suggestions
            .iter()
            .map(|s| format!("                <li>{}</li>\n", html_escape(s)))
            .collect();
        format!(
            "            <p class=\"suggestions-label\">Suggestions:</p>\n            <ul>\n{}            </ul>\n",
            lis
        )
    };

    format!(
        r#"        <div class="card">
            <div class="card-header">
                <h3>{}</h3>
                <span class="status-badge {}">{}</span>
            </div>
            <div class="card-score">{}/100</div>
            <div class="bar"><div class="bar-fill {}" style="width: {}%"></div></div>
            <p class="card-feedback">{}</p>
{}        </div>
"#,
        html_escape(item.category.label()),
        status_class(item.status),
        item.status.label(),
        item.score,
        status_class(item.status),
        item.score,
        html_escape(&item.feedback),
        suggestions
    )
}

fn render_lists(report: &FeedbackReport) -> String {
    let list = |items: &[String]| -> String {
        items
            .iter()
            .map(|s| format!("            <li>{}</li>\n", html_escape(s)))
            .collect()
    };
    format!(
        r#"<div class="section lists">
    <div class="list strengths">
        <h2 class="section-title">Key Strengths</h2>
        <ul>
{}        </ul>
    </div>
    <div class="list improvements">
        <h2 class="section-title">Areas for Improvement</h2>
        <ul>
{}        </ul>
    </div>
</div>
"#,
        list(&report.strengths),
        list(&report.improvements)
    )
}

fn render_footer(report: &FeedbackReport) -> String {
    format!(
        r#"<div class="footer">
    <p>Generated by EssaySpark ({} provider)</p>
</div>
"#,
        html_escape(&report.provider)
    )
}

fn status_class(status: Status) -> &'static str {
    match status {
        Status::Excellent => "status-excellent",
        Status::Good => "status-good",
        Status::NeedsImprovement => "status-needs-improvement",
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Embedded CSS
const CSS: &str = r#"
:root {
    --primary-color: #2563eb;
    --background-color: #f8fafc;
    --text-color: #1e293b;
    --muted-color: #64748b;
    --card-background: white;
    --border-color: #e2e8f0;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: var(--text-color);
    background: var(--background-color);
    padding: 2rem;
}

.container {
    max-width: 1000px;
    margin: 0 auto;
    background: var(--card-background);
    border-radius: 12px;
    box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1);
    overflow: hidden;
}

.header {
    background: linear-gradient(135deg, #2563eb 0%, #7c3aed 100%);
    color: white;
    padding: 2.5rem 2rem;
    text-align: center;
}

.header h1 { font-size: 2rem; margin-bottom: 0.5rem; }
.header .timestamp { opacity: 0.9; font-size: 0.95rem; }

.content { padding: 2rem; }

.score-section {
    text-align: center;
    padding: 2rem;
    background: #f1f5f9;
    border-radius: 8px;
    margin-bottom: 2rem;
}

.score-badge {
    display: inline-block;
    font-size: 3rem;
    font-weight: bold;
    width: 120px;
    height: 120px;
    line-height: 120px;
    border-radius: 50%;
    margin-bottom: 0.5rem;
    color: white;
}

.score-label { font-size: 1.25rem; color: var(--muted-color); }
.assessment { font-style: italic; color: var(--muted-color); }
.stats { font-size: 0.875rem; color: var(--muted-color); margin-top: 0.5rem; }

.section { margin-bottom: 2rem; }
.section-title {
    font-size: 1.25rem;
    margin-bottom: 1rem;
    padding-bottom: 0.5rem;
    border-bottom: 2px solid var(--border-color);
}

.cards {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
    gap: 1rem;
}

.card {
    border: 1px solid var(--border-color);
    border-radius: 8px;
    padding: 1.25rem;
}

.card-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    gap: 0.5rem;
}

.card-header h3 { font-size: 1rem; }
.card-score { font-size: 1.75rem; font-weight: bold; margin: 0.5rem 0; }
.card-feedback { color: var(--muted-color); margin: 0.75rem 0; }
.suggestions-label { font-weight: 600; font-size: 0.875rem; }
.card ul, .list ul { padding-left: 1.25rem; }

.status-badge {
    padding: 0.15rem 0.6rem;
    border-radius: 6px;
    font-size: 0.75rem;
    font-weight: 600;
    color: white;
    white-space: nowrap;
}

.bar {
    height: 8px;
    background: #e2e8f0;
    border-radius: 4px;
    overflow: hidden;
}

.bar-fill { height: 100%; border-radius: 4px; }

.status-excellent { background: #10b981; }
.status-good { background: #eab308; }
.status-needs-improvement { background: #ef4444; }

.lists {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
    gap: 1.5rem;
}

.strengths li::marker { color: #10b981; }
.improvements li::marker { color: #eab308; }

.footer {
    text-align: center;
    padding: 2rem;
    color: var(--muted-color);
    border-top: 1px solid var(--border-color);
}

@media (max-width: 768px) {
    body { padding: 1rem; }
    .header { padding: 2rem 1rem; }
    .header h1 { font-size: 1.5rem; }
    .score-badge { width: 80px; height: 80px; line-height: 80px; font-size: 2rem; }
}

@media print {
    body { padding: 0; background: white; }
    .container { box-shadow: none; }
    .card { page-break-inside: avoid; }
}
"#;
