//! JSON reporter
//!
//! Outputs the full FeedbackReport as pretty-printed JSON with camelCase keys.
//! Useful for piping to jq or feeding another client.

use crate::models::FeedbackReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &FeedbackReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["overallScore"], 76);
        assert_eq!(parsed["title"], "Rivers & <Roads>");
        let feedback = parsed["feedback"].as_array().expect("feedback array");
        assert_eq!(feedback.len(), 4);
        assert_eq!(feedback[0]["category"], "Grammar & Mechanics");
        assert_eq!(feedback[3]["status"], "needs-improvement");
        assert_eq!(parsed["stats"]["wordCount"], 110);
    }

    #[test]
    fn test_json_round_trips_report() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let back: FeedbackReport = serde_json::from_str(&json_str).expect("parse report");
        assert_eq!(back, report);
    }
}
