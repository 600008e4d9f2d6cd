//! LLM-backed analysis provider
//!
//! Sends the essay to a chat backend and normalizes whatever comes back into
//! a report with the same guarantees as the mock provider: four cards in
//! fixed order, status derived from score, overall score derived from the
//! cards, exactly four strengths and improvements.

use super::{stats, tables, AnalysisError, AnalysisProvider, AnalysisResult};
use crate::ai::{
    extract_json_block, AiClient, AiError, AiResult, EssayPromptBuilder, Message, SYSTEM_PROMPT,
};
use crate::models::{
    Category, EssaySubmission, FeedbackItem, FeedbackReport, StatusThresholds, TextStats,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const PROVIDER_NAME: &str = "llm";

const MAX_SUGGESTIONS: usize = 3;
const LIST_LEN: usize = 4;

pub struct LlmAnalyzer {
    client: Arc<AiClient>,
    thresholds: StatusThresholds,
}

impl LlmAnalyzer {
    pub fn new(client: AiClient, thresholds: StatusThresholds) -> Self {
        Self {
            client: Arc::new(client),
            thresholds,
        }
    }
}

#[async_trait]
impl AnalysisProvider for LlmAnalyzer {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn analyze(&self, submission: &EssaySubmission) -> AnalysisResult<FeedbackReport> {
        let stats = stats::text_stats(&submission.essay);
        let prompt = EssayPromptBuilder::new(submission).stats(stats).build();
        let client = Arc::clone(&self.client);

        info!(
            "Requesting LLM analysis of '{}' from {} ({})",
            submission.title,
            client.backend().name(),
            client.model()
        );

        let response = tokio::task::spawn_blocking(move || {
            client.generate(vec![Message::user(prompt)], Some(SYSTEM_PROMPT))
        })
        .await
        .map_err(|e| AnalysisError::Task(e.to_string()))??;

        debug!("LLM response: {} chars", response.len());
        let report = parse_response(&response, submission, stats, &self.thresholds)?;
        info!("LLM analysis finished: overall {}", report.overall_score);
        Ok(report)
    }
}

#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(default)]
    categories: HashMap<String, RawCategory>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    score: Option<f64>,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Parse and normalize a model reply into a report
pub fn parse_response(
    response: &str,
    submission: &EssaySubmission,
    stats: TextStats,
    thresholds: &StatusThresholds,
) -> AiResult<FeedbackReport> {
    let json = extract_json_block(response);
    let reply: RawReply = serde_json::from_str(json)
        .map_err(|e| AiError::ParseError(format!("invalid analysis JSON: {}", e)))?;

    // Accept either keys ("grammar") or labels ("Grammar & Mechanics")
    let mut by_category: HashMap<Category, RawCategory> = HashMap::new();
    for (key, raw) in reply.categories {
        match Category::parse(&key) {
            Some(category) => {
                by_category.insert(category, raw);
            }
            None => debug!("Ignoring unknown category '{}' in LLM reply", key),
        }
    }

    let mut feedback = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let raw = by_category.remove(&category).ok_or_else(|| {
            AiError::ParseError(format!("missing category '{}'", category.key()))
        })?;
        feedback.push(normalize_item(category, raw, thresholds)?);
    }

    let overall_score = FeedbackReport::mean_score(feedback.iter().map(|i| i.score));

    Ok(FeedbackReport {
        title: submission.title.clone(),
        overall_score,
        feedback,
        strengths: fit_list(reply.strengths, tables::strengths(&stats, overall_score)),
        improvements: fit_list(reply.improvements, tables::improvements(&stats)),
        stats,
        provider: PROVIDER_NAME.to_string(),
    })
}

fn normalize_item(
    category: Category,
    raw: RawCategory,
    thresholds: &StatusThresholds,
) -> AiResult<FeedbackItem> {
    let score = raw
        .score
        .filter(|s| s.is_finite())
        .ok_or_else(|| AiError::ParseError(format!("no score for '{}'", category.key())))?;
    if !(0.0..=100.0).contains(&score) {
        warn!("Clamping out-of-range {} score {}", category.key(), score);
    }
    let score = score.round().clamp(0.0, 100.0) as u8;
    let fallback = tables::item(category, score, thresholds);

    let feedback = match raw.feedback.trim() {
        "" => fallback.feedback,
        text => text.to_string(),
    };

    let mut suggestions: Vec<String> = raw
        .suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if suggestions.is_empty() {
        suggestions = fallback.suggestions;
    }
    suggestions.truncate(MAX_SUGGESTIONS);

    Ok(FeedbackItem {
        category,
        score,
        status: fallback.status,
        feedback,
        suggestions,
    })
}

/// Keep the first four non-blank entries, topping up from `defaults`
fn fit_list(items: Vec<String>, defaults: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(LIST_LEN)
        .collect();
    for default in defaults {
        if out.len() == LIST_LEN {
            break;
        }
        if !out.contains(&default) {
            out.push(default);
        }
    }
    out
}
