//! Essay analysis providers
//!
//! Every provider turns an [`EssaySubmission`] into a [`FeedbackReport`]
//! through the [`AnalysisProvider`] trait. Which implementation runs is a
//! configuration choice (`[analysis] provider = "mock" | "llm"`), so callers
//! hold an `Arc<dyn AnalysisProvider>` and never branch on the kind.

pub mod llm;
pub mod mock;
pub mod stats;
pub mod tables;

pub use llm::LlmAnalyzer;
pub use mock::MockAnalyzer;
pub use stats::text_stats;

use crate::ai::{AiClient, AiError};
use crate::config::{ProjectConfig, ProviderKind, UserConfig};
use crate::models::{EssaySubmission, FeedbackReport};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while analysing an essay
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("AI backend error: {0}")]
    Backend(#[from] AiError),

    #[error("Invalid analysis configuration: {0}")]
    InvalidConfig(String),

    #[error("Analysis task failed: {0}")]
    Task(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Something that can score an essay
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Short provider name recorded on each report
    fn name(&self) -> &str;

    /// Analyse one submission. Each call is independent.
    async fn analyze(&self, submission: &EssaySubmission) -> AnalysisResult<FeedbackReport>;
}

/// Build the provider selected by the project configuration
pub fn build_provider(
    project: &ProjectConfig,
    user: &UserConfig,
) -> AnalysisResult<Arc<dyn AnalysisProvider>> {
    project
        .scoring
        .validate()
        .map_err(AnalysisError::InvalidConfig)?;

    let provider: Arc<dyn AnalysisProvider> = match project.analysis.provider {
        ProviderKind::Mock => {
            debug!(
                "Using mock provider (delay {} ms)",
                project.analysis.delay_ms
            );
            let mock = MockAnalyzer::new(project.scoring.clone(), project.analysis.delay());
            match project.analysis.seed {
                Some(seed) => Arc::new(mock.with_seed(seed)),
                None => Arc::new(mock),
            }
        }
        ProviderKind::Llm => {
            let client = AiClient::from_user_config(user)?;
            info!(
                "Using LLM provider: {} ({})",
                client.backend().name(),
                client.model()
            );
            Arc::new(LlmAnalyzer::new(client, project.scoring.thresholds()))
        }
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreBand;

    #[test]
    fn test_build_mock_provider_by_default() {
        let provider = build_provider(&ProjectConfig::default(), &UserConfig::default())
            .expect("default config builds");
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn test_invalid_scoring_rejected() {
        let mut project = ProjectConfig::default();
        project.scoring.style = ScoreBand::new(90.0, 10.0, 50.0);
        let err = build_provider(&project, &UserConfig::default())
            .err()
            .expect("invalid band");
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_seeded_mock_provider_is_reproducible() {
        let mut project = ProjectConfig::default();
        project.analysis.delay_ms = 0;
        project.analysis.seed = Some(11);
        let user = UserConfig::default();
        let submission = EssaySubmission::new("word ".repeat(50), "Seeded");

        let a = build_provider(&project, &user).expect("valid config");
        let b = build_provider(&project, &user).expect("valid config");
        assert_eq!(
            a.analyze(&submission).await.expect("mock never fails"),
            b.analyze(&submission).await.expect("mock never fails")
        );
    }

    #[test]
    fn test_llm_provider_with_configured_key() {
        let mut project = ProjectConfig::default();
        project.analysis.provider = ProviderKind::Llm;
        let mut user = UserConfig::default();
        user.ai.backend = Some("anthropic".to_string());
        user.ai.anthropic_api_key = Some("sk-test".to_string());

        let provider = build_provider(&project, &user).expect("key configured");
        assert_eq!(provider.name(), "llm");
    }
}
