//! Mock scoring generator
//!
//! Produces plausible but randomized feedback after an artificial delay,
//! standing in for a real analysis backend. Scores are sampled from the
//! configured [`ScoreBand`](crate::config::ScoreBand)s; all prose comes from
//! [`tables`](super::tables).

use super::{stats, tables, AnalysisProvider, AnalysisResult};
use crate::config::ScoringConfig;
use crate::models::{Category, EssaySubmission, FeedbackReport};
use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

pub const PROVIDER_NAME: &str = "mock";

pub struct MockAnalyzer {
    scoring: ScoringConfig,
    delay: Duration,
    rng: Mutex<ChaCha8Rng>,
}

impl MockAnalyzer {
    /// Entropy-seeded analyzer
    pub fn new(scoring: ScoringConfig, delay: Duration) -> Self {
        Self {
            scoring,
            delay,
            rng: Mutex::new(ChaCha8Rng::from_rng(&mut rand::rng())),
        }
    }

    /// Replace the generator with a seeded one for reproducible output
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(ChaCha8Rng::seed_from_u64(seed));
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Draw one raw (unrounded) score per category, in report order
    fn sample_scores(&self) -> [(Category, f64); 4] {
        // A panicked sampler leaves the rng in a usable state
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Category::ALL.map(|category| {
            let unit: f64 = rng.random();
            (category, self.scoring.band(category).sample(unit))
        })
    }

    /// Score a submission immediately, without the artificial delay
    pub fn score(&self, submission: &EssaySubmission) -> FeedbackReport {
        let raw = self.sample_scores();
        build_report(submission, &raw, &self.scoring)
    }
}

/// Assemble a report from raw category scores.
///
/// Scores are rounded first so status and the overall score are derived from
/// the integers shown to the user.
pub fn build_report(
    submission: &EssaySubmission,
    raw_scores: &[(Category, f64)],
    scoring: &ScoringConfig,
) -> FeedbackReport {
    let stats = stats::text_stats(&submission.essay);
    let thresholds = scoring.thresholds();

    let feedback: Vec<_> = raw_scores
        .iter()
        .map(|&(category, raw)| {
            let score = raw.round().clamp(0.0, 100.0) as u8;
            tables::item(category, score, &thresholds)
        })
        .collect();

    let overall_score = FeedbackReport::mean_score(feedback.iter().map(|i| i.score));

    FeedbackReport {
        title: submission.title.clone(),
        overall_score,
        feedback,
        strengths: tables::strengths(&stats, overall_score),
        improvements: tables::improvements(&stats),
        stats,
        provider: PROVIDER_NAME.to_string(),
    }
}

#[async_trait]
impl AnalysisProvider for MockAnalyzer {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn analyze(&self, submission: &EssaySubmission) -> AnalysisResult<FeedbackReport> {
        debug!(
            "Mock analysis of '{}' ({} bytes), delay {:?}",
            submission.title,
            submission.essay.len(),
            self.delay
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let report = self.score(submission);
        debug!("Mock analysis finished: overall {}", report.overall_score);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use proptest::prelude::*;

    fn analyzer(seed: u64) -> MockAnalyzer {
        MockAnalyzer::new(ScoringConfig::default(), Duration::from_millis(3000)).with_seed(seed)
    }

    fn fifty_words() -> EssaySubmission {
        EssaySubmission::new("word ".repeat(50), "Test")
    }

    fn assert_invariants(report: &FeedbackReport, scoring: &ScoringConfig) {
        assert_eq!(report.feedback.len(), 4);
        for (item, category) in report.feedback.iter().zip(Category::ALL) {
            assert_eq!(item.category, category);
            let (lo, hi) = scoring.band(category).bounds();
            assert!(f64::from(item.score) >= lo.floor() && f64::from(item.score) <= hi.ceil());
            assert_eq!(item.status, scoring.thresholds().classify(item.score));
            assert!((1..=3).contains(&item.suggestions.len()));
            assert!(!item.feedback.is_empty());
        }
        assert!(report.is_consistent());
        assert_eq!(report.strengths.len(), 4);
        assert_eq!(report.improvements.len(), 4);
    }

    #[test]
    fn test_fifty_repeated_words() {
        let report = analyzer(7).score(&fifty_words());
        assert_eq!(report.title, "Test");
        assert_eq!(report.stats.word_count, 50);
        assert_eq!(report.stats.sentence_count, 1);
        assert_eq!(report.provider, "mock");
        assert_eq!(
            report.strengths[0],
            "Essay length of 50 words is appropriate for detailed analysis"
        );
        assert_eq!(
            report.improvements[0],
            "Consider expanding your analysis with more examples"
        );
        assert_invariants(&report, &ScoringConfig::default());
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = analyzer(42).score(&fifty_words());
        let b = analyzer(42).score(&fifty_words());
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_report_rounds_before_status() {
        let submission = fifty_words();
        let raw = [
            (Category::Grammar, 84.5),
            (Category::Structure, 69.4),
            (Category::Coherence, 70.0),
            (Category::Style, 60.0),
        ];
        let report = build_report(&submission, &raw, &ScoringConfig::default());
        let grammar = report.item(Category::Grammar).expect("grammar card");
        assert_eq!(grammar.score, 85);
        assert_eq!(grammar.status, Status::Excellent);
        assert_eq!(grammar.suggestions.len(), 1);

        let structure = report.item(Category::Structure).expect("structure card");
        assert_eq!(structure.score, 69);
        assert_eq!(structure.status, Status::NeedsImprovement);

        // (85 + 69 + 70 + 60) / 4 = 71
        assert_eq!(report.overall_score, 71);
        assert_eq!(report.strengths[3], "Shows good writing fundamentals");
    }

    #[test]
    fn test_capped_band_never_exceeds_cap() {
        let mut scoring = ScoringConfig::default();
        scoring.style = crate::config::ScoreBand::new(80.0, 50.0, 82.0);
        let a = MockAnalyzer::new(scoring.clone(), Duration::ZERO).with_seed(3);
        for _ in 0..20 {
            let report = a.score(&fifty_words());
            assert!(report.item(Category::Style).map(|i| i.score).unwrap_or(0) <= 82);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_waits_for_delay() {
        let a = analyzer(1);
        let start = tokio::time::Instant::now();
        let report = a.analyze(&fifty_words()).await.expect("mock never fails");
        assert!(start.elapsed() >= Duration::from_millis(3000));
        assert_invariants(&report, &ScoringConfig::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_invocations_are_independent() {
        let a = std::sync::Arc::new(analyzer(9));
        let short = EssaySubmission::new("one two three. four five.", "Short");
        let long = fifty_words();

        let (first, second) = tokio::join!(a.analyze(&short), a.analyze(&long));
        let first = first.expect("mock never fails");
        let second = second.expect("mock never fails");
        assert_eq!(first.title, "Short");
        assert_eq!(first.stats.word_count, 5);
        assert_eq!(second.title, "Test");
        assert_eq!(second.stats.word_count, 50);
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let a = MockAnalyzer::new(ScoringConfig::default(), Duration::ZERO);
        let report = a.analyze(&fifty_words()).await.expect("mock never fails");
        assert!(report.is_consistent());
    }

    proptest! {
        #[test]
        fn prop_reports_satisfy_invariants(seed in any::<u64>(), words in 1usize..400) {
            let essay = "lorem ipsum dolor. ".repeat(words);
            let submission = EssaySubmission::new(essay, "");
            let report = analyzer(seed).score(&submission);
            prop_assert_eq!(report.title.as_str(), "Untitled Essay");
            prop_assert_eq!(report.stats.word_count, words * 3);
            prop_assert_eq!(report.stats.avg_words_per_sentence, 3);
            assert_invariants(&report, &ScoringConfig::default());
        }
    }
}
