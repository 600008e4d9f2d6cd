//! EssaySpark - instant writing feedback for essays
//!
//! Scores an essay in four categories (grammar, structure, coherence and
//! style) through a pluggable [`AnalysisProvider`], and renders the result
//! as terminal text, JSON, Markdown or HTML.

pub mod ai;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod models;
pub mod reporters;
pub mod submission;
pub mod ui;

pub use analysis::{build_provider, AnalysisError, AnalysisProvider, LlmAnalyzer, MockAnalyzer};
pub use models::{Category, EssaySubmission, FeedbackItem, FeedbackReport, Status};
