//! Core data models for EssaySpark
//!
//! These models are shared by the analysis providers, the reporters and the
//! terminal UI. Reports serialize to camelCase JSON (`overallScore`, ...).

use serde::{Deserialize, Serialize};

/// Title used when a submission arrives without one
pub const DEFAULT_TITLE: &str = "Untitled Essay";

/// An essay handed to an analysis provider. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssaySubmission {
    pub essay: String,
    pub title: String,
}

impl EssaySubmission {
    /// Build a submission, defaulting a blank title to "Untitled Essay"
    pub fn new(essay: impl Into<String>, title: impl AsRef<str>) -> Self {
        let title = title.as_ref().trim();
        Self {
            essay: essay.into(),
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title.to_string()
            },
        }
    }
}

/// The four fixed writing-quality dimensions
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Category {
    #[serde(rename = "Grammar & Mechanics")]
    Grammar,
    #[serde(rename = "Structure & Organization")]
    Structure,
    #[serde(rename = "Coherence & Flow")]
    Coherence,
    #[serde(rename = "Style & Voice")]
    Style,
}

impl Category {
    /// Report order
    pub const ALL: [Category; 4] = [
        Category::Grammar,
        Category::Structure,
        Category::Coherence,
        Category::Style,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Grammar => "Grammar & Mechanics",
            Category::Structure => "Structure & Organization",
            Category::Coherence => "Coherence & Flow",
            Category::Style => "Style & Voice",
        }
    }

    /// Short key used in config files and LLM responses
    pub fn key(&self) -> &'static str {
        match self {
            Category::Grammar => "grammar",
            Category::Structure => "structure",
            Category::Coherence => "coherence",
            Category::Style => "style",
        }
    }

    /// Resolve either the short key or the full label
    pub fn parse(s: &str) -> Option<Category> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative status band derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Status {
    /// Classify with the default 85 / 70 thresholds
    pub fn from_score(score: u8) -> Status {
        StatusThresholds::default().classify(score)
    }

    /// Badge text, e.g. "NEEDS IMPROVEMENT"
    pub fn label(&self) -> &'static str {
        match self {
            Status::Excellent => "EXCELLENT",
            Status::Good => "GOOD",
            Status::NeedsImprovement => "NEEDS IMPROVEMENT",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Excellent => write!(f, "excellent"),
            Status::Good => write!(f, "good"),
            Status::NeedsImprovement => write!(f, "needs-improvement"),
        }
    }
}

/// Score thresholds for the status bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// Minimum score for `excellent`
    pub excellent: u8,
    /// Minimum score for `good`
    pub good: u8,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            excellent: 85,
            good: 70,
        }
    }
}

impl StatusThresholds {
    pub fn classify(&self, score: u8) -> Status {
        match score {
            s if s >= self.excellent => Status::Excellent,
            s if s >= self.good => Status::Good,
            _ => Status::NeedsImprovement,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.good < self.excellent && self.excellent <= 100
    }
}

/// Basic text statistics computed before scoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: usize,
}

/// One scored category card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub category: Category,
    pub score: u8,
    pub status: Status,
    pub feedback: String,
    pub suggestions: Vec<String>,
}

/// The result of analysing one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    pub title: String,
    pub overall_score: u8,
    pub feedback: Vec<FeedbackItem>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(default)]
    pub stats: TextStats,
    /// Name of the provider that produced this report
    #[serde(default)]
    pub provider: String,
}

impl FeedbackReport {
    /// Rounded arithmetic mean of category scores (0 for none)
    pub fn mean_score<I>(scores: I) -> u8
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = scores
            .into_iter()
            .fold((0u32, 0u32), |(sum, n), s| (sum + u32::from(s), n + 1));
        if count == 0 {
            return 0;
        }
        // Integer round-half-up
        ((2 * sum + count) / (2 * count)).min(100) as u8
    }

    /// Card for a category, if present
    pub fn item(&self, category: Category) -> Option<&FeedbackItem> {
        self.feedback.iter().find(|i| i.category == category)
    }

    /// Whether `overall_score` matches the category scores
    pub fn is_consistent(&self) -> bool {
        self.overall_score == Self::mean_score(self.feedback.iter().map(|i| i.score))
    }
}

/// Visual weight of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

/// A user-facing message (toast)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
