//! Project-level configuration support
//!
//! Loads configuration from `essayspark.toml` or `.essaysparkrc.json` in the
//! working directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # essayspark.toml
//!
//! [analysis]
//! provider = "mock"   # or "llm"
//! delay_ms = 3000
//! min_words = 50
//!
//! [scoring]
//! excellent_threshold = 85
//! good_threshold = 70
//! grammar = { base = 70.0, range = 25.0, cap = 95.0 }
//! style = { base = 60.0, range = 25.0, cap = 85.0 }
//! ```

use crate::models::{Category, StatusThresholds};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// File names searched, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &["essayspark.toml", ".essaysparkrc.json"];

/// Which analysis provider to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Randomized placeholder scoring
    #[default]
    Mock,
    /// LLM-backed scoring via the configured AI backend
    Llm,
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(ProviderKind::Mock),
            "llm" | "ai" => Ok(ProviderKind::Llm),
            _ => anyhow::bail!("Unknown provider '{}'. Valid providers: mock, llm", s),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Mock => write!(f, "mock"),
            ProviderKind::Llm => write!(f, "llm"),
        }
    }
}

/// Project-level configuration loaded from essayspark.toml or similar
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProjectConfig {
    /// Provider selection and submission rules
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Score bands and status thresholds
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Analysis settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Provider used for every submission (default: mock)
    #[serde(default)]
    pub provider: ProviderKind,

    /// Artificial delay of the mock provider in milliseconds (default: 3000)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Minimum whitespace-delimited words accepted for submission (default: 50)
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Fixed seed for the mock provider's scores (default: random per run)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            delay_ms: default_delay_ms(),
            min_words: default_min_words(),
            seed: None,
        }
    }
}

impl AnalysisConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_delay_ms() -> u64 {
    3000
}
fn default_min_words() -> usize {
    50
}

/// A sampling band: `min(cap, base + U[0,1) * range)`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScoreBand {
    pub base: f64,
    pub range: f64,
    pub cap: f64,
}

impl ScoreBand {
    pub const fn new(base: f64, range: f64, cap: f64) -> Self {
        Self { base, range, cap }
    }

    /// Map a unit sample in [0, 1) onto the band
    pub fn sample(&self, unit: f64) -> f64 {
        self.cap.min(self.base + unit * self.range)
    }

    /// Lowest and highest value the band can produce
    pub fn bounds(&self) -> (f64, f64) {
        (self.base, self.cap.min(self.base + self.range))
    }

    pub fn is_valid(&self) -> bool {
        self.range >= 0.0
            && self.cap >= self.base
            && (0.0..=100.0).contains(&self.base)
            && (0.0..=100.0).contains(&self.cap)
    }
}

/// Scoring configuration for the mock provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    #[serde(default = "default_grammar_band")]
    pub grammar: ScoreBand,
    #[serde(default = "default_structure_band")]
    pub structure: ScoreBand,
    #[serde(default = "default_coherence_band")]
    pub coherence: ScoreBand,
    #[serde(default = "default_style_band")]
    pub style: ScoreBand,

    /// Minimum score for `excellent` (default: 85)
    #[serde(default = "default_excellent_threshold")]
    pub excellent_threshold: u8,

    /// Minimum score for `good` (default: 70)
    #[serde(default = "default_good_threshold")]
    pub good_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            grammar: default_grammar_band(),
            structure: default_structure_band(),
            coherence: default_coherence_band(),
            style: default_style_band(),
            excellent_threshold: default_excellent_threshold(),
            good_threshold: default_good_threshold(),
        }
    }
}

fn default_grammar_band() -> ScoreBand {
    ScoreBand::new(70.0, 25.0, 95.0)
}
fn default_structure_band() -> ScoreBand {
    ScoreBand::new(65.0, 25.0, 90.0)
}
fn default_coherence_band() -> ScoreBand {
    ScoreBand::new(68.0, 20.0, 88.0)
}
fn default_style_band() -> ScoreBand {
    ScoreBand::new(60.0, 25.0, 85.0)
}
fn default_excellent_threshold() -> u8 {
    85
}
fn default_good_threshold() -> u8 {
    70
}

impl ScoringConfig {
    /// Band for a category
    pub fn band(&self, category: Category) -> &ScoreBand {
        match category {
            Category::Grammar => &self.grammar,
            Category::Structure => &self.structure,
            Category::Coherence => &self.coherence,
            Category::Style => &self.style,
        }
    }

    pub fn thresholds(&self) -> StatusThresholds {
        StatusThresholds {
            excellent: self.excellent_threshold,
            good: self.good_threshold,
        }
    }

    /// Check bands and thresholds, describing the first problem found
    pub fn validate(&self) -> Result<(), String> {
        for category in Category::ALL {
            let band = self.band(category);
            if !band.is_valid() {
                return Err(format!(
                    "invalid score band for {}: base={} range={} cap={} \
                     (need 0 <= base <= cap <= 100 and range >= 0)",
                    category.key(),
                    band.base,
                    band.range,
                    band.cap
                ));
            }
        }
        if !self.thresholds().is_valid() {
            return Err(format!(
                "good_threshold ({}) must be below excellent_threshold ({}) and both <= 100",
                self.good_threshold, self.excellent_threshold
            ));
        }
        Ok(())
    }
}

/// Load project configuration from a directory.
///
/// Searches for configuration files in this order:
/// 1. `essayspark.toml`
/// 2. `.essaysparkrc.json`
///
/// Returns default configuration if no config file is found or the file
/// cannot be parsed.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let toml_path = dir.join(CONFIG_FILE_NAMES[0]);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(CONFIG_FILE_NAMES[1]);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Example file written by `essayspark init`
pub const EXAMPLE_PROJECT_CONFIG: &str = r#"# EssaySpark configuration

[analysis]
# Analysis provider: "mock" (placeholder scores) or "llm" (needs an AI backend)
provider = "mock"

# Artificial delay of the mock provider, in milliseconds
delay_ms = 3000

# Minimum number of words accepted for submission
min_words = 50

[scoring]
# Status bands: score >= excellent_threshold is excellent,
# score >= good_threshold is good, anything lower needs improvement
excellent_threshold = 85
good_threshold = 70

# Mock score bands: min(cap, base + random * range)
grammar = { base = 70.0, range = 25.0, cap = 95.0 }
structure = { base = 65.0, range = 25.0, cap = 90.0 }
coherence = { base = 68.0, range = 20.0, cap = 88.0 }
style = { base = 60.0, range = 25.0, cap = 85.0 }
"#;
