//! Configuration module for EssaySpark
//!
//! This module handles:
//! - Project-level configuration (essayspark.toml): provider, delay, score bands
//! - User-level configuration (~/.config/essayspark/config.toml): AI backend and keys

mod project_config;
mod user_config;

pub use project_config::{
    AnalysisConfig,
    ProjectConfig,
    ProviderKind,
    ScoreBand,
    ScoringConfig,
    CONFIG_FILE_NAMES,
    EXAMPLE_PROJECT_CONFIG,
    load_project_config,
};
pub use user_config::{AiConfig, ApiKey, KeySource, UserConfig};
