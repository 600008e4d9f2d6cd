//! Doctor command - check configuration and AI backend setup

use anyhow::Result;
use std::path::Path;

use crate::ai::LlmBackend;
use crate::config::{load_project_config, AiConfig, ProviderKind, UserConfig};

pub fn run(project_dir: &Path) -> Result<()> {
    println!("🩺 EssaySpark Doctor\n");

    let mut problems = 0;

    let project = load_project_config(project_dir);
    match project.scoring.validate() {
        Ok(()) => println!("✓ Scoring configuration: OK"),
        Err(e) => {
            problems += 1;
            println!("✗ Scoring configuration: {}", e);
        }
    }
    println!(
        "✓ Provider: {} (delay {} ms, min {} words)",
        project.analysis.provider, project.analysis.delay_ms, project.analysis.min_words
    );

    let user = UserConfig::load();
    let llm_selected = project.analysis.provider == ProviderKind::Llm;
    match user.backend() {
        Ok(backend) => match user.api_key(backend) {
            Some(key) => println!(
                "✓ AI backend: {} ({}, key: {}) ready for --provider llm",
                backend.name(),
                user.model(backend),
                key.source
            ),
            None => {
                println!("○ AI backend: {} has no API key", backend.name());
                println!("  {}", missing_key_hint(backend));
                if llm_selected {
                    problems += 1;
                }
            }
        },
        Err(e) => {
            problems += 1;
            println!("✗ AI backend: {}", e);
        }
    }

    if problems == 0 {
        println!("\n✅ All checks passed!");
        Ok(())
    } else {
        anyhow::bail!("{} problem(s) found", problems)
    }
}

/// How to supply the key for a hosted backend
pub(super) fn missing_key_hint(backend: LlmBackend) -> String {
    match AiConfig::key_field(backend) {
        Some(field) => format!(
            "Set {} or run `essayspark config set ai.{} <key>` ({})",
            backend.env_key(),
            field,
            backend.signup_url()
        ),
        None => format!("No key needed: {}", backend.signup_url()),
    }
}
