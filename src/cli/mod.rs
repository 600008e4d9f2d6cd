//! CLI command definitions and handlers

mod analyze;
mod doctor;
mod init;
mod templates;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::ai::LlmBackend;
use crate::config::{
    load_project_config, AiConfig, ApiKey, ProjectConfig, ProviderKind, UserConfig,
    CONFIG_FILE_NAMES,
};

/// EssaySpark - instant feedback on student essays
#[derive(Parser, Debug)]
#[command(name = "essayspark")]
#[command(
    version,
    about = "Instant writing feedback for essays: grammar, structure, coherence and style",
    long_about = "EssaySpark scores an essay in four categories (Grammar & Mechanics, \
Structure & Organization, Coherence & Flow, Style & Voice) and lists strengths, \
areas for improvement and concrete suggestions.\n\n\
The default provider produces placeholder feedback locally. Configure an LLM \
backend (Anthropic, OpenAI, OpenRouter, DeepInfra or a local Ollama) to get \
model-graded feedback.",
    after_help = "\
Examples:
  essayspark analyze essay.txt                 Analyze a plain-text essay
  cat essay.txt | essayspark analyze           Read the essay from stdin
  essayspark analyze essay.txt --format json   JSON output for scripting
  essayspark templates                         List essay templates
  essayspark tui                               Interactive terminal UI"
)]
pub struct Cli {
    /// Directory searched for essayspark.toml (default: current directory)
    #[arg(long, short = 'C', global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an essayspark.toml with example settings
    Init,

    /// Analyze an essay and print feedback
    #[command(after_help = "\
Examples:
  essayspark analyze essay.txt --title \"On Rivers\"
  essayspark analyze essay.txt --format html -o feedback.html
  essayspark analyze essay.txt --provider llm
  essayspark analyze essay.txt --delay-ms 0 --seed 7   Reproducible mock scores")]
    Analyze {
        /// Plain-text (.txt) essay file; reads stdin when absent or "-"
        file: Option<PathBuf>,

        /// Essay title (default: "Untitled Essay")
        #[arg(long, short = 't')]
        title: Option<String>,

        /// Output format: text, compact, json, markdown (or md), html
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "compact", "json", "markdown", "md", "html"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Analysis provider: mock or llm (overrides essayspark.toml)
        #[arg(long, value_parser = ["mock", "llm"])]
        provider: Option<String>,

        /// Artificial delay of the mock provider in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Seed for reproducible mock scores
        #[arg(long)]
        seed: Option<u64>,

        /// Minimum number of words accepted
        #[arg(long)]
        min_words: Option<usize>,
    },

    /// List the built-in essay templates
    Templates {
        /// Print templates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive terminal UI
    Tui {
        /// Plain-text (.txt) essay to load into the editor
        file: Option<PathBuf>,
    },

    /// Check configuration and AI backend setup
    Doctor,

    /// Show version information
    Version,

    /// Manage user configuration (init, show, or set config values)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize user config file with example settings
    Init,
    /// Show current config and paths
    Show,
    /// Set a config value
    Set {
        /// Config key (e.g., ai.anthropic_api_key)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => init::run(&cli.project_dir),

        Commands::Analyze {
            file,
            title,
            format,
            output,
            provider,
            delay_ms,
            seed,
            min_words,
        } => {
            let mut project = load_project_config(&cli.project_dir);
            apply_overrides(&mut project, provider.as_deref(), delay_ms, seed, min_words)?;
            analyze::run(analyze::AnalyzeArgs {
                file: file.as_deref(),
                title: title.as_deref(),
                format: &format,
                output: output.as_deref(),
                project: &project,
            })
        }

        Commands::Templates { json } => templates::run(json),

        Commands::Tui { file } => {
            let project = load_project_config(&cli.project_dir);
            tui::run(&project, file.as_deref())
        }

        Commands::Doctor => doctor::run(&cli.project_dir),

        Commands::Version => {
            println!("essayspark {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        Commands::Config { action } => run_config_action(action, &cli.project_dir),
    }
}

/// Apply command-line overrides on top of the project configuration
fn apply_overrides(
    project: &mut ProjectConfig,
    provider: Option<&str>,
    delay_ms: Option<u64>,
    seed: Option<u64>,
    min_words: Option<usize>,
) -> Result<()> {
    if let Some(p) = provider {
        project.analysis.provider = p.parse::<ProviderKind>()?;
    }
    if let Some(ms) = delay_ms {
        project.analysis.delay_ms = ms;
    }
    if seed.is_some() {
        project.analysis.seed = seed;
    }
    if let Some(n) = min_words {
        project.analysis.min_words = n;
    }
    Ok(())
}

fn set_config_value(key: &str, value: &str) -> Result<()> {
    let config_path = UserConfig::user_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

    let mut content = if config_path.exists() {
        std::fs::read_to_string(&config_path)?
    } else {
        UserConfig::init_user_config()?;
        std::fs::read_to_string(&config_path)?
    };

    content = set_toml_value(&content, key, value)?;
    std::fs::write(&config_path, content)?;
    println!("✅ Set {} in {}", key, config_path.display());
    Ok(())
}

/// Set `key` (with or without the `ai.` prefix) inside the `[ai]` table text
fn set_toml_value(content: &str, key: &str, value: &str) -> Result<String> {
    let toml_key = key.strip_prefix("ai.").unwrap_or(key);
    if !AiConfig::FIELDS.contains(&toml_key) {
        anyhow::bail!(
            "Unknown config key '{}'. Known keys: {}",
            key,
            AiConfig::FIELDS.join(", ")
        );
    }

    // TOML basic string, escaped by the toml crate
    let line = format!("{} = {}", toml_key, toml::Value::String(value.to_string()));
    let re = regex::Regex::new(&format!(r"(?m)^#?\s*{}\s*=.*$", regex::escape(toml_key)))?;
    let mut content = if re.is_match(content) {
        re.replace(content, regex::NoExpand(&line)).to_string()
    } else {
        let mut c = content.to_string();
        if !c.contains("[ai]") {
            c.push_str("\n[ai]\n");
        }
        c.push_str(&line);
        c.push('\n');
        c
    };
    if !content.ends_with('\n') {
        content.push('\n');
    }
    Ok(content)
}

fn run_config_action(action: ConfigAction, project_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = UserConfig::init_user_config()?;
            println!("✅ Config initialized at: {}", path.display());
            println!("\nEdit to add your API key:");
            println!("  {}", path.display());
            println!("\nOr set via environment:");
            println!("  export ANTHROPIC_API_KEY=\"sk-ant-...\"");
            Ok(())
        }
        ConfigAction::Show => show_config(project_dir),
        ConfigAction::Set { key, value } => set_config_value(&key, &value),
    }
}

fn show_config(project_dir: &Path) -> Result<()> {

    let config = UserConfig::load();
    let project = load_project_config(project_dir);

    println!("📁 Config paths:");
    if let Some(user_path) = UserConfig::user_config_path() {
        let status = if user_path.exists() { "✓" } else { "(not found)" };
        println!("  User:    {} {}", user_path.display(), status);
    }
    let found = CONFIG_FILE_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|p| p.exists());
    match found {
        Some(p) => println!("  Project: {} ✓", p.display()),
        None => println!(
            "  Project: {} (not found)",
            project_dir.join(CONFIG_FILE_NAMES[0]).display()
        ),
    }
    println!();
    println!("📝 Analysis:");
    println!("  Provider:  {}", project.analysis.provider);
    println!("  Delay:     {} ms", project.analysis.delay_ms);
    println!("  Min words: {}", project.analysis.min_words);
    println!(
        "  Status:    excellent >= {}, good >= {}",
        project.scoring.excellent_threshold, project.scoring.good_threshold
    );
    println!();
    println!("🤖 AI Backend: {}", config.backend_name());
    for line in backend_status(&config, |backend| config.api_key(backend)) {
        println!("  {}", line);
    }
    Ok(())
}

/// Model and credential lines for the configured backend
fn backend_status(
    config: &UserConfig,
    api_key: impl Fn(LlmBackend) -> Option<ApiKey>,
) -> Vec<String> {
    let backend = match config.backend() {
        Ok(backend) => backend,
        Err(e) => return vec![format!("✗ {}", e)],
    };
    let mut lines = vec![format!("Model:   {}", config.model(backend))];
    if backend == LlmBackend::Ollama {
        lines.push(format!("URL:     {}", config.ollama_url()));
        return lines;
    }
    lines.push(match api_key(backend) {
        Some(key) => format!("API key: ✓ configured ({})", key.source),
        None => format!("API key: ✗ not set. {}", doctor::missing_key_hint(backend)),
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "essayspark",
            "analyze",
            "essay.txt",
            "--format",
            "json",
            "--delay-ms",
            "0",
            "--seed",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                file,
                format,
                delay_ms,
                seed,
                ..
            } => {
                assert_eq!(file, Some(PathBuf::from("essay.txt")));
                assert_eq!(format, "json");
                assert_eq!(delay_ms, Some(0));
                assert_eq!(seed, Some(3));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["essayspark", "analyze", "--format", "sarif"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let mut project = ProjectConfig::default();
        apply_overrides(&mut project, Some("llm"), Some(0), Some(5), Some(10)).unwrap();
        assert_eq!(project.analysis.provider, ProviderKind::Llm);
        assert_eq!(project.analysis.delay_ms, 0);
        assert_eq!(project.analysis.seed, Some(5));
        assert_eq!(project.analysis.min_words, 10);
    }

    #[test]
    fn test_set_toml_value_uncomments_existing_key() {
        let content = "[ai]\n# backend = \"anthropic\"\n# model = \"x\"\n";
        let out = set_toml_value(content, "ai.backend", "ollama").unwrap();
        assert!(out.contains("backend = \"ollama\"\n"));
        assert!(out.contains("# model = \"x\""));
        let parsed: UserConfig = toml::from_str(&out).unwrap();
        assert_eq!(parsed.ai.backend.as_deref(), Some("ollama"));
    }

    #[test]
    fn test_set_toml_value_appends_missing_key() {
        let out = set_toml_value("", "model", "gpt-4o").unwrap();
        assert_eq!(out, "\n[ai]\nmodel = \"gpt-4o\"\n");
        assert!(set_toml_value("", "colour", "blue").is_err());
    }

    #[test]
    fn test_set_toml_value_escapes_special_characters() {
        let content = "[ai]\n# model = \"x\"\n";
        for value in ["gpt\u{7f}4", "say \"hi\"", "back\\slash", "nul\0byte"] {
            let out = set_toml_value(content, "ai.model", value).unwrap();
            let parsed: UserConfig = toml::from_str(&out).unwrap();
            assert_eq!(parsed.ai.model.as_deref(), Some(value));
        }
    }

    #[test]
    fn test_set_toml_value_accepts_every_backend_key() {
        let out = set_toml_value("", "ai.openrouter_api_key", "sk-or-1").unwrap();
        let parsed: UserConfig = toml::from_str(&out).unwrap();
        assert_eq!(parsed.ai.openrouter_api_key.as_deref(), Some("sk-or-1"));
    }

    #[test]
    fn test_backend_status_checks_the_selected_backend() {
        let mut config = UserConfig::default();
        config.ai.backend = Some("openrouter".to_string());
        config.ai.anthropic_api_key = Some("sk-ant".to_string());

        let lines = backend_status(&config, |b| config.api_key_with(b, |_| None));
        assert!(lines.iter().any(|l| l.contains("✗ not set")), "{:?}", lines);
        assert!(lines.iter().any(|l| l.contains("OPENROUTER_API_KEY")));

        let lines = backend_status(&config, |b| {
            config.api_key_with(b, |name| {
                (name == "OPENROUTER_API_KEY").then(|| "sk-or".to_string())
            })
        });
        assert!(lines.iter().any(|l| l.contains("✓ configured (environment)")));
    }

    #[test]
    fn test_backend_status_for_ollama_and_unknown() {
        let mut config = UserConfig::default();
        config.ai.backend = Some("ollama".to_string());
        let lines = backend_status(&config, |_| None);
        assert_eq!(lines, vec!["Model:   llama3.1", "URL:     http://localhost:11434"]);

        config.ai.backend = Some("gemini".to_string());
        let lines = backend_status(&config, |_| None);
        assert!(lines[0].starts_with("✗ "));
    }
}
