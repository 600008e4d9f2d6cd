//! Analyze command - score one essay and render the report

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::analysis::build_provider;
use crate::config::{ProjectConfig, UserConfig};
use crate::reporters::{self, OutputFormat};
use crate::submission::{load_text_file, validate};

pub struct AnalyzeArgs<'a> {
    pub file: Option<&'a Path>,
    pub title: Option<&'a str>,
    pub format: &'a str,
    pub output: Option<&'a Path>,
    pub project: &'a ProjectConfig,
}

pub fn run(args: AnalyzeArgs<'_>) -> Result<()> {
    let format = OutputFormat::from_str(args.format)?;

    let essay = read_essay(args.file)?;
    let title = args.title.map(str::to_string).unwrap_or_else(|| {
        args.file
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    // Rejected essays never reach a provider
    let submission = validate(&essay, &title, args.project.analysis.min_words)
        .map_err(|e| anyhow::anyhow!("{}", e.notice()))?;

    let user = UserConfig::load();
    let provider = build_provider(args.project, &user)?;
    info!(
        "Analyzing '{}' with the {} provider",
        submission.title,
        provider.name()
    );

    let spinner = (std::io::stderr().is_terminal()).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(create_spinner_style());
        pb.set_message("Analyzing essay...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let result = rt.block_on(provider.analyze(&submission));

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let report = result?;

    let mut output =
        reporters::report_with_format(&report, format, args.project.scoring.thresholds())?;
    // Colors only make sense on a terminal
    let to_terminal = args.output.is_none() && std::io::stdout().is_terminal();
    if reporters::is_terminal_format(format) && !to_terminal {
        output = reporters::strip_ansi(&output);
    }
    match args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{}Report written to: {}",
                style("📄 ").bold(),
                style(path.display()).cyan()
            );
        }
        None => println!("{}", output),
    }

    Ok(())
}

/// Read the essay from a .txt file, or stdin when no file (or "-") is given
fn read_essay(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => {
            load_text_file(path).map_err(|e| anyhow::anyhow!("{}\n  {}", e.notice(), e))
        }
        _ => {
            let mut essay = String::new();
            std::io::stdin()
                .read_to_string(&mut essay)
                .context("Failed to read essay from stdin")?;
            Ok(essay)
        }
    }
}

/// Create spinner style
fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
