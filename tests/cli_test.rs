//! CLI contract tests
//!
//! Runs the built binary against essays written to a temp directory and
//! checks exit status and output for each command.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn essayspark_bin() -> &'static str {
    env!("CARGO_BIN_EXE_essayspark")
}

/// Command rooted in `dir`, isolated from the caller's config and log settings
fn command(dir: &Path) -> Command {
    let mut cmd = Command::new(essayspark_bin());
    cmd.arg("-C")
        .arg(dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("HOME", dir)
        .env_remove("RUST_LOG");
    cmd
}

fn essay(words: usize) -> String {
    let sentence = "The river carries stories from the mountains to the sea.";
    let per_sentence = sentence.split_whitespace().count();
    let mut text = String::new();
    for _ in 0..words.div_ceil(per_sentence) {
        text.push_str(sentence);
        text.push(' ');
    }
    text
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_analyze_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rivers.txt");
    std::fs::write(&path, essay(60)).unwrap();

    let output = command(dir.path())
        .args(["analyze", "--delay-ms", "0", "--seed", "1", "--format", "json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["title"], "rivers");
    let feedback = report["feedback"].as_array().unwrap();
    assert_eq!(feedback.len(), 4);

    let categories: Vec<&str> = feedback
        .iter()
        .map(|f| f["category"].as_str().unwrap())
        .collect();
    assert_eq!(
        categories,
        [
            "Grammar & Mechanics",
            "Structure & Organization",
            "Coherence & Flow",
            "Style & Voice"
        ]
    );

    // Default bands (base, cap) in category order
    let bands = [(70, 95), (65, 90), (68, 88), (60, 85)];
    let scores: Vec<u64> = feedback
        .iter()
        .map(|f| f["score"].as_u64().unwrap())
        .collect();
    for (score, (low, high)) in scores.iter().zip(bands) {
        assert!(
            (low..=high).contains(score),
            "score {} outside {}..={}",
            score,
            low,
            high
        );
    }
    let sum: u64 = scores.iter().sum();
    let expected = (sum * 2 + 4) / 8;
    assert_eq!(report["overallScore"].as_u64().unwrap(), expected);
    assert_eq!(report["stats"]["wordCount"], 60);
}

#[test]
fn test_seeded_runs_match() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("essay.txt");
    std::fs::write(&path, essay(80)).unwrap();

    let run = || {
        let output = command(dir.path())
            .args(["analyze", "--delay-ms", "0", "--seed", "42", "-f", "json"])
            .arg(&path)
            .output()
            .unwrap();
        assert!(output.status.success());
        stdout(&output)
    };
    assert_eq!(run(), run());
}

#[test]
fn test_analyze_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = command(dir.path())
        .args(["analyze", "--delay-ms", "0", "--title", "Piped", "-f", "compact"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(essay(55).as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Piped"));
}

#[test]
fn test_short_essay_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.txt");
    std::fs::write(&path, essay(20)).unwrap();

    let output = command(dir.path())
        .args(["analyze", "--delay-ms", "0"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Essay Too Short"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_min_words_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.txt");
    std::fs::write(&path, essay(20)).unwrap();

    let output = command(dir.path())
        .args(["analyze", "--delay-ms", "0", "--min-words", "10"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_non_txt_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("essay.pdf");
    std::fs::write(&path, essay(60)).unwrap();

    let output = command(dir.path())
        .args(["analyze", "--delay-ms", "0"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid File"));
}

#[test]
fn test_project_config_min_words() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("essayspark.toml"),
        "[analysis]\ndelay_ms = 0\nmin_words = 100\n",
    )
    .unwrap();
    let path = dir.path().join("essay.txt");
    std::fs::write(&path, essay(60)).unwrap();

    let output = command(dir.path()).arg("analyze").arg(&path).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("at least 100 words"));
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("essay.txt");
    std::fs::write(&path, essay(60)).unwrap();
    let out = dir.path().join("feedback.html");

    let output = command(dir.path())
        .args(["analyze", "--delay-ms", "0", "-f", "html", "-o"])
        .arg(&out)
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("<html"));
    assert!(html.contains("Grammar &amp; Mechanics"));
}

#[test]
fn test_text_output_file_has_no_colors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("essay.txt");
    std::fs::write(&path, essay(60)).unwrap();
    let out = dir.path().join("feedback.txt");

    let output = command(dir.path())
        .args(["analyze", "--delay-ms", "0", "-f", "text", "-o"])
        .arg(&out)
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("Overall Writing Quality:"));
    assert!(!text.contains('\x1b'));
}

#[test]
fn test_templates_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path())
        .args(["templates", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let templates: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let templates = templates.as_array().unwrap();
    assert_eq!(templates.len(), 4);
    assert_eq!(templates[0]["title"], "Argumentative Essay");
}

#[test]
fn test_init_writes_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path()).arg("init").output().unwrap();
    assert!(output.status.success());

    let config = std::fs::read_to_string(dir.path().join("essayspark.toml")).unwrap();
    assert!(config.contains("[analysis]"));
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path()).arg("version").output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}
