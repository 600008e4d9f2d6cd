//! Essay submission: validation, plain-text upload and the editable draft

pub mod templates;

pub use templates::{Template, TEMPLATES};

use crate::analysis::stats::word_count;
use crate::models::{EssaySubmission, Notice};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Minimum words accepted when no configuration says otherwise
pub const DEFAULT_MIN_WORDS: usize = 50;

/// Reasons a draft cannot be submitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("essay is empty")]
    EmptyEssay,

    #[error("essay has {words} words, at least {min} required")]
    TooShort { words: usize, min: usize },
}

impl SubmissionError {
    pub fn notice(&self) -> Notice {
        match self {
            SubmissionError::EmptyEssay => Notice::error(
                "Essay Required",
                "Please enter your essay content before submitting.",
            ),
            SubmissionError::TooShort { min, .. } => Notice::error(
                "Essay Too Short",
                format!(
                    "Please submit an essay with at least {} words for meaningful analysis.",
                    min
                ),
            ),
        }
    }
}

/// Reasons a file cannot be loaded as an essay
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("unsupported file type: {0} (only .txt files are accepted)")]
    UnsupportedType(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    pub fn notice(&self) -> Notice {
        match self {
            UploadError::UnsupportedType(_) => {
                Notice::error("Invalid File", "Please upload a .txt file only.")
            }
            UploadError::Io { path, .. } => {
                Notice::error("Upload Failed", format!("Could not read {}.", path))
            }
        }
    }
}

pub fn upload_success_notice() -> Notice {
    Notice::info("File Uploaded", "Your essay has been loaded successfully.")
}

/// Check an essay against the submission rules.
///
/// A blank title becomes "Untitled Essay". Words are whitespace-delimited.
pub fn validate(
    essay: &str,
    title: &str,
    min_words: usize,
) -> Result<EssaySubmission, SubmissionError> {
    if essay.trim().is_empty() {
        return Err(SubmissionError::EmptyEssay);
    }
    let words = word_count(essay);
    if words < min_words {
        return Err(SubmissionError::TooShort {
            words,
            min: min_words,
        });
    }
    Ok(EssaySubmission::new(essay, title))
}

/// Read a plain-text essay file.
///
/// Only `.txt` files (any case) with UTF-8 content are accepted.
pub fn load_text_file(path: &Path) -> Result<String, UploadError> {
    let display = path.display().to_string();
    let is_txt = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if !is_txt {
        return Err(UploadError::UnsupportedType(display));
    }

    let bytes = std::fs::read(path).map_err(|source| UploadError::Io {
        path: display.clone(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| UploadError::UnsupportedType(display))?;
    debug!("Loaded {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Editable essay state behind the submission form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssayDraft {
    pub essay: String,
    pub title: String,
    pub min_words: usize,
}

impl Default for EssayDraft {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_WORDS)
    }
}

impl EssayDraft {
    pub fn new(min_words: usize) -> Self {
        Self {
            essay: String::new(),
            title: String::new(),
            min_words,
        }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.essay)
    }

    /// Replace the essay with a file's contents. On error the draft is untouched.
    pub fn apply_upload(&mut self, path: &Path) -> Result<Notice, UploadError> {
        let text = load_text_file(path)?;
        self.essay = text;
        Ok(upload_success_notice())
    }

    pub fn apply_template(&mut self, template: &Template) {
        self.essay = template.prompt.to_string();
        self.title = template.title.to_string();
    }

    pub fn submit(&self) -> Result<EssaySubmission, SubmissionError> {
        validate(&self.essay, &self.title, self.min_words)
    }

    pub fn clear(&mut self) {
        self.essay.clear();
        self.title.clear();
    }
}
