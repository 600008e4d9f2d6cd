//! Text statistics used by the scoring pipeline

use crate::models::TextStats;
use regex::Regex;
use std::sync::OnceLock;

fn sentence_break() -> &'static Regex {
    static SENTENCE_BREAK: OnceLock<Regex> = OnceLock::new();
    SENTENCE_BREAK.get_or_init(|| Regex::new(r"[.!?]+").expect("valid regex"))
}

/// Number of whitespace-delimited non-empty tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of non-blank segments between runs of `.`, `!` or `?`
pub fn sentence_count(text: &str) -> usize {
    sentence_break()
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

/// Word, sentence and average-sentence-length figures for an essay.
///
/// An essay with no sentence segments (e.g. only punctuation) is averaged
/// as a single sentence; `sentence_count` still reports 0.
pub fn text_stats(text: &str) -> TextStats {
    let word_count = word_count(text);
    let sentence_count = sentence_count(text);
    let denominator = sentence_count.max(1);
    // Integer round-half-up of word_count / denominator
    let avg_words_per_sentence = (2 * word_count + denominator) / (2 * denominator);

    TextStats {
        word_count,
        sentence_count,
        avg_words_per_sentence,
    }
}
