//! Feedback copy tables
//!
//! Sentences and tips are keyed by category and status band. Bounds that pick
//! between variants are constants here so they can be tuned without touching
//! the providers.

use crate::models::{Category, FeedbackItem, Status, StatusThresholds, TextStats};
use std::ops::RangeInclusive;

/// Average sentence length considered varied
pub const SENTENCE_VARIETY_RANGE: RangeInclusive<usize> = 15..=25;

/// Overall score at which quality is called strong
pub const STRONG_OVERALL_SCORE: u8 = 80;

/// Essays shorter than this are asked to expand
pub const EXPAND_BELOW_WORDS: usize = 300;

/// Fixed copy for one category
pub struct CategoryCopy {
    pub excellent: &'static str,
    pub good: &'static str,
    pub needs_improvement: &'static str,
    /// Shown when the score reaches the excellent threshold
    pub keep_up: &'static [&'static str],
    /// Shown otherwise
    pub improve: &'static [&'static str],
}

const GRAMMAR: CategoryCopy = CategoryCopy {
    excellent: "Excellent grammar and punctuation throughout the essay.",
    good: "Good grammar with minor errors that don't impede understanding.",
    needs_improvement: "Several grammatical errors that may distract from your message.",
    keep_up: &["Maintain this high standard of grammar"],
    improve: &[
        "Review comma usage in complex sentences",
        "Check subject-verb agreement",
        "Proofread for spelling errors",
    ],
};

const STRUCTURE: CategoryCopy = CategoryCopy {
    excellent: "Well-organized with clear introduction, body, and conclusion.",
    good: "Good structure with logical flow between paragraphs.",
    needs_improvement: "Structure could be improved for better readability.",
    keep_up: &["Excellent organizational structure"],
    improve: &[
        "Use topic sentences for each paragraph",
        "Add transition words between ideas",
        "Strengthen your conclusion",
    ],
};

const COHERENCE: CategoryCopy = CategoryCopy {
    excellent: "Ideas flow smoothly with excellent logical connections.",
    good: "Good coherence with mostly clear connections between ideas.",
    needs_improvement: "Some ideas may benefit from clearer connections.",
    keep_up: &["Maintain this excellent coherence"],
    improve: &[
        "Use more transitional phrases",
        "Ensure each paragraph supports your thesis",
        "Review logical sequence of arguments",
    ],
};

const STYLE: CategoryCopy = CategoryCopy {
    excellent: "Engaging writing style with varied sentence structure.",
    good: "Good writing style with appropriate tone for the topic.",
    needs_improvement: "Writing style could be more engaging and varied.",
    keep_up: &["Excellent writing style and voice"],
    improve: &[
        "Vary sentence length and structure",
        "Use more descriptive language",
        "Develop a stronger authorial voice",
    ],
};

pub fn copy(category: Category) -> &'static CategoryCopy {
    match category {
        Category::Grammar => &GRAMMAR,
        Category::Structure => &STRUCTURE,
        Category::Coherence => &COHERENCE,
        Category::Style => &STYLE,
    }
}

pub fn feedback_sentence(category: Category, status: Status) -> &'static str {
    let copy = copy(category);
    match status {
        Status::Excellent => copy.excellent,
        Status::Good => copy.good,
        Status::NeedsImprovement => copy.needs_improvement,
    }
}

pub fn suggestions(category: Category, score: u8, thresholds: &StatusThresholds) -> Vec<String> {
    let copy = copy(category);
    let tips = if score >= thresholds.excellent {
        copy.keep_up
    } else {
        copy.improve
    };
    tips.iter().map(|s| s.to_string()).collect()
}

/// A card built entirely from the fixed tables
pub fn item(category: Category, score: u8, thresholds: &StatusThresholds) -> FeedbackItem {
    let status = thresholds.classify(score);
    FeedbackItem {
        category,
        score,
        status,
        feedback: feedback_sentence(category, status).to_string(),
        suggestions: suggestions(category, score, thresholds),
    }
}

pub fn strengths(stats: &TextStats, overall_score: u8) -> Vec<String> {
    vec![
        format!(
            "Essay length of {} words is appropriate for detailed analysis",
            stats.word_count
        ),
        if SENTENCE_VARIETY_RANGE.contains(&stats.avg_words_per_sentence) {
            "Good sentence length variety".to_string()
        } else {
            "Clear and concise writing style".to_string()
        },
        "Addresses the topic effectively".to_string(),
        if overall_score >= STRONG_OVERALL_SCORE {
            "Strong overall writing quality".to_string()
        } else {
            "Shows good writing fundamentals".to_string()
        },
    ]
}

pub fn improvements(stats: &TextStats) -> Vec<String> {
    vec![
        if stats.word_count < EXPAND_BELOW_WORDS {
            "Consider expanding your analysis with more examples".to_string()
        } else {
            "Consider adding more supporting evidence".to_string()
        },
        "Strengthen transitions between paragraphs".to_string(),
        "Review and refine your thesis statement".to_string(),
        "Add more specific examples to support your arguments".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(words: usize, avg: usize) -> TextStats {
        TextStats {
            word_count: words,
            sentence_count: 1,
            avg_words_per_sentence: avg,
        }
    }

    #[test]
    fn test_item_uses_status_keyed_sentence() {
        let t = StatusThresholds::default();
        let excellent = item(Category::Grammar, 90, &t);
        assert_eq!(excellent.status, Status::Excellent);
        assert_eq!(excellent.suggestions, vec!["Maintain this high standard of grammar"]);

        let good = item(Category::Structure, 75, &t);
        assert_eq!(good.feedback, "Good structure with logical flow between paragraphs.");
        assert_eq!(good.suggestions.len(), 3);

        let weak = item(Category::Style, 61, &t);
        assert_eq!(weak.status, Status::NeedsImprovement);
        assert_eq!(weak.feedback, "Writing style could be more engaging and varied.");
    }

    #[test]
    fn test_suggestion_switch_at_excellent_threshold() {
        let t = StatusThresholds::default();
        assert_eq!(suggestions(Category::Coherence, 84, &t).len(), 3);
        assert_eq!(suggestions(Category::Coherence, 85, &t).len(), 1);
    }

    #[test]
    fn test_strengths_variants() {
        let s = strengths(&stats(420, 18), 82);
        assert_eq!(s.len(), 4);
        assert_eq!(s[0], "Essay length of 420 words is appropriate for detailed analysis");
        assert_eq!(s[1], "Good sentence length variety");
        assert_eq!(s[2], "Addresses the topic effectively");
        assert_eq!(s[3], "Strong overall writing quality");

        let s = strengths(&stats(60, 30), 79);
        assert_eq!(s[1], "Clear and concise writing style");
        assert_eq!(s[3], "Shows good writing fundamentals");
    }

    #[test]
    fn test_sentence_variety_bounds_inclusive() {
        assert_eq!(strengths(&stats(100, 15), 0)[1], "Good sentence length variety");
        assert_eq!(strengths(&stats(100, 25), 0)[1], "Good sentence length variety");
        assert_eq!(strengths(&stats(100, 14), 0)[1], "Clear and concise writing style");
        assert_eq!(strengths(&stats(100, 26), 0)[1], "Clear and concise writing style");
    }

    #[test]
    fn test_improvements_variants() {
        let short = improvements(&stats(299, 10));
        assert_eq!(short.len(), 4);
        assert_eq!(short[0], "Consider expanding your analysis with more examples");

        let long = improvements(&stats(300, 10));
        assert_eq!(long[0], "Consider adding more supporting evidence");
        assert_eq!(long[3], "Add more specific examples to support your arguments");
    }
}
