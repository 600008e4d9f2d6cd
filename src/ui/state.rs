//! Application state shared by the terminal UI
//!
//! All transitions go through methods on [`AppState`]; rendering code only
//! reads it. Analysis runs elsewhere (a spawned task) and reports back with
//! the [`RequestId`] it was started under, so results for superseded requests
//! can be dropped.

use super::progress::AnalysisProgress;
use crate::analysis::AnalysisResult;
use crate::models::{Category, EssaySubmission, FeedbackReport, Notice};
use crate::submission::{EssayDraft, SubmissionError, Template};
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Templates,
    NewEssay,
    History,
    Settings,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Home,
        View::Templates,
        View::NewEssay,
        View::History,
        View::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Templates => "Templates",
            View::NewEssay => "New Essay",
            View::History => "History",
            View::Settings => "Settings",
        }
    }

    fn index(&self) -> usize {
        View::ALL.iter().position(|v| v == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn next(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }
}

/// Identifies one analysis request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// A validated submission ready to hand to a provider
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub submission: EssaySubmission,
}

#[derive(Debug, Clone)]
struct Pending {
    id: RequestId,
    started: Instant,
}

/// A completed analysis kept for the session
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub completed_at: DateTime<Local>,
    pub report: FeedbackReport,
}

#[derive(Debug)]
pub struct AppState {
    pub active_view: View,
    pub sidebar_collapsed: bool,
    pub theme: Theme,
    pub expanded_cards: BTreeSet<Category>,
    pub draft: EssayDraft,
    pub notice: Option<Notice>,
    pub history: Vec<HistoryEntry>,
    /// Index into `history` of the report on screen
    current: Option<usize>,
    pending: Option<Pending>,
    /// Progress snapshot of the last request that failed
    failed: Option<AnalysisProgress>,
    next_request: u64,
    /// Expected analysis duration, used for progress display
    expected: Duration,
}

impl AppState {
    pub fn new(min_words: usize, expected: Duration) -> Self {
        Self {
            active_view: View::default(),
            sidebar_collapsed: false,
            theme: Theme::default(),
            expanded_cards: BTreeSet::new(),
            draft: EssayDraft::new(min_words),
            notice: None,
            history: Vec::new(),
            current: None,
            pending: None,
            failed: None,
            next_request: 0,
            expected,
        }
    }

    pub fn select_view(&mut self, view: View) {
        self.active_view = view;
    }

    pub fn next_view(&mut self) {
        let i = (self.active_view.index() + 1) % View::ALL.len();
        self.active_view = View::ALL[i];
    }

    pub fn previous_view(&mut self) {
        let len = View::ALL.len();
        let i = (self.active_view.index() + len - 1) % len;
        self.active_view = View::ALL[i];
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
    }

    pub fn toggle_card(&mut self, category: Category) {
        if !self.expanded_cards.remove(&category) {
            self.expanded_cards.insert(category);
        }
    }

    pub fn is_expanded(&self, category: Category) -> bool {
        self.expanded_cards.contains(&category)
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Fill the draft from a template and open the editor
    pub fn use_template(&mut self, template: &Template) {
        self.draft.apply_template(template);
        self.active_view = View::NewEssay;
    }

    /// Validate the draft and start a new request.
    ///
    /// On failure the matching notice is set and nothing starts. Starting
    /// while another request is pending supersedes it.
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, SubmissionError> {
        let submission = match self.draft.submit() {
            Ok(submission) => submission,
            Err(e) => {
                debug!("Submission rejected: {}", e);
                self.notice = Some(e.notice());
                return Err(e);
            }
        };

        self.next_request += 1;
        let id = RequestId(self.next_request);
        if let Some(previous) = self.pending.replace(Pending {
            id,
            started: Instant::now(),
        }) {
            debug!("Request {:?} superseded by {:?}", previous.id, id);
        }
        self.notice = None;
        self.current = None;
        self.failed = None;
        Ok(AnalysisRequest { id, submission })
    }

    /// Deliver the result of a request. Returns false if it was stale.
    pub fn complete_analysis(
        &mut self,
        id: RequestId,
        result: AnalysisResult<FeedbackReport>,
    ) -> bool {
        let started = match self.pending.take() {
            Some(p) if p.id == id => p.started,
            other => {
                debug!("Discarding result of stale request {:?}", id);
                self.pending = other;
                return false;
            }
        };

        match result {
            Ok(report) => {
                self.history.push(HistoryEntry {
                    id: Uuid::new_v4(),
                    completed_at: Local::now(),
                    report,
                });
                self.current = Some(self.history.len() - 1);
                self.expanded_cards.clear();
            }
            Err(e) => {
                warn!("Analysis failed: {}", e);
                self.failed =
                    Some(AnalysisProgress::at(started.elapsed(), self.expected).failed());
                self.notice = Some(Notice::error("Analysis Failed", e.to_string()));
            }
        }
        true
    }

    /// Drop the pending request, if any
    pub fn cancel_analysis(&mut self) {
        self.pending = None;
    }

    pub fn is_analyzing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn progress(&self) -> Option<AnalysisProgress> {
        self.pending
            .as_ref()
            .map(|p| AnalysisProgress::at(p.started.elapsed(), self.expected))
    }

    /// Steps of the last failed analysis, with the failing step marked
    pub fn failed_progress(&self) -> Option<&AnalysisProgress> {
        self.failed.as_ref()
    }

    pub fn current_report(&self) -> Option<&FeedbackReport> {
        self.current
            .and_then(|i| self.history.get(i))
            .map(|e| &e.report)
    }

    /// Show a report from the session history
    pub fn open_history(&mut self, index: usize) {
        if index < self.history.len() {
            self.current = Some(index);
            self.expanded_cards.clear();
            self.active_view = View::NewEssay;
        }
    }

    /// Floating "New Essay" action: clear everything and open the editor
    pub fn new_essay(&mut self) {
        self.draft.clear();
        self.current = None;
        self.pending = None;
        self.failed = None;
        self.expanded_cards.clear();
        self.active_view = View::NewEssay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisError;
    use crate::submission::TEMPLATES;
    use crate::ui::StepStatus;

    fn state() -> AppState {
        AppState::new(50, Duration::from_millis(3000))
    }

    fn report(title: &str, score: u8) -> FeedbackReport {
        FeedbackReport {
            title: title.to_string(),
            overall_score: score,
            feedback: Vec::new(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            stats: Default::default(),
            provider: "mock".into(),
        }
    }

    fn ready(state: &mut AppState) {
        state.draft.essay = "word ".repeat(60);
        state.draft.title = "Essay".into();
    }

    #[test]
    fn test_view_cycle_wraps() {
        let mut s = state();
        assert_eq!(s.active_view, View::Home);
        s.previous_view();
        assert_eq!(s.active_view, View::Settings);
        s.next_view();
        s.next_view();
        assert_eq!(s.active_view, View::Templates);
    }

    #[test]
    fn test_toggles() {
        let mut s = state();
        s.toggle_sidebar();
        assert!(s.sidebar_collapsed);
        s.cycle_theme();
        assert_eq!(s.theme, Theme::Light);
        s.toggle_card(Category::Style);
        assert!(s.is_expanded(Category::Style));
        s.toggle_card(Category::Style);
        assert!(!s.is_expanded(Category::Style));
    }

    #[test]
    fn test_short_draft_never_starts() {
        let mut s = state();
        s.draft.essay = "too short".into();
        let err = s.begin_analysis().unwrap_err();
        assert!(matches!(err, SubmissionError::TooShort { words: 2, .. }));
        assert!(!s.is_analyzing());
        assert_eq!(s.notice.as_ref().map(|n| n.title.as_str()), Some("Essay Too Short"));
    }

    #[test]
    fn test_complete_records_history() {
        let mut s = state();
        ready(&mut s);
        let req = s.begin_analysis().unwrap();
        assert_eq!(req.submission.title, "Essay");
        assert!(s.is_analyzing());
        assert!(s.progress().is_some());

        assert!(s.complete_analysis(req.id, Ok(report("Essay", 80))));
        assert!(!s.is_analyzing());
        assert_eq!(s.history.len(), 1);
        assert_eq!(s.current_report().map(|r| r.overall_score), Some(80));
    }

    #[test]
    fn test_stale_result_discarded() {
        let mut s = state();
        ready(&mut s);
        let first = s.begin_analysis().unwrap();
        let second = s.begin_analysis().unwrap();
        assert_ne!(first.id, second.id);

        assert!(!s.complete_analysis(first.id, Ok(report("old", 10))));
        assert!(s.history.is_empty());
        assert!(s.is_analyzing());

        assert!(s.complete_analysis(second.id, Ok(report("new", 90))));
        assert_eq!(s.current_report().map(|r| r.title.as_str()), Some("new"));
    }

    #[test]
    fn test_new_essay_supersedes_pending() {
        let mut s = state();
        ready(&mut s);
        let req = s.begin_analysis().unwrap();
        s.new_essay();
        assert!(s.draft.essay.is_empty());
        assert_eq!(s.active_view, View::NewEssay);
        assert!(!s.complete_analysis(req.id, Ok(report("late", 50))));
        assert!(s.current_report().is_none());
    }

    #[test]
    fn test_failure_sets_notice() {
        let mut s = state();
        ready(&mut s);
        let req = s.begin_analysis().unwrap();
        let err = AnalysisError::Task("boom".into());
        assert!(s.complete_analysis(req.id, Err(err)));
        let notice = s.notice.clone().unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.title, "Analysis Failed");
        assert!(s.history.is_empty());

        let failed = s.failed_progress().expect("failure recorded");
        assert_eq!(
            failed.steps.iter().filter(|st| st.status == StepStatus::Error).count(),
            1
        );

        s.begin_analysis().unwrap();
        assert!(s.failed_progress().is_none());
    }

    #[test]
    fn test_use_template_opens_editor() {
        let mut s = state();
        s.use_template(&TEMPLATES[1]);
        assert_eq!(s.active_view, View::NewEssay);
        assert_eq!(s.draft.title, "Narrative Essay");
    }

    #[test]
    fn test_open_history() {
        let mut s = state();
        ready(&mut s);
        let a = s.begin_analysis().unwrap();
        s.complete_analysis(a.id, Ok(report("a", 70)));
        let b = s.begin_analysis().unwrap();
        s.complete_analysis(b.id, Ok(report("b", 75)));
        s.open_history(0);
        assert_eq!(s.current_report().map(|r| r.title.as_str()), Some("a"));
        s.open_history(9);
        assert_eq!(s.current_report().map(|r| r.title.as_str()), Some("a"));
    }
}
