//! Presentation-independent UI model: application state and progress

pub mod progress;
pub mod state;

pub use progress::{AnalysisProgress, ProgressStep, StepStatus};
pub use state::{AnalysisRequest, AppState, HistoryEntry, RequestId, Theme, View};
