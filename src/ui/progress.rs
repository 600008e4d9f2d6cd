//! Analysis progress derived from elapsed time

use crate::models::Category;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStep {
    pub id: &'static str,
    pub title: &'static str,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisProgress {
    pub steps: Vec<ProgressStep>,
    /// 0-100
    pub percent: u8,
}

fn step_titles() -> Vec<(&'static str, &'static str)> {
    let mut steps = vec![("read", "Reading essay")];
    steps.extend(Category::ALL.iter().map(|c| (c.key(), c.label())));
    steps.push(("compile", "Compiling feedback"));
    steps
}

impl AnalysisProgress {
    /// Progress after `elapsed` of an analysis expected to take `expected`.
    ///
    /// Never reports 100%; the last step stays active until the result
    /// arrives.
    pub fn at(elapsed: Duration, expected: Duration) -> Self {
        let titles = step_titles();
        let fraction = if expected.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / expected.as_secs_f64()).min(1.0)
        };
        let active = ((fraction * titles.len() as f64) as usize).min(titles.len() - 1);
        let percent = ((fraction * 100.0) as u8).min(99);

        let steps = titles
            .into_iter()
            .enumerate()
            .map(|(i, (id, title))| ProgressStep {
                id,
                title,
                status: match i.cmp(&active) {
                    std::cmp::Ordering::Less => StepStatus::Completed,
                    std::cmp::Ordering::Equal => StepStatus::Active,
                    std::cmp::Ordering::Greater => StepStatus::Pending,
                },
            })
            .collect();

        Self { steps, percent }
    }

    /// Mark the active step as failed
    pub fn failed(mut self) -> Self {
        if let Some(step) = self
            .steps
            .iter_mut()
            .find(|s| s.status == StepStatus::Active)
        {
            step.status = StepStatus::Error;
        }
        self
    }

    pub fn active_step(&self) -> Option<&ProgressStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Active)
    }
}
