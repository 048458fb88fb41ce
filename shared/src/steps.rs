use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const UPLOAD_STEP_LABEL: &str = "Uploading Image";
pub const PREDICT_STEP_LABEL: &str = "Pushing to API";

/// Number of progress entries backed by real network calls, ahead of the timed steps.
pub const NETWORK_STEP_COUNT: usize = 2;

/// A presentation-only stage: it waits `delay_ms` and does no work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedStep {
    pub label: String,
    pub delay_ms: u64,
}

impl TimedStep {
    pub fn new(label: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            label: label.into(),
            delay_ms,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Ordered cosmetic stages shown after the prediction arrives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepSequence {
    steps: Vec<TimedStep>,
}

impl StepSequence {
    pub fn new(steps: Vec<TimedStep>) -> Self {
        Self { steps }
    }

    pub fn reference() -> Self {
        Self::new(vec![
            TimedStep::new("Preprocessing Image", 500),
            TimedStep::new("Scanning for Tumors", 800),
            TimedStep::new("Generating Results", 500),
        ])
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimedStep> {
        self.steps.get(index)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.steps.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedStep> {
        self.steps.iter()
    }

    pub fn into_steps(self) -> Vec<TimedStep> {
        self.steps
    }

    pub fn total_delay(&self) -> Duration {
        self.steps.iter().map(TimedStep::delay).sum()
    }

    /// Labels for the progress overlay: the two network stages, then the timed steps.
    pub fn progress_labels(&self) -> Vec<&str> {
        [UPLOAD_STEP_LABEL, PREDICT_STEP_LABEL]
            .into_iter()
            .chain(self.steps.iter().map(|step| step.label.as_str()))
            .collect()
    }
}

/// Clock and sleep source for the workflow driver.
#[async_trait(?Send)]
pub trait Timer {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> f64;

    async fn sleep(&self, duration: Duration);
}
