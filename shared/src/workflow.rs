use std::time::Duration;

use strum_macros::Display;

use crate::client::{PredictionResult, ScanBackend, UploadResult};
use crate::error::{PredictionError, ScanError, UploadError};
use crate::file::ImageFile;
use crate::steps::{NETWORK_STEP_COUNT, StepSequence, Timer};

/// Diagnosis shown when any stage of the scan fails.
pub const ERROR_DIAGNOSIS: &str = "Error in analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Predicting,
    PostProcessing(usize),
    Results,
    Error,
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Phase::Uploading | Phase::Predicting | Phase::PostProcessing(_)
        )
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::Results | Phase::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanState {
    pub phase: Phase,
    /// Index into the progress list; `None` when no scan is running.
    pub current_step: Option<usize>,
    pub selected_file: Option<ImageFile>,
    pub hosted_image_url: Option<String>,
    /// Raw prediction, held while the timed steps play out.
    pub prediction: Option<PredictionResult>,
    pub diagnosis: Option<String>,
    pub confidence_percent: Option<u8>,
    pub error_message: Option<String>,
    pub started_at_ms: Option<f64>,
    /// Measured time from selection to prediction; excludes the timed steps.
    pub process_time: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FileSelected { file: ImageFile, at_ms: f64 },
    UploadDone(Result<UploadResult, UploadError>),
    PredictDone {
        result: Result<PredictionResult, PredictionError>,
        at_ms: f64,
    },
    StepElapsed(usize),
    NewScan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Upload(ImageFile),
    Predict(String),
    Wait { step: usize, delay: Duration },
}

/// Owns one scan's state and moves it through its phases.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanWorkflow {
    state: ScanState,
    steps: StepSequence,
}

impl ScanWorkflow {
    pub fn new(steps: StepSequence) -> Self {
        Self {
            state: ScanState::default(),
            steps,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn steps(&self) -> &StepSequence {
        &self.steps
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_busy(&self) -> bool {
        self.state.phase.is_busy()
    }

    pub fn handle(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::FileSelected { file, at_ms } => self.handle_file_selected(file, at_ms),
            Event::UploadDone(result) => self.handle_upload_done(result),
            Event::PredictDone { result, at_ms } => self.handle_predict_done(result, at_ms),
            Event::StepElapsed(step) => self.handle_step_elapsed(step),
            Event::NewScan => self.handle_new_scan(),
        }
    }

    fn handle_file_selected(&mut self, file: ImageFile, at_ms: f64) -> Option<Effect> {
        if self.is_busy() {
            log::warn!(
                "Ignoring selection of {} while {} is in progress",
                file.name,
                self.state.phase
            );
            return None;
        }

        log::info!("Scan started for {} ({} bytes)", file.name, file.len());
        self.state = ScanState {
            phase: Phase::Uploading,
            current_step: Some(0),
            selected_file: Some(file.clone()),
            started_at_ms: Some(at_ms),
            ..ScanState::default()
        };
        Some(Effect::Upload(file))
    }

    fn handle_upload_done(&mut self, result: Result<UploadResult, UploadError>) -> Option<Effect> {
        if self.state.phase != Phase::Uploading {
            log::warn!("Ignoring upload result in phase {}", self.state.phase);
            return None;
        }

        match result {
            Ok(upload) => {
                log::info!("Image hosted at {}", upload.hosted_image_url);
                self.state.hosted_image_url = Some(upload.hosted_image_url.clone());
                self.state.phase = Phase::Predicting;
                self.state.current_step = Some(1);
                Some(Effect::Predict(upload.hosted_image_url))
            }
            Err(err) => {
                self.fail(err.into());
                None
            }
        }
    }

    fn handle_predict_done(
        &mut self,
        result: Result<PredictionResult, PredictionError>,
        at_ms: f64,
    ) -> Option<Effect> {
        if self.state.phase != Phase::Predicting {
            log::warn!("Ignoring prediction result in phase {}", self.state.phase);
            return None;
        }

        match result {
            Ok(prediction) => {
                log::info!(
                    "Prediction received: {} ({:.3})",
                    prediction.label,
                    prediction.confidence
                );
                self.state.process_time = self
                    .state
                    .started_at_ms
                    .map(|started| Duration::from_millis((at_ms - started).max(0.0).round() as u64));
                self.state.prediction = Some(prediction);
                self.enter_step(0)
            }
            Err(err) => {
                self.fail(err.into());
                None
            }
        }
    }

    fn handle_step_elapsed(&mut self, step: usize) -> Option<Effect> {
        if self.state.phase != Phase::PostProcessing(step) {
            log::warn!(
                "Ignoring elapsed step {} in phase {}",
                step,
                self.state.phase
            );
            return None;
        }

        if self.steps.is_last(step) {
            self.finish();
            None
        } else {
            self.enter_step(step + 1)
        }
    }

    fn handle_new_scan(&mut self) -> Option<Effect> {
        if self.is_busy() {
            log::warn!("Ignoring reset while {} is in progress", self.state.phase);
            return None;
        }

        self.state = ScanState::default();
        None
    }

    fn enter_step(&mut self, step: usize) -> Option<Effect> {
        match self.steps.get(step) {
            Some(timed) => {
                self.state.phase = Phase::PostProcessing(step);
                self.state.current_step = Some(NETWORK_STEP_COUNT + step);
                Some(Effect::Wait {
                    step,
                    delay: timed.delay(),
                })
            }
            None => {
                self.finish();
                None
            }
        }
    }

    fn finish(&mut self) {
        let Some(prediction) = self.state.prediction.clone() else {
            self.fail(ScanError::Prediction(PredictionError::MalformedResponse(
                "no prediction recorded".into(),
            )));
            return;
        };

        let percent = prediction.confidence_percent();
        log::info!("Scan complete: {} at {}%", prediction.label, percent);
        self.state.diagnosis = Some(prediction.label);
        self.state.confidence_percent = Some(percent);
        self.state.phase = Phase::Results;
        self.state.current_step = None;
    }

    fn fail(&mut self, err: ScanError) {
        log::error!("Scan failed: {}", err);
        self.state.phase = Phase::Error;
        self.state.current_step = None;
        self.state.prediction = None;
        self.state.diagnosis = Some(ERROR_DIAGNOSIS.to_string());
        self.state.confidence_percent = Some(0);
        self.state.error_message = Some(err.to_string());
    }
}

impl Default for ScanWorkflow {
    fn default() -> Self {
        Self::new(StepSequence::reference())
    }
}

/// Runs one effect to completion and reports the event it produced.
pub async fn run_effect<B, T>(effect: Effect, backend: &B, timer: &T) -> Event
where
    B: ScanBackend + ?Sized,
    T: Timer + ?Sized,
{
    match effect {
        Effect::Upload(file) => Event::UploadDone(backend.upload(&file).await),
        Effect::Predict(url) => {
            let result = backend.predict(&url).await;
            Event::PredictDone {
                result,
                at_ms: timer.now_ms(),
            }
        }
        Effect::Wait { step, delay } => {
            timer.sleep(delay).await;
            Event::StepElapsed(step)
        }
    }
}

/// Drives a scan for `file` until the workflow stops producing effects.
pub async fn run_scan<'a, B, T>(
    workflow: &'a mut ScanWorkflow,
    backend: &B,
    timer: &T,
    file: ImageFile,
) -> &'a ScanState
where
    B: ScanBackend + ?Sized,
    T: Timer + ?Sized,
{
    let mut next = workflow.handle(Event::FileSelected {
        file,
        at_ms: timer.now_ms(),
    });
    while let Some(effect) = next {
        let event = run_effect(effect, backend, timer).await;
        next = workflow.handle(event);
    }
    workflow.state()
}
