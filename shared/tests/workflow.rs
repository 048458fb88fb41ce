use std::cell::{Cell, RefCell};
use std::time::Duration;

use async_trait::async_trait;
use futures::executor::block_on;
use shared::workflow::{ERROR_DIAGNOSIS, run_scan};
use shared::{
    ImageFile, Phase, PredictionError, PredictionResult, ScanBackend, ScanState, ScanWorkflow,
    StepSequence, Timer, UploadError, UploadResult,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Upload(String),
    Predict(String),
}

struct FakeBackend {
    upload: Result<UploadResult, UploadError>,
    prediction: Result<PredictionResult, PredictionError>,
    upload_latency_ms: f64,
    predict_latency_ms: f64,
    timer: FakeTimer,
    calls: RefCell<Vec<Call>>,
}

impl FakeBackend {
    fn new(
        upload: Result<UploadResult, UploadError>,
        prediction: Result<PredictionResult, PredictionError>,
    ) -> Self {
        Self {
            upload,
            prediction,
            upload_latency_ms: 0.0,
            predict_latency_ms: 0.0,
            timer: FakeTimer::default(),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn hosting(url: &str, label: &str, confidence: f64) -> Self {
        Self::new(
            Ok(UploadResult {
                hosted_image_url: url.to_string(),
            }),
            Ok(PredictionResult {
                label: label.to_string(),
                confidence,
            }),
        )
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ScanBackend for FakeBackend {
    async fn upload(&self, file: &ImageFile) -> Result<UploadResult, UploadError> {
        self.calls.borrow_mut().push(Call::Upload(file.name.clone()));
        self.timer.advance(self.upload_latency_ms);
        file.ensure_uploadable()?;
        self.upload.clone()
    }

    async fn predict(&self, hosted_image_url: &str) -> Result<PredictionResult, PredictionError> {
        let uploaded = self
            .calls
            .borrow()
            .iter()
            .any(|call| matches!(call, Call::Upload(_)));
        assert!(uploaded, "predict called before upload");

        self.calls
            .borrow_mut()
            .push(Call::Predict(hosted_image_url.to_string()));
        self.timer.advance(self.predict_latency_ms);
        self.prediction.clone()
    }
}

#[derive(Clone, Default)]
struct FakeTimer {
    now: std::rc::Rc<Cell<f64>>,
    sleeps: std::rc::Rc<RefCell<Vec<Duration>>>,
}

impl FakeTimer {
    fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Timer for FakeTimer {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration.as_millis() as f64);
    }
}

fn brain_scan() -> ImageFile {
    ImageFile::new("brain.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0])
}

#[test]
fn successful_scan_reports_label_and_rounded_confidence() {
    let backend = FakeBackend::hosting("https://host/x.jpg", "Tumor Detected", 0.87);
    let timer = backend.timer.clone();
    let mut workflow = ScanWorkflow::default();

    let state = block_on(run_scan(&mut workflow, &backend, &timer, brain_scan()));

    assert_eq!(state.phase, Phase::Results);
    assert_eq!(state.diagnosis.as_deref(), Some("Tumor Detected"));
    assert_eq!(state.confidence_percent, Some(87));
    assert_eq!(state.hosted_image_url.as_deref(), Some("https://host/x.jpg"));
    assert_eq!(state.error_message, None);
}

#[test]
fn predict_follows_upload_with_hosted_url() {
    let backend = FakeBackend::hosting("https://host/x.jpg", "No Tumor", 0.953);
    let timer = backend.timer.clone();
    let mut workflow = ScanWorkflow::default();

    block_on(run_scan(&mut workflow, &backend, &timer, brain_scan()));

    assert_eq!(
        backend.calls(),
        vec![
            Call::Upload("brain.jpg".into()),
            Call::Predict("https://host/x.jpg".into()),
        ]
    );
    assert_eq!(workflow.state().confidence_percent, Some(95));
}

#[test]
fn timed_steps_are_each_waited_once_in_order() {
    let backend = FakeBackend::hosting("https://host/x.jpg", "Tumor Detected", 0.5);
    let timer = backend.timer.clone();
    let mut workflow = ScanWorkflow::default();

    block_on(run_scan(&mut workflow, &backend, &timer, brain_scan()));

    assert_eq!(
        timer.sleeps(),
        vec![
            Duration::from_millis(500),
            Duration::from_millis(800),
            Duration::from_millis(500),
        ]
    );
}

#[test]
fn process_time_measures_network_work_only() {
    let mut backend = FakeBackend::hosting("https://host/x.jpg", "No Tumor", 0.7);
    backend.upload_latency_ms = 1_200.0;
    backend.predict_latency_ms = 900.0;
    let timer = backend.timer.clone();
    let mut workflow = ScanWorkflow::default();

    let state = block_on(run_scan(&mut workflow, &backend, &timer, brain_scan()));

    assert_eq!(state.process_time, Some(Duration::from_millis(2_100)));
    assert_eq!(timer.now_ms(), 2_100.0 + 1_800.0);
}

#[test]
fn upload_transport_failure_ends_in_error_without_predicting() {
    let backend = FakeBackend::new(
        Err(UploadError::Transport("TypeError: Failed to fetch".into())),
        Ok(PredictionResult {
            label: "unused".into(),
            confidence: 1.0,
        }),
    );
    let timer = backend.timer.clone();
    let mut workflow = ScanWorkflow::default();

    let state = block_on(run_scan(&mut workflow, &backend, &timer, brain_scan()));

    assert_eq!(state.phase, Phase::Error);
    assert_eq!(state.diagnosis.as_deref(), Some(ERROR_DIAGNOSIS));
    assert_eq!(state.confidence_percent, Some(0));
    assert!(
        state
            .error_message
            .as_deref()
            .unwrap()
            .contains("Failed to fetch")
    );
    assert_eq!(backend.calls(), vec![Call::Upload("brain.jpg".into())]);
    assert!(timer.sleeps().is_empty());
}

#[test]
fn empty_file_fails_at_upload() {
    let backend = FakeBackend::hosting("https://host/x.jpg", "No Tumor", 0.7);
    let timer = backend.timer.clone();
    let mut workflow = ScanWorkflow::default();

    let state = block_on(run_scan(
        &mut workflow,
        &backend,
        &timer,
        ImageFile::new("blank.png", "image/png", Vec::new()),
    ));

    assert_eq!(state.phase, Phase::Error);
    assert_eq!(state.confidence_percent, Some(0));
}

#[test]
fn prediction_rejection_skips_timed_steps() {
    let backend = FakeBackend::new(
        Ok(UploadResult {
            hosted_image_url: "https://host/x.jpg".into(),
        }),
        Err(PredictionError::rejected(500, Some("cannot identify image file".into()))),
    );
    let timer = backend.timer.clone();
    let mut workflow = ScanWorkflow::default();

    let state = block_on(run_scan(&mut workflow, &backend, &timer, brain_scan()));

    assert_eq!(state.phase, Phase::Error);
    assert_eq!(state.diagnosis.as_deref(), Some(ERROR_DIAGNOSIS));
    assert!(
        state
            .error_message
            .as_deref()
            .unwrap()
            .contains("cannot identify image file")
    );
    assert_eq!(state.hosted_image_url.as_deref(), Some("https://host/x.jpg"));
    assert!(timer.sleeps().is_empty());
}

#[test]
fn reset_after_scan_matches_fresh_state() {
    for backend in [
        FakeBackend::hosting("https://host/x.jpg", "Tumor Detected", 0.87),
        FakeBackend::new(
            Err(UploadError::rejected(401, None)),
            Err(PredictionError::rejected(500, None)),
        ),
    ] {
        let timer = backend.timer.clone();
        let mut workflow = ScanWorkflow::default();
        block_on(run_scan(&mut workflow, &backend, &timer, brain_scan()));
        assert!(workflow.phase().is_finished());

        workflow.handle(shared::Event::NewScan);
        assert_eq!(workflow.state(), &ScanState::default());
    }
}

#[test]
fn independent_workflows_do_not_share_state() {
    let ok = FakeBackend::hosting("https://host/a.jpg", "No Tumor", 0.91);
    let failing = FakeBackend::new(
        Err(UploadError::rejected(400, Some("Invalid image file".into()))),
        Err(PredictionError::rejected(500, None)),
    );
    let mut first = ScanWorkflow::default();
    let mut second = ScanWorkflow::new(StepSequence::default());

    block_on(run_scan(&mut first, &ok, &ok.timer, brain_scan()));
    block_on(run_scan(&mut second, &failing, &failing.timer, brain_scan()));

    assert_eq!(first.phase(), Phase::Results);
    assert_eq!(first.state().confidence_percent, Some(91));
    assert_eq!(second.phase(), Phase::Error);
    assert_eq!(
        second.state().error_message.as_deref(),
        Some("Upload error: Invalid image file")
    );
}
