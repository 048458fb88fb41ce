use serde::{Deserialize, Serialize};

pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod steps;
pub mod workflow;

pub use client::{PredictionResult, ScanBackend, UploadResult};
pub use config::ScanConfig;
pub use error::{ConfigError, PredictionError, ScanError, UploadError};
pub use file::ImageFile;
pub use steps::{StepSequence, TimedStep, Timer};
pub use workflow::{Effect, Event, Phase, ScanState, ScanWorkflow};

// Wire types

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionRequest {
    pub image_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionResponse {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UploadResponse {
    pub secure_url: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct MediaHostErrorBody {
    pub error: Option<MediaHostErrorDetail>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct MediaHostErrorDetail {
    pub message: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct PredictionErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}
