use async_trait::async_trait;

use crate::error::{PredictionError, UploadError};
use crate::file::ImageFile;
use crate::{
    MediaHostErrorBody, PredictionErrorBody, PredictionRequest, PredictionResponse, UploadResponse,
};

/// Multipart field carrying the image bytes.
pub const FILE_FIELD: &str = "file";
/// Multipart field naming the unsigned upload preset.
pub const UPLOAD_PRESET_FIELD: &str = "upload_preset";

#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub hosted_image_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub label: String,
    /// Fraction in `[0, 1]`.
    pub confidence: f64,
}

impl PredictionResult {
    pub fn confidence_percent(&self) -> u8 {
        confidence_percent(self.confidence)
    }
}

pub fn confidence_percent(confidence: f64) -> u8 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// The two outbound calls of a scan: host the image, then classify it by URL.
#[async_trait(?Send)]
pub trait ScanBackend {
    async fn upload(&self, file: &ImageFile) -> Result<UploadResult, UploadError>;

    async fn predict(&self, hosted_image_url: &str) -> Result<PredictionResult, PredictionError>;
}

pub fn prediction_request_body(hosted_image_url: &str) -> Result<String, PredictionError> {
    serde_json::to_string(&PredictionRequest {
        image_url: hosted_image_url.to_string(),
    })
    .map_err(|e| PredictionError::Transport(format!("Failed to encode request: {}", e)))
}

pub fn parse_upload_response(
    status: u16,
    ok: bool,
    body: &str,
) -> Result<UploadResult, UploadError> {
    if !ok {
        let message = serde_json::from_str::<MediaHostErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|detail| detail.message);
        return Err(UploadError::rejected(status, message));
    }

    let response: UploadResponse = serde_json::from_str(body)
        .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

    if response.secure_url.trim().is_empty() {
        return Err(UploadError::MalformedResponse("empty secure_url".into()));
    }

    Ok(UploadResult {
        hosted_image_url: response.secure_url,
    })
}

pub fn parse_prediction_response(
    status: u16,
    ok: bool,
    body: &str,
) -> Result<PredictionResult, PredictionError> {
    if !ok {
        let message = serde_json::from_str::<PredictionErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error));
        return Err(PredictionError::rejected(status, message));
    }

    let response: PredictionResponse = serde_json::from_str(body)
        .map_err(|e| PredictionError::MalformedResponse(e.to_string()))?;

    if !response.confidence.is_finite() || !(0.0..=1.0).contains(&response.confidence) {
        return Err(PredictionError::MalformedResponse(format!(
            "confidence {} is outside [0, 1]",
            response.confidence
        )));
    }

    Ok(PredictionResult {
        label: response.label,
        confidence: response.confidence,
    })
}
