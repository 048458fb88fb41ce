use std::time::Duration;

use async_trait::async_trait;
use gloo_console::error;
use gloo_file::Blob;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use shared::client::{
    FILE_FIELD, UPLOAD_PRESET_FIELD, parse_prediction_response, parse_upload_response,
    prediction_request_body,
};
use shared::{
    ImageFile, PredictionError, PredictionResult, ScanBackend, ScanConfig, Timer, UploadError,
    UploadResult,
};
use web_sys::FormData;

/// Talks to the media host and the prediction service with `fetch`.
pub struct HttpScanBackend {
    upload_url: String,
    upload_preset: String,
    predict_url: String,
}

impl HttpScanBackend {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            upload_url: config.media_host.upload_url(),
            upload_preset: config.media_host.upload_preset.clone(),
            predict_url: config.prediction.predict_url(),
        }
    }

    fn upload_form(&self, file: &ImageFile) -> Result<FormData, UploadError> {
        let form_data = FormData::new()
            .map_err(|e| UploadError::Transport(format!("FormData unavailable: {:?}", e)))?;
        let blob = Blob::new_with_options(&file.bytes[..], Some(&file.mime_type));

        form_data
            .append_with_blob_and_filename(FILE_FIELD, blob.as_ref(), &file.name)
            .map_err(|e| UploadError::Transport(format!("Failed to attach image: {:?}", e)))?;
        form_data
            .append_with_str(UPLOAD_PRESET_FIELD, &self.upload_preset)
            .map_err(|e| UploadError::Transport(format!("Failed to attach preset: {:?}", e)))?;

        Ok(form_data)
    }
}

#[async_trait(?Send)]
impl ScanBackend for HttpScanBackend {
    async fn upload(&self, file: &ImageFile) -> Result<UploadResult, UploadError> {
        file.ensure_uploadable()?;
        let form_data = self.upload_form(file)?;

        let response = Request::post(&self.upload_url)
            .body(form_data)
            .map_err(|e| UploadError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        if !response.ok() {
            error!(format!("Media host error ({}): {}", status, body));
        }

        parse_upload_response(status, response.ok(), &body)
    }

    async fn predict(&self, hosted_image_url: &str) -> Result<PredictionResult, PredictionError> {
        let payload = prediction_request_body(hosted_image_url)?;

        let response = Request::post(&self.predict_url)
            .header("Content-Type", "application/json")
            .body(payload)
            .map_err(|e| PredictionError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PredictionError::MalformedResponse(e.to_string()))?;

        if !response.ok() {
            error!(format!("Prediction service error ({}): {}", status, body));
        }

        parse_prediction_response(status, response.ok(), &body)
    }
}

pub struct BrowserTimer;

#[async_trait(?Send)]
impl Timer for BrowserTimer {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}
