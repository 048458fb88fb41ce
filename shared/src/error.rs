pub const UPLOAD_FALLBACK_MESSAGE: &str = "Failed to upload image";
pub const PREDICTION_FALLBACK_MESSAGE: &str = "Failed to get prediction";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("Image file is empty")]
    EmptyFile,
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Upload failed: {0}")]
    Transport(String),
    #[error("Malformed upload response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Prediction failed: {0}")]
    Transport(String),
    #[error("Malformed prediction response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScanError {
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),
    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse scan config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid scan config: {0}")]
    Invalid(String),
}

impl UploadError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        UploadError::Rejected {
            status,
            message: non_empty_or(message, UPLOAD_FALLBACK_MESSAGE),
        }
    }
}

impl PredictionError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        PredictionError::Rejected {
            status,
            message: non_empty_or(message, PREDICTION_FALLBACK_MESSAGE),
        }
    }
}

fn non_empty_or(message: Option<String>, fallback: &str) -> String {
    message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
