use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::steps::{StepSequence, TimedStep};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub media_host: MediaHostConfig,
    pub prediction: PredictionConfig,
    pub post_processing: Vec<TimedStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaHostConfig {
    pub base_url: String,
    pub account_id: String,
    /// Name of an unsigned upload preset configured on the media host.
    pub upload_preset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub base_url: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            media_host: MediaHostConfig::default(),
            prediction: PredictionConfig::default(),
            post_processing: StepSequence::reference().into_steps(),
        }
    }
}

impl Default for MediaHostConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cloudinary.com".to_string(),
            account_id: "dhkx7ugw0".to_string(),
            upload_preset: "ml_default".to_string(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-6903.onrender.com".to_string(),
        }
    }
}

impl MediaHostConfig {
    pub fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.base_url.trim_end_matches('/'),
            self.account_id
        )
    }
}

impl PredictionConfig {
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url.trim_end_matches('/'))
    }
}

impl ScanConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.media_host.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("media_host.base_url is empty".into()));
        }
        if self.media_host.account_id.trim().is_empty() {
            return Err(ConfigError::Invalid("media_host.account_id is empty".into()));
        }
        if self.media_host.upload_preset.trim().is_empty() {
            return Err(ConfigError::Invalid("media_host.upload_preset is empty".into()));
        }
        if self.prediction.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("prediction.base_url is empty".into()));
        }
        if let Some(index) = self
            .post_processing
            .iter()
            .position(|step| step.label.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "post_processing[{}] has an empty label",
                index
            )));
        }
        Ok(())
    }

    pub fn step_sequence(&self) -> StepSequence {
        StepSequence::new(self.post_processing.clone())
    }
}
