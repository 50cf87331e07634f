use thiserror::Error;

/// Failures of a pipeline run. Every variant ends in the not-found view.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("request to weather service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse weather service response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed weather service response: {0}")]
    Malformed(String),

    #[error("location not found (status {status}): {message}")]
    NotFound { status: String, message: String },
}

impl WeatherError {
    /// True when the upstream service answered but did not recognise the location.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::NotFound { .. })
    }
}
