use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the transport and the geocode/fetch pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Error sending HTTP request: {0}")]
    Transport(#[from] TransportError),

    #[error("Request failed with status code {}: {reason}", .status.as_u16())]
    RequestFailed { status: StatusCode, reason: String },

    #[error("No geocode found for city '{0}'.")]
    CityNotFound(String),

    #[error("Failed to retrieve weather data for city '{0}'.")]
    WeatherUnavailable(String),

    #[error("Failed to retrieve daily forecast for city '{0}'.")]
    ForecastUnavailable(String),
}

impl Error {
    pub(crate) fn request_failed(status: StatusCode) -> Self {
        Self::RequestFailed {
            status,
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// Status code of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Transport(TransportError::Cancelled))
    }
}

/// Underlying cause of a transport-level failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,
}
