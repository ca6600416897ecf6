use thiserror::Error;

use crate::failure::Operation;

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

/// Errors produced by the codec, the simulated service and the task runner.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("failed to encode weather report as {format}: {reason}")]
    Encode { format: &'static str, reason: String },

    #[error("failed to decode {format} payload: {reason}")]
    Decode { format: &'static str, reason: String },

    #[error("city not found: {city}")]
    NotFound { city: String },

    #[error("simulated remote failure during {operation}")]
    Remote { operation: Operation },

    #[error("task '{task}' panicked before completing")]
    TaskPanicked { task: String },
}

impl WeatherError {
    pub(crate) fn encode(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Encode { format, reason: err.to_string() }
    }

    pub(crate) fn decode(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode { format, reason: err.to_string() }
    }
}
