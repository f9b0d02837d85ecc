use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input at candle {index}: {reason}")]
    InvalidInput { index: usize, reason: String },

    #[error("Insufficient data: need {required} candles, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn invalid(index: usize, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
