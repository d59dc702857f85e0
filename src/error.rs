use thiserror::Error;

use crate::Platform;

#[derive(Debug, Error)]
pub enum SovError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{platform} API rejected credentials: {detail}")]
    Auth { platform: Platform, detail: String },

    #[error("{platform} API quota exceeded: {detail}")]
    Quota { platform: Platform, detail: String },

    #[error("{platform} API error {status}: {detail}")]
    Api {
        platform: Platform,
        status: u16,
        detail: String,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("chart error: {0}")]
    Chart(String),
}

impl SovError {
    /// Credential failures switch a platform to mock data; everything else
    /// only costs the current keyword.
    pub fn is_auth(&self) -> bool {
        matches!(self, SovError::Auth { .. })
    }
}
