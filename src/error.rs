use thiserror::Error;

/// Failure of a call against one of the insurance services
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No response was received
    #[error("{0}")]
    Transport(String),

    /// Non-success status with the server's message (or a caller fallback)
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Response arrived but did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        ApiError::Status {
            status,
            message: message.into(),
        }
    }

    /// Map a reqwest failure the way the request loop reports it
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Transport("Request timed out".to_string())
        } else if e.is_connect() {
            ApiError::Transport(format!("Connection failed: {}", e))
        } else {
            ApiError::Transport(format!("Request failed: {}", e))
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
