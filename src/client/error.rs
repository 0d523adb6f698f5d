use thiserror::Error;

/// Failure taxonomy for backend calls.
///
/// Read-path errors are recovered into cache entries; write-path errors
/// propagate to the mutation caller. `Validation` never reaches the read
/// cache.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http transport error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("response body did not match the expected envelope: {0}")]
    Parse(String),
    #[error("authentication rejected (status {status})")]
    Unauthorized { status: u16 },
    #[error("request rejected: {message}")]
    Validation { message: String },
    #[error("server error: status {status} body {body}")]
    Status { status: u16, body: String },
    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the mutation caller should treat this as bad input rather
    /// than infrastructure failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
