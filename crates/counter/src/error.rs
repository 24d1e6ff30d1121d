use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CounterError>;

/// Any of these means "remote unavailable" to the display facade.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote tracking disabled")]
    Disabled,
    #[error("remote request timed out")]
    Timeout,
    #[error("remote returned status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
