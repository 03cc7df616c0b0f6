use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch skipped: server offline")]
    Offline,
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unexpected payload shape: expected object, found {found}")]
    UnexpectedShape { found: &'static str },
}

impl FetchError {
    /// Short tag used as the `kind` field in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Offline => "offline",
            FetchError::Transport(err) if err.is_timeout() => "timeout",
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Malformed(_) => "malformed",
            FetchError::UnexpectedShape { .. } => "shape",
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("probe answered {0}")]
    Status(StatusCode),
}

impl ProbeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Transport(err) if err.is_timeout())
    }
}

#[derive(Debug, Error)]
pub enum ClockError {
    #[error("clock format `{format}` could not be rendered")]
    Format { format: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid server url `{value}`: {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("unsupported url scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),
}
