use shared::error::{FailureKind, FetchFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("occurrence backend is unavailable")]
    Unavailable,
}

impl FetchError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(format!("{url}: {err}"))
        } else if let Some(status) = err.status() {
            Self::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Request(format!("{url}: {err}"))
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Request(_) => FailureKind::Transport,
            Self::Status { .. } => FailureKind::Status,
            Self::Decode(_) => FailureKind::Decode,
            Self::Unavailable => FailureKind::Unavailable,
        }
    }
}

impl From<FetchError> for FetchFailure {
    fn from(value: FetchError) -> Self {
        FetchFailure::new(value.kind(), value.to_string())
    }
}
