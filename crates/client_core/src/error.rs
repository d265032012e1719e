use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    #[error("request failed before a response arrived: {0}")]
    Transport(String),
    #[error("server rejected request with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl ApiFailure {
    /// True when the server answered with a non-success status, as opposed to
    /// the request never completing or the body being unreadable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
