use reqwest::StatusCode;
use thiserror::Error;

/// Failures crossing the retrieval-service boundary
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx from the login-and-fetch call
    #[error("{detail}")]
    Authentication { status: Option<StatusCode>, detail: String },

    /// Non-2xx from the plan switch call
    #[error("{detail}")]
    PlanFetch { status: Option<StatusCode>, detail: String },

    #[error("Could not reach the timetable service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unreadable response from the timetable service: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Authentication { status, .. } | FetchError::PlanFetch { status, .. } => {
                *status
            }
            FetchError::Transport(e) => e.status(),
            FetchError::MalformedResponse(_) => None,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
