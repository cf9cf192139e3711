use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Longest diagnostic excerpt that is ever copied into a response body.
const MAX_DETAILS_CHARS: usize = 2000;

pub type Result<T> = std::result::Result<T, AdvisorError>;
pub type RelayResult<T> = std::result::Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to start scoring program `{program}`: {source}")]
    Invocation {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("scoring program exited with {}: {stderr}", exit_label(.exit_code))]
    ScoringProcess {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("scoring program did not finish within {0} seconds")]
    TimedOut(u64),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures turning captured scorer output into recommendations.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no recommendations found")]
    NoRecommendations { raw_output: String },

    #[error("malformed recommendation payload: {source}")]
    MalformedPayload {
        raw: String,
        normalized: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures talking to the generative model. Never shown to end users.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("model endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model endpoint returned a malformed body: {0}")]
    Malformed(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Wire shape for every failed API call: `{ error, details? }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AdvisorError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdvisorError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing body. Keeps the message short and only attaches
    /// diagnostic excerpts that help the user fix their scorer setup.
    pub fn body(&self) -> ErrorBody {
        match self {
            AdvisorError::Validation(msg) => ErrorBody {
                error: msg.clone(),
                details: None,
            },
            AdvisorError::Invocation { .. } => ErrorBody {
                error: "Failed to start the recommendation model".to_string(),
                details: None,
            },
            AdvisorError::ScoringProcess { stderr, .. } => ErrorBody {
                error: "Failed to get recommendations from AI model".to_string(),
                details: Some(excerpt(stderr)),
            },
            AdvisorError::TimedOut(secs) => ErrorBody {
                error: "Recommendation model timed out".to_string(),
                details: Some(format!("no result after {secs} seconds")),
            },
            AdvisorError::Extraction(ExtractionError::NoRecommendations { raw_output }) => {
                ErrorBody {
                    error: "No recommendations found".to_string(),
                    details: Some(excerpt(raw_output)),
                }
            }
            AdvisorError::Extraction(ExtractionError::MalformedPayload { raw, .. }) => {
                ErrorBody {
                    error: "Malformed recommendation payload".to_string(),
                    details: Some(excerpt(raw)),
                }
            }
            AdvisorError::Config(_) => ErrorBody {
                error: "Internal Server Error".to_string(),
                details: None,
            },
        }
    }
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(MAX_DETAILS_CHARS) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

impl IntoResponse for AdvisorError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
