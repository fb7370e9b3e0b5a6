use serde::Deserialize;
use thiserror::Error;

use crate::storage::StorageError;

use super::transport::TransportError;

pub type Result<T> = std::result::Result<T, ApiError>;

const DEFAULT_MESSAGE: &str = "Something went wrong. Please try again.";
const DEACTIVATED_MESSAGE: &str =
    "Your account has been deactivated. Please contact the administrator.";

/// Machine-readable error codes the backend attaches to failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    TokenExpired,
    TokenInvalid,
    AccountDeactivated,
    RateLimited,
    BallotTokenUsed,
    BallotTokenInvalid,
    VotingClosed,
    Validation,
    #[serde(other)]
    Unknown,
}

/// The JSON body of a failed response. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub code: Option<ErrorCode>,
    #[serde(default)]
    pub retry_after: Option<u64>,
    #[serde(default)]
    pub positions: Vec<String>,
}

impl ErrorBody {
    /// The human-readable text, preferring `error` over `message`.
    pub fn text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Work out what went wrong. The backend's `code` wins; bodies without one
    /// fall back to matching on the message text.
    pub fn classify(&self, status: u16) -> Option<ErrorCode> {
        if let Some(code) = self.code.filter(|c| *c != ErrorCode::Unknown) {
            return Some(code);
        }
        if status == 429 {
            return Some(ErrorCode::RateLimited);
        }
        let text = self.text().unwrap_or_default().to_lowercase();

        if contains_any(&text, &["deactivated"]) {
            Some(ErrorCode::AccountDeactivated)
        } else if contains_any(&text, &["already been used", "already used", "already voted"]) {
            Some(ErrorCode::BallotTokenUsed)
        } else if contains_any(
            &text,
            &["not open for voting", "voting is not open", "voting has closed"],
        ) {
            Some(ErrorCode::VotingClosed)
        } else if contains_any(&text, &["ballot token"]) {
            Some(ErrorCode::BallotTokenInvalid)
        } else if contains_any(&text, &["token expired", "jwt expired", "session expired"]) {
            Some(ErrorCode::TokenExpired)
        } else if contains_any(&text, &["invalid token", "token invalid", "no token"]) {
            Some(ErrorCode::TokenInvalid)
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not reach the server: {0}")]
    Transport(#[from] TransportError),
    #[error("Unexpected data from the server: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
    #[error("{0}")]
    Deactivated(String),
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },
    #[error("{message}")]
    Status {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
        body: ErrorBody,
    },
}

impl ApiError {
    /// Build the error for a failed response that the client did not handle itself.
    pub fn from_status(status: u16, body: ErrorBody) -> Self {
        let code = body.classify(status);
        match code {
            Some(ErrorCode::RateLimited) => Self::RateLimited {
                message: rate_limit_message(&body),
                retry_after: body.retry_after,
            },
            Some(ErrorCode::AccountDeactivated) => {
                Self::Deactivated(body.text().unwrap_or(DEACTIVATED_MESSAGE).to_string())
            }
            _ => Self::Status {
                status,
                code,
                message: body.text().unwrap_or(DEFAULT_MESSAGE).to_string(),
                body,
            },
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::SessionExpired => Some(ErrorCode::TokenExpired),
            Self::Deactivated(_) => Some(ErrorCode::AccountDeactivated),
            Self::RateLimited { .. } => Some(ErrorCode::RateLimited),
            Self::Status { code, .. } => *code,
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired | Self::Deactivated(_) => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// `"{error} {hint}"`, or whichever of the two is present.
fn rate_limit_message(body: &ErrorBody) -> String {
    let error = body.text().unwrap_or("Too many requests.");
    match body.hint.as_deref().filter(|h| !h.trim().is_empty()) {
        Some(hint) => format!("{error} {hint}"),
        None => error.to_string(),
    }
}
