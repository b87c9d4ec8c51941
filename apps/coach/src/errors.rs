use thiserror::Error;

use crate::service::ServiceError;

pub const BLANK_JOB_ROLE: &str = "Please enter a job role.";
pub const BLANK_ANSWER: &str = "Please type your answer before submitting.";
pub const NO_ACTIVE_SESSION: &str = "No active interview session. Please start a new interview.";
pub const FEEDBACK_REQUIRED: &str =
    "Please submit your answer and get feedback before moving to the next question.";
pub const GENERATE_FAILED: &str = "Failed to generate questions. Please try again.";
pub const SUBMIT_FAILED: &str = "Failed to get feedback. Please try again.";
pub const COMPLETE_FAILED: &str = "Failed to mark session as completed.";
pub const HISTORY_FAILED: &str = "Failed to load past sessions.";
pub const ALREADY_ANSWERED: &str =
    "Feedback for this question has already been received. Move on to the next question.";
pub const SESSION_IN_PROGRESS: &str =
    "An interview is already in progress. Reset it before starting a new one.";
pub const BUSY: &str = "Another request is still in progress. Please wait.";
pub const SUPERSEDED: &str = "The request was superseded by a newer interview session.";

/// Controller-level error type.
///
/// `Validation` and `State` are raised locally, before any call to the
/// Interview Service. `Service` wraps whatever the service (or the transport
/// underneath it) reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoachError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    State(String),

    #[error("{message}")]
    Service {
        status: Option<u16>,
        message: String,
    },
}

impl CoachError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoachError::Validation(message.into())
    }

    pub fn state(message: impl Into<String>) -> Self {
        CoachError::State(message.into())
    }

    /// Maps a transport-level failure to a user-facing error, preferring the
    /// service's own `message` and falling back to `fallback` otherwise.
    pub fn from_service(err: ServiceError, fallback: &str) -> Self {
        let message = err
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        CoachError::Service {
            status: err.status,
            message,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, CoachError::Validation(_) | CoachError::State(_))
    }
}
