//! Interview Service contract: the four calls the controller consumes.
//!
//! The controller only ever talks to `dyn InterviewService`; `HttpInterviewService`
//! is the production implementation and tests substitute in-memory stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Feedback, SessionRecord};

pub mod credentials;
pub mod http;

pub use credentials::{CredentialSource, EnvToken, StaticToken};
pub use http::HttpInterviewService;

/// Failure reported by (or on the way to) the Interview Service.
///
/// `message` is the service's user-facing `message` field when it sent one;
/// `detail` is diagnostic text for logs only.
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct ServiceError {
    pub status: Option<u16>,
    pub message: Option<String>,
    pub detail: String,
}

impl ServiceError {
    pub fn malformed(what: impl Into<String>) -> Self {
        ServiceError {
            status: None,
            message: None,
            detail: format!("malformed response: {}", what.into()),
        }
    }

    pub fn invalid_url(what: impl Into<String>) -> Self {
        ServiceError {
            status: None,
            message: None,
            detail: format!("invalid request url: {}", what.into()),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError {
            status: err.status().map(|s| s.as_u16()),
            message: None,
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    pub job_role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestions {
    pub session_id: String,
    pub questions: Vec<String>,
}

impl GeneratedQuestions {
    /// A new session needs an id and at least one question, otherwise the
    /// current index has nothing to point at.
    pub fn validate(self) -> Result<Self, ServiceError> {
        if self.session_id.trim().is_empty() {
            return Err(ServiceError::malformed("session id is empty"));
        }
        if self.questions.is_empty() {
            return Err(ServiceError::malformed("no questions were generated"));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub session_id: String,
    pub question: String,
    pub user_answer: String,
    pub job_role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub ai_feedback: Feedback,
}

/// Validates a grading result before it is shown to the candidate.
pub fn checked_feedback(feedback: Feedback) -> Result<Feedback, ServiceError> {
    if !feedback.score_in_range() {
        return Err(ServiceError::malformed(format!(
            "score {} is outside 0-10",
            feedback.score
        )));
    }
    Ok(feedback)
}

#[async_trait]
pub trait InterviewService: Send + Sync {
    async fn generate_questions(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> Result<GeneratedQuestions, ServiceError>;

    async fn submit_answer(&self, request: &SubmitAnswerRequest) -> Result<Feedback, ServiceError>;

    async fn complete_session(&self, session_id: &str) -> Result<(), ServiceError>;

    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_omits_missing_stack() {
        let body = serde_json::to_value(GenerateQuestionsRequest {
            job_role: "Backend Engineer".to_string(),
            tech_stack: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "jobRole": "Backend Engineer" }));
    }

    #[test]
    fn test_submit_request_uses_camel_case() {
        let body = serde_json::to_value(SubmitAnswerRequest {
            session_id: "s1".to_string(),
            question: "Q1".to_string(),
            user_answer: "I would use a pool.".to_string(),
            job_role: "Backend Engineer".to_string(),
        })
        .unwrap();
        assert_eq!(body["sessionId"], "s1");
        assert_eq!(body["userAnswer"], "I would use a pool.");
        assert_eq!(body["jobRole"], "Backend Engineer");
    }

    #[test]
    fn test_generated_questions_validation() {
        let ok = GeneratedQuestions {
            session_id: "s1".to_string(),
            questions: vec!["Q1".to_string()],
        };
        assert!(ok.validate().is_ok());

        let empty = GeneratedQuestions {
            session_id: "s1".to_string(),
            questions: vec![],
        };
        let err = empty.validate().unwrap_err();
        assert!(err.message.is_none());
        assert!(err.detail.contains("no questions"));

        let no_id = GeneratedQuestions {
            session_id: " ".to_string(),
            questions: vec!["Q1".to_string()],
        };
        assert!(no_id.validate().is_err());
    }

    #[test]
    fn test_out_of_range_feedback_is_rejected() {
        let feedback: Feedback = serde_json::from_str(r#"{"score": 12}"#).unwrap();
        assert!(checked_feedback(feedback).is_err());
    }
}
