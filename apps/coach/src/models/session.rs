use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Feedback;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn label(self) -> &'static str {
        match self {
            SessionStatus::InProgress => "In Progress",
            SessionStatus::Completed => "Completed",
        }
    }
}

/// One answered question inside a stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswer {
    pub question: String,
    #[serde(default)]
    pub user_answer: Option<String>,
    #[serde(default)]
    pub ai_feedback: Option<Feedback>,
}

/// A session as stored by the Interview Service, returned by `GET /sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub job_role: String,
    #[serde(default)]
    pub tech_stack: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    #[serde(default)]
    pub questions_and_answers: Vec<QuestionAnswer>,
    #[serde(default)]
    pub total_score: Option<f64>,
}

impl SessionRecord {
    pub fn answered_count(&self) -> usize {
        self.questions_and_answers.len()
    }

    /// Aggregate score, only meaningful once the session is completed.
    pub fn final_score(&self) -> Option<f64> {
        match self.status {
            SessionStatus::Completed => self.total_score,
            SessionStatus::InProgress => None,
        }
    }
}
