use std::sync::Arc;

use serde::Serialize;

use crate::errors::{CoachError, ALREADY_ANSWERED, BUSY, FEEDBACK_REQUIRED, NO_ACTIVE_SESSION};
use crate::models::Feedback;
use crate::service::GeneratedQuestions;

/// The session currently being answered.
///
/// The question list is fixed when the session is created; `index` always
/// points inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub session_id: String,
    pub job_role: String,
    pub tech_stack: Option<String>,
    questions: Arc<[String]>,
    index: usize,
    pub draft: String,
}

impl ActiveSession {
    /// `generated` must already have passed `GeneratedQuestions::validate`.
    pub(crate) fn new(
        job_role: String,
        tech_stack: Option<String>,
        generated: GeneratedQuestions,
    ) -> Self {
        Self {
            session_id: generated.session_id,
            job_role,
            tech_stack,
            questions: generated.questions.into(),
            index: 0,
            draft: String::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> &str {
        self.questions
            .get(self.index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    /// Moves to the following question with a fresh draft.
    /// On the last question the session is handed back unchanged.
    pub(crate) fn next(self) -> Result<Self, Self> {
        if self.is_last() {
            return Err(self);
        }
        Ok(Self {
            index: self.index + 1,
            draft: String::new(),
            ..self
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Idle,
    QuestionsLoading,
    AwaitingAnswer,
    Submitting,
    AwaitingAdvance,
    Completing,
}

/// Controller state machine. Each phase carries exactly the data that is
/// meaningful in it, so feedback cannot exist without an active session.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    QuestionsLoading {
        job_role: String,
        tech_stack: Option<String>,
    },
    AwaitingAnswer(ActiveSession),
    Submitting(ActiveSession),
    AwaitingAdvance {
        session: ActiveSession,
        feedback: Feedback,
    },
    Completing(ActiveSession),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::QuestionsLoading { .. } => PhaseKind::QuestionsLoading,
            Phase::AwaitingAnswer(_) => PhaseKind::AwaitingAnswer,
            Phase::Submitting(_) => PhaseKind::Submitting,
            Phase::AwaitingAdvance { .. } => PhaseKind::AwaitingAdvance,
            Phase::Completing(_) => PhaseKind::Completing,
        }
    }

    /// A network call is in flight; new intents are rejected, not queued.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Phase::QuestionsLoading { .. } | Phase::Submitting(_) | Phase::Completing(_)
        )
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        match self {
            Phase::AwaitingAnswer(session)
            | Phase::Submitting(session)
            | Phase::Completing(session)
            | Phase::AwaitingAdvance { session, .. } => Some(session),
            Phase::Idle | Phase::QuestionsLoading { .. } => None,
        }
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        match self {
            Phase::AwaitingAdvance { feedback, .. } => Some(feedback),
            _ => None,
        }
    }

    /// Why an answer cannot be taken in this phase.
    pub(crate) fn answer_rejection(&self) -> CoachError {
        match self {
            _ if self.is_busy() => CoachError::state(BUSY),
            Phase::AwaitingAdvance { .. } => CoachError::state(ALREADY_ANSWERED),
            _ => CoachError::state(NO_ACTIVE_SESSION),
        }
    }

    /// Why the controller cannot move past the current question in this phase.
    pub(crate) fn advance_rejection(&self) -> CoachError {
        match self {
            _ if self.is_busy() => CoachError::state(BUSY),
            Phase::AwaitingAnswer(_) => CoachError::state(FEEDBACK_REQUIRED),
            _ => CoachError::state(NO_ACTIVE_SESSION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(questions: &[&str]) -> ActiveSession {
        ActiveSession::new(
            "Backend Engineer".to_string(),
            Some("Go".to_string()),
            GeneratedQuestions {
                session_id: "s1".to_string(),
                questions: questions.iter().map(|q| q.to_string()).collect(),
            },
        )
    }

    #[test]
    fn test_new_session_starts_at_first_question() {
        let s = session(&["Q1", "Q2", "Q3"]);
        assert_eq!(s.index(), 0);
        assert_eq!(s.current_question(), "Q1");
        assert_eq!(s.question_count(), 3);
        assert!(!s.is_last());
    }

    #[test]
    fn test_next_clears_draft_and_stops_at_last() {
        let mut s = session(&["Q1", "Q2"]);
        s.draft = "half an answer".to_string();

        let s = s.next().unwrap();
        assert_eq!(s.index(), 1);
        assert_eq!(s.current_question(), "Q2");
        assert!(s.draft.is_empty());
        assert_eq!(s.session_id, "s1");
        assert!(s.is_last());
        let last = s.next().unwrap_err();
        assert_eq!(last.index(), 1);
    }

    #[test]
    fn test_single_question_session_is_last_immediately() {
        assert!(session(&["Only"]).is_last());
    }

    #[test]
    fn test_busy_phases() {
        let s = session(&["Q1"]);
        assert!(!Phase::Idle.is_busy());
        assert!(Phase::QuestionsLoading {
            job_role: "x".into(),
            tech_stack: None
        }
        .is_busy());
        assert!(Phase::Submitting(s.clone()).is_busy());
        assert!(Phase::Completing(s.clone()).is_busy());
        assert!(!Phase::AwaitingAnswer(s).is_busy());
    }

    #[test]
    fn test_feedback_only_in_awaiting_advance() {
        let s = session(&["Q1"]);
        let feedback: Feedback = serde_json::from_str(r#"{"score": 6}"#).unwrap();
        assert!(Phase::AwaitingAnswer(s.clone()).feedback().is_none());
        let phase = Phase::AwaitingAdvance {
            session: s,
            feedback: feedback.clone(),
        };
        assert_eq!(phase.feedback(), Some(&feedback));
        assert_eq!(phase.kind(), PhaseKind::AwaitingAdvance);
    }

    #[test]
    fn test_rejection_messages() {
        let s = session(&["Q1"]);
        assert_eq!(
            Phase::Idle.answer_rejection(),
            CoachError::state(NO_ACTIVE_SESSION)
        );
        assert_eq!(
            Phase::Submitting(s.clone()).answer_rejection(),
            CoachError::state(BUSY)
        );
        assert_eq!(
            Phase::AwaitingAnswer(s).advance_rejection(),
            CoachError::state(FEEDBACK_REQUIRED)
        );
    }
}
