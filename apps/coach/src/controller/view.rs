use std::fmt;

use serde::Serialize;

use crate::controller::phase::{Phase, PhaseKind};
use crate::models::{Feedback, SessionRecord};

/// 1-based position of the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.current, self.total)
    }
}

/// Read-only snapshot handed to the UI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: PhaseKind,
    pub job_role: Option<String>,
    pub tech_stack: Option<String>,
    pub session_id: Option<String>,
    pub question: Option<String>,
    pub progress: Option<Progress>,
    pub draft: String,
    pub feedback: Option<Feedback>,
    pub busy: bool,
    pub error: Option<String>,
    pub history: Vec<SessionRecord>,
    pub is_last_question: bool,
}

impl SessionView {
    pub(crate) fn build(phase: &Phase, error: Option<&str>, history: &[SessionRecord]) -> Self {
        let session = phase.session();
        let (job_role, tech_stack) = match (phase, session) {
            (Phase::QuestionsLoading { job_role, tech_stack }, _) => {
                (Some(job_role.clone()), tech_stack.clone())
            }
            (_, Some(s)) => (Some(s.job_role.clone()), s.tech_stack.clone()),
            (_, None) => (None, None),
        };

        SessionView {
            phase: phase.kind(),
            job_role,
            tech_stack,
            session_id: session.map(|s| s.session_id.clone()),
            question: session.map(|s| s.current_question().to_string()),
            progress: session.map(|s| Progress {
                current: s.index() + 1,
                total: s.question_count(),
            }),
            draft: session.map(|s| s.draft.clone()).unwrap_or_default(),
            feedback: phase.feedback().cloned(),
            busy: phase.is_busy(),
            error: error.map(str::to_string),
            history: history.to_vec(),
            is_last_question: session.is_some_and(|s| s.is_last()),
        }
    }

    pub fn question_count(&self) -> usize {
        self.progress.map(|p| p.total).unwrap_or(0)
    }

    pub fn index(&self) -> Option<usize> {
        self.progress.map(|p| p.current - 1)
    }

    pub fn can_start(&self) -> bool {
        self.phase == PhaseKind::Idle
    }

    pub fn can_submit(&self) -> bool {
        self.phase == PhaseKind::AwaitingAnswer && !self.draft.trim().is_empty()
    }

    pub fn can_advance(&self) -> bool {
        self.phase == PhaseKind::AwaitingAdvance
    }

    /// Label for the advance action; the last question finishes the interview.
    pub fn advance_label(&self) -> &'static str {
        if self.is_last_question {
            "Finish Interview"
        } else {
            "Next Question"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::phase::ActiveSession;
    use crate::service::GeneratedQuestions;

    fn active() -> ActiveSession {
        ActiveSession::new(
            "Backend Engineer".to_string(),
            Some("Go".to_string()),
            GeneratedQuestions {
                session_id: "s1".to_string(),
                questions: vec!["Q1".to_string(), "Q2".to_string()],
            },
        )
    }

    #[test]
    fn test_progress_display() {
        let p = Progress {
            current: 1,
            total: 2,
        };
        assert_eq!(p.to_string(), "1 of 2");
    }

    #[test]
    fn test_idle_view_is_empty() {
        let view = SessionView::build(&Phase::Idle, None, &[]);
        assert_eq!(view.phase, PhaseKind::Idle);
        assert_eq!(view.question_count(), 0);
        assert!(view.session_id.is_none());
        assert!(view.job_role.is_none());
        assert!(view.can_start());
        assert!(!view.can_submit());
        assert!(!view.can_advance());
    }

    #[test]
    fn test_loading_view_shows_requested_role() {
        let phase = Phase::QuestionsLoading {
            job_role: "Data Analyst".to_string(),
            tech_stack: None,
        };
        let view = SessionView::build(&phase, None, &[]);
        assert!(view.busy);
        assert_eq!(view.job_role.as_deref(), Some("Data Analyst"));
        assert!(!view.can_start());
    }

    #[test]
    fn test_submit_gating_follows_draft() {
        let mut session = active();
        let view = SessionView::build(&Phase::AwaitingAnswer(session.clone()), None, &[]);
        assert!(!view.can_submit());

        session.draft = "I would use a pool.".to_string();
        let view = SessionView::build(&Phase::AwaitingAnswer(session), None, &[]);
        assert!(view.can_submit());
        assert_eq!(view.progress.unwrap().to_string(), "1 of 2");
        assert_eq!(view.question.as_deref(), Some("Q1"));
        assert_eq!(view.advance_label(), "Next Question");
    }

    #[test]
    fn test_feedback_view_disables_submit() {
        let feedback: Feedback = serde_json::from_str(r#"{"score": 7}"#).unwrap();
        let mut session = active();
        session.draft = "answer".to_string();
        let phase = Phase::AwaitingAdvance {
            session,
            feedback: feedback.clone(),
        };
        let view = SessionView::build(&phase, Some("old"), &[]);
        assert!(!view.can_submit());
        assert!(view.can_advance());
        assert_eq!(view.feedback, Some(feedback));
        assert_eq!(view.error.as_deref(), Some("old"));
    }

    #[test]
    fn test_last_question_label() {
        let session = active().next().unwrap();
        let view = SessionView::build(&Phase::AwaitingAnswer(session), None, &[]);
        assert!(view.is_last_question);
        assert_eq!(view.index(), Some(1));
        assert_eq!(view.advance_label(), "Finish Interview");
    }
}
