//! Plain-text rendering of the controller's view for the terminal UI.

use std::fmt::Write;

use crate::controller::{PhaseKind, SessionView};
use crate::models::{Feedback, SessionRecord};

pub const NO_HISTORY: &str = "No past sessions found. Start an interview to see your history!";

pub fn role_line(job_role: &str, tech_stack: Option<&str>) -> String {
    match tech_stack {
        Some(stack) if !stack.trim().is_empty() => format!("{job_role} ({stack})"),
        _ => job_role.to_string(),
    }
}

/// "Question N of M:" header plus the question text.
pub fn question(view: &SessionView) -> Option<String> {
    let progress = view.progress?;
    let text = view.question.as_deref()?;
    let role = view.job_role.as_deref().unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "Job Role: {}", role_line(role, view.tech_stack.as_deref()));
    let _ = writeln!(out, "Question {progress}:");
    let _ = write!(out, "  {text}");
    Some(out)
}

pub fn feedback(feedback: &Feedback) -> String {
    let mut out = String::from("AI Feedback:\n");
    let _ = writeln!(out, "  Score: {}/10", feedback.score);
    let _ = writeln!(out, "  Strengths: {}", feedback.strengths);
    let _ = writeln!(out, "  Weaknesses: {}", feedback.weaknesses);
    let _ = writeln!(out, "  Improvements: {}", feedback.improvements);
    let _ = write!(out, "  AI Suggested Answer: {}", feedback.suggested_answer);
    out
}

pub fn history(sessions: &[SessionRecord]) -> String {
    if sessions.is_empty() {
        return NO_HISTORY.to_string();
    }

    let mut out = String::from("Past Interview Sessions");
    for session in sessions {
        let _ = write!(
            out,
            "\n- Job Role: {}\n  Date: {}\n  Status: {}\n  Questions Answered: {}",
            role_line(&session.job_role, session.tech_stack.as_deref()),
            session.created_at.format("%Y-%m-%d"),
            session.status.label(),
            session.answered_count(),
        );
        if let Some(score) = session.final_score() {
            let _ = write!(out, "\n  Total Score: {score:.2}");
        }
    }
    out
}

/// One-line summary of where the rehearsal stands.
pub fn status(view: &SessionView) -> String {
    match view.phase {
        PhaseKind::Idle => "No active interview. Use `start <role> [| <stack>]`.".to_string(),
        PhaseKind::QuestionsLoading => "Generating questions...".to_string(),
        PhaseKind::Submitting => "Waiting for feedback...".to_string(),
        PhaseKind::Completing => "Finishing the interview...".to_string(),
        PhaseKind::AwaitingAnswer => match view.progress {
            Some(p) => format!("Question {p}: type your answer."),
            None => String::new(),
        },
        PhaseKind::AwaitingAdvance => {
            format!("Feedback received. `next` to continue ({}).", view.advance_label())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::SessionStatus;

    fn record(status: SessionStatus, total_score: Option<f64>) -> SessionRecord {
        SessionRecord {
            id: "s1".to_string(),
            job_role: "Backend Engineer".to_string(),
            tech_stack: Some("Go".to_string()),
            created_at: chrono::Utc.with_ymd_and_hms(2024, 6, 4, 12, 30, 0).unwrap(),
            status,
            questions_and_answers: vec![],
            total_score,
        }
    }

    #[test]
    fn test_role_line() {
        assert_eq!(role_line("QA", None), "QA");
        assert_eq!(role_line("QA", Some("")), "QA");
        assert_eq!(role_line("QA", Some("Rust")), "QA (Rust)");
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(history(&[]), NO_HISTORY);
    }

    #[test]
    fn test_completed_session_shows_two_decimal_score() {
        let out = history(&[record(SessionStatus::Completed, Some(7.0))]);
        assert!(out.contains("Job Role: Backend Engineer (Go)"));
        assert!(out.contains("Date: 2024-06-04"));
        assert!(out.contains("Status: Completed"));
        assert!(out.contains("Total Score: 7.00"));
    }

    #[test]
    fn test_in_progress_session_hides_score() {
        let out = history(&[record(SessionStatus::InProgress, Some(3.0))]);
        assert!(out.contains("Status: In Progress"));
        assert!(!out.contains("Total Score"));
    }

    #[test]
    fn test_feedback_block() {
        let fb = Feedback {
            score: 7.0,
            strengths: "Clear".to_string(),
            weaknesses: "Short".to_string(),
            improvements: "Add numbers".to_string(),
            suggested_answer: "Use a bounded pool.".to_string(),
        };
        let out = feedback(&fb);
        assert!(out.contains("Score: 7/10"));
        assert!(out.ends_with("AI Suggested Answer: Use a bounded pool."));
    }
}
