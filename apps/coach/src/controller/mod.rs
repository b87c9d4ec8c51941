//! Interview Session Controller: the client-side state machine that drives
//! one rehearsal from question generation to completion.
//!
//! Flow: Idle → QuestionsLoading → AwaitingAnswer ⇄ Submitting → AwaitingAdvance
//!       → AwaitingAnswer (next question) | Completing → Idle.
//!
//! Only one mutation is in flight at a time. The lock is never held across a
//! service call; results are applied only if the controller epoch they were
//! issued under is still current, so `reset`/`start` make older responses inert.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{
    CoachError, BLANK_ANSWER, BLANK_JOB_ROLE, BUSY, COMPLETE_FAILED, GENERATE_FAILED,
    HISTORY_FAILED, SESSION_IN_PROGRESS, SUBMIT_FAILED, SUPERSEDED,
};
use crate::models::{Feedback, SessionRecord};
use crate::service::{
    checked_feedback, GenerateQuestionsRequest, GeneratedQuestions, InterviewService,
    ServiceError, SubmitAnswerRequest,
};

pub mod phase;
pub mod view;

pub use phase::{ActiveSession, Phase, PhaseKind};
pub use view::{Progress, SessionView};

/// Result of a successful `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at `index` (0-based).
    Next { index: usize },
    /// The last question was passed; the controller is back to `Idle`.
    /// `completed` reports whether the service acknowledged completion.
    Finished { completed: bool },
}

#[derive(Default)]
struct Inner {
    phase: Phase,
    error: Option<String>,
    history: Vec<SessionRecord>,
    /// Bumped by `start` and `reset`; responses tagged with an older epoch are dropped.
    epoch: u64,
    /// Latest issued history fetch; only its result is applied.
    history_ticket: u64,
    history_task: Option<JoinHandle<()>>,
}

impl Inner {
    fn supersede(&mut self) {
        self.epoch += 1;
        if let Some(task) = self.history_task.take() {
            task.abort();
        }
    }

    fn reset(&mut self) {
        self.supersede();
        self.phase = Phase::Idle;
        self.error = None;
    }

    fn next_history_ticket(&mut self) -> (u64, u64) {
        self.history_ticket += 1;
        (self.history_ticket, self.epoch)
    }

    /// Applies a history result if it is still the latest fetch for this epoch.
    /// Returns `None` when the result was stale and dropped.
    fn apply_history(
        &mut self,
        ticket: u64,
        epoch: u64,
        result: Result<Vec<SessionRecord>, ServiceError>,
    ) -> Option<Result<(), ServiceError>> {
        if ticket != self.history_ticket || epoch != self.epoch {
            debug!("Discarding stale session history (ticket {ticket})");
            return None;
        }
        Some(result.map(|sessions| {
            debug!("Session history refreshed: {} sessions", sessions.len());
            self.history = sessions;
        }))
    }
}

#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Mutex<Inner>>,
    service: Arc<dyn InterviewService>,
}

impl SessionController {
    pub fn new(service: Arc<dyn InterviewService>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            service,
        }
    }

    async fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().await
    }

    pub async fn view(&self) -> SessionView {
        let inner = self.lock().await;
        SessionView::build(&inner.phase, inner.error.as_deref(), &inner.history)
    }

    pub async fn phase(&self) -> PhaseKind {
        self.lock().await.phase.kind()
    }

    /// Begins a new session: generates questions for `job_role` and shows the first one.
    pub async fn start(&self, job_role: &str, tech_stack: Option<&str>) -> Result<(), CoachError> {
        let job_role = job_role.trim();
        if job_role.is_empty() {
            return Err(CoachError::validation(BLANK_JOB_ROLE));
        }
        let tech_stack = tech_stack
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let (epoch, request) = {
            let mut inner = self.lock().await;
            if inner.phase.is_busy() {
                return Err(CoachError::state(BUSY));
            }
            if inner.phase != Phase::Idle {
                return Err(CoachError::state(SESSION_IN_PROGRESS));
            }
            inner.supersede();
            inner.error = None;
            inner.phase = Phase::QuestionsLoading {
                job_role: job_role.to_string(),
                tech_stack: tech_stack.clone(),
            };
            let request = GenerateQuestionsRequest {
                job_role: job_role.to_string(),
                tech_stack,
            };
            (inner.epoch, request)
        };

        info!("Generating questions for role '{}'", request.job_role);
        let result = self
            .service
            .generate_questions(&request)
            .await
            .and_then(GeneratedQuestions::validate);

        let mut inner = self.lock().await;
        if inner.epoch != epoch {
            debug!("Discarding question generation result for a superseded session");
            return Err(CoachError::state(SUPERSEDED));
        }

        match result {
            Ok(generated) => {
                info!(
                    "Interview session {} started with {} questions",
                    generated.session_id,
                    generated.questions.len()
                );
                let session = ActiveSession::new(request.job_role, request.tech_stack, generated);
                inner.phase = Phase::AwaitingAnswer(session);
                Ok(())
            }
            Err(err) => {
                warn!("Question generation failed: {err}");
                let err = CoachError::from_service(err, GENERATE_FAILED);
                inner.phase = Phase::Idle;
                inner.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Replaces the draft answer for the current question.
    pub async fn set_draft(&self, text: impl Into<String>) -> Result<(), CoachError> {
        let mut inner = self.lock().await;
        match &mut inner.phase {
            Phase::AwaitingAnswer(session) => {
                session.draft = text.into();
                Ok(())
            }
            other => Err(other.answer_rejection()),
        }
    }

    /// Sends `text` for grading. At most one feedback is accepted per question.
    pub async fn submit_answer(&self, text: impl Into<String>) -> Result<Feedback, CoachError> {
        let text = text.into();

        let (epoch, request) = {
            let mut inner = self.lock().await;
            let mut session = match std::mem::take(&mut inner.phase) {
                Phase::AwaitingAnswer(session) => session,
                other => {
                    let err = other.answer_rejection();
                    inner.phase = other;
                    return Err(err);
                }
            };
            if text.trim().is_empty() {
                inner.phase = Phase::AwaitingAnswer(session);
                return Err(CoachError::validation(BLANK_ANSWER));
            }

            session.draft = text.clone();
            let request = SubmitAnswerRequest {
                session_id: session.session_id.clone(),
                question: session.current_question().to_string(),
                user_answer: text,
                job_role: session.job_role.clone(),
            };
            inner.phase = Phase::Submitting(session);
            inner.error = None;
            (inner.epoch, request)
        };

        let result = self
            .service
            .submit_answer(&request)
            .await
            .and_then(checked_feedback);

        let mut inner = self.lock().await;
        if inner.epoch != epoch {
            debug!(
                "Discarding feedback for superseded session {}",
                request.session_id
            );
            return Err(CoachError::state(SUPERSEDED));
        }
        let session = match std::mem::take(&mut inner.phase) {
            Phase::Submitting(session) => session,
            other => {
                inner.phase = other;
                return Err(CoachError::state(SUPERSEDED));
            }
        };

        match result {
            Ok(feedback) => {
                info!(
                    "Answer for question {} of session {} scored {}/10",
                    session.index() + 1,
                    session.session_id,
                    feedback.score
                );
                inner.phase = Phase::AwaitingAdvance {
                    session,
                    feedback: feedback.clone(),
                };
                self.schedule_history_refresh(&mut inner);
                Ok(feedback)
            }
            Err(err) => {
                warn!("Answer submission failed: {err}");
                let err = CoachError::from_service(err, SUBMIT_FAILED);
                inner.phase = Phase::AwaitingAnswer(session);
                inner.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Moves past the current question once its feedback has arrived.
    ///
    /// On the last question the session is marked complete on the service and
    /// the controller resets regardless of whether that call succeeded.
    pub async fn advance(&self) -> Result<Advance, CoachError> {
        let (epoch, session_id) = {
            let mut inner = self.lock().await;
            let session = match std::mem::take(&mut inner.phase) {
                Phase::AwaitingAdvance { session, .. } => session,
                other => {
                    let err = other.advance_rejection();
                    inner.phase = other;
                    return Err(err);
                }
            };

            match session.next() {
                Ok(next) => {
                    let index = next.index();
                    debug!(
                        "Session {} advanced to question {}",
                        next.session_id,
                        index + 1
                    );
                    inner.phase = Phase::AwaitingAnswer(next);
                    inner.error = None;
                    return Ok(Advance::Next { index });
                }
                Err(last) => {
                    let session_id = last.session_id.clone();
                    inner.phase = Phase::Completing(last);
                    (inner.epoch, session_id)
                }
            }
        };

        let result = self.service.complete_session(&session_id).await;
        let completed = result.is_ok();

        let mut inner = self.lock().await;
        if inner.epoch != epoch {
            debug!("Session {session_id} was reset while completing");
            return Ok(Advance::Finished { completed });
        }

        inner.reset();
        match result {
            Ok(()) => info!("Interview session {session_id} completed"),
            Err(err) => {
                warn!("Failed to complete session {session_id}: {err}");
                inner.error = Some(CoachError::from_service(err, COMPLETE_FAILED).to_string());
            }
        }
        Ok(Advance::Finished { completed })
    }

    /// Abandons any active session and returns to `Idle`. Never fails.
    pub async fn reset(&self) {
        let mut inner = self.lock().await;
        if let Some(session) = inner.phase.session() {
            debug!("Resetting session {}", session.session_id);
        }
        inner.reset();
    }

    /// Fetches the session history. Failure is recorded as the last error
    /// but never touches the active session.
    pub async fn refresh_history(&self) -> Result<(), CoachError> {
        let (ticket, epoch) = self.lock().await.next_history_ticket();

        let result = self.service.list_sessions().await;

        let mut inner = self.lock().await;
        match inner.apply_history(ticket, epoch, result) {
            None => Err(CoachError::state(SUPERSEDED)),
            Some(Ok(())) => Ok(()),
            Some(Err(err)) => {
                warn!("Failed to load session history: {err}");
                let err = CoachError::from_service(err, HISTORY_FAILED);
                inner.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Background history fetch after a graded answer. Replaces any earlier
    /// pending fetch; `reset`/`start` abort it.
    fn schedule_history_refresh(&self, inner: &mut Inner) {
        if let Some(task) = inner.history_task.take() {
            task.abort();
        }
        let (ticket, epoch) = inner.next_history_ticket();
        let controller = self.clone();

        inner.history_task = Some(tokio::spawn(async move {
            let result = controller.service.list_sessions().await;
            let mut inner = controller.lock().await;
            if let Some(Err(err)) = inner.apply_history(ticket, epoch, result) {
                warn!("Background session history refresh failed: {err}");
            }
        }));
    }
}
