//! HTTP client for the Interview Service REST API (`/api/interview`).
//!
//! Every call re-reads the bearer token from the injected `CredentialSource`.
//! Timeouts come from config and surface as ordinary `ServiceError`s.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{Feedback, SessionRecord};
use crate::service::{
    CredentialSource, GenerateQuestionsRequest, GeneratedQuestions, InterviewService,
    ServiceError, SubmitAnswerRequest, SubmitAnswerResponse,
};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct HttpInterviewService {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpInterviewService {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Appends `id` to `path` as a single percent-encoded segment, so ids
    /// containing `/`, `?` or `#` still address the intended resource.
    fn resource_url(&self, path: &str, id: &str) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| ServiceError::invalid_url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ServiceError::invalid_url(format!("{} has no path", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => {
                warn!("No bearer token available; sending unauthenticated request");
                request
            }
        }
    }

    /// Sends the request and turns any non-2xx status into a `ServiceError`,
    /// lifting the service's `message` field out of the body when present.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.message);
        warn!("Interview Service returned {}: {}", status, body);
        Err(ServiceError {
            status: Some(status.as_u16()),
            message,
            detail: format!("status {status}"),
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ServiceError::malformed(e.to_string()))
    }
}

#[async_trait]
impl InterviewService for HttpInterviewService {
    async fn generate_questions(
        &self,
        request: &GenerateQuestionsRequest,
    ) -> Result<GeneratedQuestions, ServiceError> {
        let response = self
            .send(self.client.post(self.url("/generate-questions")).json(request))
            .await?;
        let generated: GeneratedQuestions = Self::json(response).await?;
        debug!(
            "Generated {} questions for session {}",
            generated.questions.len(),
            generated.session_id
        );
        Ok(generated)
    }

    async fn submit_answer(&self, request: &SubmitAnswerRequest) -> Result<Feedback, ServiceError> {
        let response = self
            .send(self.client.post(self.url("/submit-answer")).json(request))
            .await?;
        let body: SubmitAnswerResponse = Self::json(response).await?;
        Ok(body.ai_feedback)
    }

    async fn complete_session(&self, session_id: &str) -> Result<(), ServiceError> {
        let url = self.resource_url("/complete-session", session_id)?;
        self.send(self.client.put(url).json(&serde_json::json!({})))
            .await?;
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, ServiceError> {
        let response = self.send(self.client.get(self.url("/sessions"))).await?;
        Self::json(response).await
    }
}
