//! Contact form
//!
//! The form owns its draft fields and a transient notice. Submission goes
//! through a [`ContactSubmitter`]; failures are shown to the user and never
//! retried automatically.

use crate::error::SubmitError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// What the visitor typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Required-field checks, mirroring the form's `required` inputs
    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.name.trim().is_empty() {
            return Err(SubmitError::Invalid("Please enter your name"));
        }
        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err(SubmitError::Invalid("Please enter a valid email address"));
        }
        if self.message.trim().is_empty() {
            return Err(SubmitError::Invalid("Please enter a message"));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }
}

/// Delivers contact messages somewhere
#[async_trait]
pub trait ContactSubmitter: Send + Sync {
    async fn submit(&self, message: &ContactMessage) -> Result<(), SubmitError>;
}

/// Posts the message as JSON to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SubmitError::Network(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContactSubmitter for HttpSubmitter {
    async fn submit(&self, message: &ContactMessage) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(message)
            .send()
            .await
            .map_err(|err| SubmitError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
            });
        }
        tracing::debug!(endpoint = %self.endpoint, %status, "contact message delivered");
        Ok(())
    }
}

/// Accepts every message and logs it (no endpoint configured)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSubmitter;

#[async_trait]
impl ContactSubmitter for LogSubmitter {
    async fn submit(&self, message: &ContactMessage) -> Result<(), SubmitError> {
        tracing::info!(name = %message.name, email = %message.email, "contact message accepted (no endpoint configured)");
        Ok(())
    }
}

/// Replays queued outcomes and records what was sent; succeeds once the
/// queue is empty
#[derive(Debug, Default)]
pub struct ScriptedSubmitter {
    outcomes: Mutex<VecDeque<Result<(), SubmitError>>>,
    sent: Mutex<Vec<ContactMessage>>,
}

impl ScriptedSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(outcome: Result<(), SubmitError>) -> Self {
        let submitter = Self::new();
        submitter.push_outcome(outcome);
        submitter
    }

    pub fn push_outcome(&self, outcome: Result<(), SubmitError>) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(outcome);
        }
    }

    /// Messages received so far
    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ContactSubmitter for ScriptedSubmitter {
    async fn submit(&self, message: &ContactMessage) -> Result<(), SubmitError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut outcomes| outcomes.pop_front())
            .unwrap_or(Ok(()))
    }
}

/// Form lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Editing,
    Sending,
    /// Confirmation showing until `until_ms`
    Sent { until_ms: u64 },
    /// Error notice showing until `until_ms`; fields kept
    Failed { notice: String, until_ms: u64 },
}

/// User-visible notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success,
    Error(String),
}

/// Contact form state
#[derive(Debug, Clone)]
pub struct ContactForm {
    draft: ContactMessage,
    status: FormStatus,
    confirmation_ms: u64,
}

impl ContactForm {
    pub fn new(confirmation_ms: u64) -> Self {
        Self {
            draft: ContactMessage::default(),
            status: FormStatus::Editing,
            confirmation_ms,
        }
    }

    pub fn draft(&self) -> &ContactMessage {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: ContactMessage) {
        self.draft = draft;
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn notice(&self) -> Option<Notice> {
        match &self.status {
            FormStatus::Sent { .. } => Some(Notice::Success),
            FormStatus::Failed { notice, .. } => Some(Notice::Error(notice.clone())),
            FormStatus::Editing | FormStatus::Sending => None,
        }
    }

    /// Submit the current draft at logical time `now_ms`
    ///
    /// Success clears the fields and shows the confirmation for
    /// `confirmation_ms`. Failure keeps the fields and shows the error for
    /// the same duration.
    pub async fn submit(
        &mut self,
        submitter: &dyn ContactSubmitter,
        now_ms: u64,
    ) -> Result<(), SubmitError> {
        if self.status == FormStatus::Sending {
            return Err(SubmitError::Busy);
        }
        if let Err(err) = self.draft.validate() {
            self.fail(&err, now_ms);
            return Err(err);
        }

        self.status = FormStatus::Sending;
        match submitter.submit(&self.draft).await {
            Ok(()) => {
                self.draft = ContactMessage::default();
                self.status = FormStatus::Sent {
                    until_ms: now_ms + self.confirmation_ms,
                };
                tracing::debug!("contact form sent");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "contact submission failed");
                self.fail(&err, now_ms);
                Err(err)
            }
        }
    }

    fn fail(&mut self, err: &SubmitError, now_ms: u64) {
        self.status = FormStatus::Failed {
            notice: err.to_string(),
            until_ms: now_ms + self.confirmation_ms,
        };
    }

    /// Dismiss an expired notice, keeping the draft. Returns true when the
    /// notice closed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.status {
            FormStatus::Sent { until_ms } | FormStatus::Failed { until_ms, .. }
                if now_ms >= until_ms =>
            {
                self.status = FormStatus::Editing;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactMessage {
        ContactMessage::new("Sam", "sam@example.com", "Hello there")
    }

    #[test]
    fn validation_requires_every_field() {
        assert!(filled().validate().is_ok());
        assert!(ContactMessage::new("", "a@b.c", "x").validate().is_err());
        assert!(ContactMessage::new("Sam", "not-an-email", "x").validate().is_err());
        assert!(ContactMessage::new("Sam", "@b.c", "x").validate().is_err());
        assert!(ContactMessage::new("Sam", "a@b.c", "  ").validate().is_err());
    }

    #[tokio::test]
    async fn success_clears_fields_and_confirmation_auto_dismisses() {
        let submitter = ScriptedSubmitter::new();
        let mut form = ContactForm::new(3000);
        form.set_draft(filled());

        form.submit(&submitter, 10_000).await.unwrap();
        assert!(form.draft().is_empty());
        assert_eq!(form.notice(), Some(Notice::Success));
        assert_eq!(submitter.sent(), vec![filled()]);

        assert!(!form.tick(12_999));
        assert_eq!(form.notice(), Some(Notice::Success));
        assert!(form.tick(13_000));
        assert_eq!(form.notice(), None);
    }

    #[tokio::test]
    async fn failure_notice_expires_but_keeps_fields() {
        let submitter =
            ScriptedSubmitter::with_outcome(Err(SubmitError::Network("connection refused".into())));
        let mut form = ContactForm::new(3000);
        form.set_draft(filled());

        let err = form.submit(&submitter, 0).await.unwrap_err();
        assert!(matches!(err, SubmitError::Network(_)));
        assert_eq!(form.draft(), &filled());
        assert!(matches!(form.notice(), Some(Notice::Error(_))));
        assert_eq!(submitter.sent().len(), 1);

        // The error notice is transient; the draft survives its dismissal
        assert!(!form.tick(2_999));
        assert!(matches!(form.notice(), Some(Notice::Error(_))));
        assert!(form.tick(3_000));
        assert_eq!(form.notice(), None);
        assert_eq!(form.status(), &FormStatus::Editing);
        assert_eq!(form.draft(), &filled());
        assert_eq!(submitter.sent().len(), 1);

        // A manual resubmit goes through
        form.submit(&submitter, 60_000).await.unwrap();
        assert_eq!(submitter.sent().len(), 2);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_submitter() {
        let submitter = ScriptedSubmitter::new();
        let mut form = ContactForm::new(3000);
        form.set_draft(ContactMessage::new("Sam", "", "hi"));

        assert!(matches!(
            form.submit(&submitter, 0).await,
            Err(SubmitError::Invalid(_))
        ));
        assert!(submitter.sent().is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let submitter =
            HttpSubmitter::new("http://127.0.0.1:9/contact", Duration::from_millis(500)).unwrap();
        let err = submitter.submit(&filled()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Network(_)));
    }
}
