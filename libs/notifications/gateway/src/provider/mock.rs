//! In-process provider for development and tests

use super::ProviderAdapter;
use crate::error::ProviderError;
use crate::models::ProviderCall;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

type Responder = dyn Fn(&ProviderCall) -> Result<String, ProviderError> + Send + Sync;

/// Provider that records every call and answers from a configurable rule.
#[derive(Clone)]
pub struct MockProvider {
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    responder: Arc<Responder>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Accept everything, answering with `mock-<uuid>` ids.
    pub fn new() -> Self {
        Self::with_responder(|_| Ok(format!("mock-{}", uuid::Uuid::new_v4())))
    }

    /// Accept everything with a fixed message id.
    pub fn returning_id(message_id: impl Into<String>) -> Self {
        let message_id = message_id.into();
        Self::with_responder(move |_| Ok(message_id.clone()))
    }

    /// Reject every call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::with_responder(move |_| Err(ProviderError::Rejected(message.clone())))
    }

    /// Behave as if the provider cannot be reached.
    pub fn unavailable(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::with_responder(move |_| Err(ProviderError::Unavailable(message.clone())))
    }

    /// Decide each outcome from the call itself.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&ProviderCall) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responder: Arc::new(responder),
            delay: None,
        }
    }

    /// Wait before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub async fn was_sent_to(&self, recipient: &str) -> bool {
        self.calls
            .lock()
            .await
            .iter()
            .any(|c| c.recipient() == recipient)
    }

    async fn record(&self, call: ProviderCall) -> Result<String, ProviderError> {
        self.calls.lock().await.push(call.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(&call)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<String, ProviderError> {
        self.record(ProviderCall::Send {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            text_body: text_body.to_string(),
        })
        .await
    }

    async fn send_template(
        &self,
        to: &str,
        template_id: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<String, ProviderError> {
        self.record(ProviderCall::SendTemplate {
            to: to.to_string(),
            template_id: template_id.to_string(),
            variables: variables.clone(),
        })
        .await
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
