//! Resend email provider
//!
//! Sends raw and template emails through the Resend HTTP API.

use super::{ProviderAdapter, classify_http_failure, error_detail};
use crate::error::ProviderError;
use async_trait::async_trait;
use core_config::{ConfigError, env_or_default, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error};

const RESEND_API_URL: &str = "https://api.resend.com";

pub struct ResendProvider {
    api_key: String,
    from: String,
    base_url: String,
    client: Client,
}

impl ResendProvider {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            from: from.into(),
            base_url: RESEND_API_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Create from environment variables
    ///
    /// Expects:
    /// - `RESEND_API_KEY`
    /// - `EMAIL_FROM_ADDRESS` (default: `Cloud9 <noreply@cloud9.money>`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_required("RESEND_API_KEY")?;
        let from = env_or_default("EMAIL_FROM_ADDRESS", "Cloud9 <noreply@cloud9.money>");
        Ok(Self::new(api_key, from))
    }

    /// Point the provider at another API host (used against local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post(&self, body: &ResendEmail<'_>) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("Resend request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            let sent: ResendResponse = response.json().await.map_err(|e| {
                ProviderError::Unavailable(format!("invalid Resend response: {e}"))
            })?;
            debug!(message_id = %sent.id, "Email accepted by Resend");
            return Ok(sent.id);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(status, &body);
        error!(status = %status, error = %detail, "Resend API error");
        Err(classify_http_failure(status, detail))
    }
}

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<ResendTemplate<'a>>,
}

#[derive(Debug, Serialize)]
struct ResendTemplate<'a> {
    id: &'a str,
    variables: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

#[async_trait]
impl ProviderAdapter for ResendProvider {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<String, ProviderError> {
        debug!(to = %to, subject = %subject, "Sending email via Resend");
        self.post(&ResendEmail {
            from: &self.from,
            to: [to],
            subject: Some(subject),
            html: non_empty(html_body),
            text: non_empty(text_body),
            template: None,
        })
        .await
    }

    async fn send_template(
        &self,
        to: &str,
        template_id: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<String, ProviderError> {
        debug!(to = %to, template_id = %template_id, "Sending template email via Resend");
        self.post(&ResendEmail {
            from: &self.from,
            to: [to],
            subject: None,
            html: None,
            text: None,
            template: Some(ResendTemplate {
                id: template_id,
                variables,
            }),
        })
        .await
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}
