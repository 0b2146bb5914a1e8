//! Provider adapters
//!
//! A provider turns a resolved [`ProviderCall`](crate::models::ProviderCall)
//! into a delivery and reports the provider's message id.

pub mod mock;
pub mod resend;
pub mod twilio;

pub use mock::MockProvider;
pub use resend::ResendProvider;
pub use twilio::TwilioSmsProvider;

use crate::error::ProviderError;
use crate::models::ProviderCall;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Seam between the gateway and an email/SMS provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Send a fully composed message. Returns the provider message id.
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<String, ProviderError>;

    /// Send a provider-side template. Returns the provider message id.
    async fn send_template(
        &self,
        to: &str,
        template_id: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<String, ProviderError>;

    /// Provider name used in logs
    fn name(&self) -> &'static str;
}

/// Runs `call` against `provider`.
pub async fn execute(
    provider: &dyn ProviderAdapter,
    call: &ProviderCall,
) -> Result<String, ProviderError> {
    match call {
        ProviderCall::Send {
            to,
            subject,
            html_body,
            text_body,
        } => provider.send(to, subject, html_body, text_body).await,
        ProviderCall::SendTemplate {
            to,
            template_id,
            variables,
        } => provider.send_template(to, template_id, variables).await,
    }
}

/// Splits an HTTP error response into a business rejection or an outage.
///
/// 4xx means the provider looked at the message and refused it; 5xx means it
/// could not process it at all.
pub(crate) fn classify_http_failure(status: reqwest::StatusCode, detail: String) -> ProviderError {
    if status.is_server_error() {
        ProviderError::Unavailable(format!("{status}: {detail}"))
    } else {
        ProviderError::Rejected(detail)
    }
}

/// Pulls the human-readable `message` field out of a JSON error body,
/// falling back to the raw body or the status text.
pub(crate) fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .filter(|m| !m.is_empty())
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("provider error")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn test_execute_routes_by_call_kind() {
        let mut provider = MockProviderAdapter::new();
        provider
            .expect_send()
            .withf(|to, subject, _, _| to == "a@b.com" && subject == "Hi")
            .times(1)
            .returning(|_, _, _, _| Ok("raw-1".to_string()));
        provider
            .expect_send_template()
            .withf(|_, template_id, _| template_id == "welcome-email")
            .times(1)
            .returning(|_, _, _| Ok("tpl-1".to_string()));

        let raw = ProviderCall::Send {
            to: "a@b.com".into(),
            subject: "Hi".into(),
            html_body: String::new(),
            text_body: "x".into(),
        };
        let template = ProviderCall::SendTemplate {
            to: "a@b.com".into(),
            template_id: "welcome-email".into(),
            variables: BTreeMap::new(),
        };

        assert_eq!(execute(&provider, &raw).await.unwrap(), "raw-1");
        assert_eq!(execute(&provider, &template).await.unwrap(), "tpl-1");
    }

    #[test]
    fn test_classify_http_failure() {
        assert_eq!(
            classify_http_failure(StatusCode::TOO_MANY_REQUESTS, "quota exceeded".into()),
            ProviderError::Rejected("quota exceeded".into())
        );
        assert!(matches!(
            classify_http_failure(StatusCode::BAD_GATEWAY, "down".into()),
            ProviderError::Unavailable(_)
        ));
    }

    #[test]
    fn test_error_detail() {
        let status = StatusCode::UNPROCESSABLE_ENTITY;
        assert_eq!(
            error_detail(status, r#"{"statusCode":422,"message":"Invalid `to` field"}"#),
            "Invalid `to` field"
        );
        assert_eq!(error_detail(status, "plain text"), "plain text");
        assert_eq!(error_detail(status, ""), "Unprocessable Entity");
    }
}
