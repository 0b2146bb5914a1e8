//! Twilio SMS provider
//!
//! Twilio has no server-side templates for SMS, so template ids are rendered
//! locally with Handlebars before the message is posted.

use super::{ProviderAdapter, classify_http_failure, error_detail};
use crate::config::TemplateIds;
use crate::error::ProviderError;
use async_trait::async_trait;
use core_config::{ConfigError, env_required};
use handlebars::Handlebars;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, error};

const TWILIO_API_URL: &str = "https://api.twilio.com/2010-04-01";

const OTP_TEMPLATE: &str = "Your {{app_name}} code is {{code}}. It expires in {{expiry_minutes}} minutes. Do not share it with anyone.";

const TRANSACTION_ALERT_TEMPLATE: &str = "{{app_name}}: {{transaction_type}} of {{currency}} {{amount}} (ref {{transaction_id}}). New balance: {{currency}} {{balance}}.";

pub struct TwilioSmsProvider {
    account_sid: String,
    auth_token: String,
    from_number: String,
    base_url: String,
    client: Client,
    templates: Handlebars<'static>,
}

impl TwilioSmsProvider {
    /// Create a provider with the built-in SMS templates registered under `ids`.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
        ids: &TemplateIds,
    ) -> Result<Self, ProviderError> {
        let mut templates = Handlebars::new();
        templates.register_escape_fn(handlebars::no_escape);
        for (id, source) in [
            (&ids.otp, OTP_TEMPLATE),
            (&ids.transaction_alert, TRANSACTION_ALERT_TEMPLATE),
        ] {
            templates
                .register_template_string(id, source)
                .map_err(|e| ProviderError::Unavailable(format!("invalid SMS template {id}: {e}")))?;
        }

        Ok(Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            base_url: TWILIO_API_URL.to_string(),
            client: Client::new(),
            templates,
        })
    }

    /// Create from environment variables
    ///
    /// Expects:
    /// - `TWILIO_ACCOUNT_SID`
    /// - `TWILIO_AUTH_TOKEN`
    /// - `TWILIO_FROM_NUMBER`
    pub fn from_env(ids: &TemplateIds) -> Result<Self, ConfigError> {
        let account_sid = env_required("TWILIO_ACCOUNT_SID")?;
        let auth_token = env_required("TWILIO_AUTH_TOKEN")?;
        let from_number = env_required("TWILIO_FROM_NUMBER")?;
        Self::new(account_sid, auth_token, from_number, ids).map_err(|e| ConfigError::ParseError {
            key: "sms templates".to_string(),
            details: e.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Register or replace the body used for `template_id`.
    pub fn register_template(&mut self, template_id: &str, source: &str) -> Result<(), ProviderError> {
        self.templates
            .register_template_string(template_id, source)
            .map_err(|e| ProviderError::Rejected(format!("invalid SMS template {template_id}: {e}")))
    }

    pub fn render(
        &self,
        template_id: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<String, ProviderError> {
        if !self.templates.has_template(template_id) {
            return Err(ProviderError::Rejected(format!(
                "unknown SMS template: {template_id}"
            )));
        }
        self.templates
            .render(template_id, variables)
            .map_err(|e| ProviderError::Rejected(format!("failed to render {template_id}: {e}")))
    }

    async fn post(&self, to: &str, body: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );

        let response = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("Twilio request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            let sent: TwilioMessage = response.json().await.map_err(|e| {
                ProviderError::Unavailable(format!("invalid Twilio response: {e}"))
            })?;
            debug!(message_id = %sent.sid, "SMS accepted by Twilio");
            return Ok(sent.sid);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(status, &body);
        error!(status = %status, error = %detail, "Twilio API error");
        Err(classify_http_failure(status, detail))
    }
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[async_trait]
impl ProviderAdapter for TwilioSmsProvider {
    /// SMS has no subject or HTML part; the text body is sent as is.
    async fn send(
        &self,
        to: &str,
        _subject: &str,
        _html_body: &str,
        text_body: &str,
    ) -> Result<String, ProviderError> {
        debug!(to = %to, "Sending SMS via Twilio");
        self.post(to, text_body).await
    }

    async fn send_template(
        &self,
        to: &str,
        template_id: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<String, ProviderError> {
        let body = self.render(template_id, variables)?;
        debug!(to = %to, template_id = %template_id, "Sending templated SMS via Twilio");
        self.post(to, &body).await
    }

    fn name(&self) -> &'static str {
        "twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> TwilioSmsProvider {
        TwilioSmsProvider::new("AC123", "token", "+15550000000", &TemplateIds::default()).unwrap()
    }

    #[test]
    fn test_renders_otp_without_escaping() {
        let mut vars = BTreeMap::new();
        vars.insert("app_name".to_string(), "Cloud9 & Co".to_string());
        vars.insert("code".to_string(), "123456".to_string());
        vars.insert("expiry_minutes".to_string(), "10".to_string());

        let body = provider().render("otp-sms", &vars).unwrap();
        assert_eq!(
            body,
            "Your Cloud9 & Co code is 123456. It expires in 10 minutes. Do not share it with anyone."
        );
    }

    #[test]
    fn test_renders_transaction_alert() {
        let vars: BTreeMap<String, String> = [
            ("app_name", "Cloud9"),
            ("transaction_type", "debit"),
            ("currency", "KES"),
            ("amount", "250.00"),
            ("transaction_id", "tx-1"),
            ("balance", "1000.00"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let body = provider().render("transaction-alert", &vars).unwrap();
        assert_eq!(
            body,
            "Cloud9: debit of KES 250.00 (ref tx-1). New balance: KES 1000.00."
        );
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        let err = provider().render("nope", &BTreeMap::new()).unwrap_err();
        assert_eq!(err, ProviderError::Rejected("unknown SMS template: nope".into()));
    }

    #[test]
    fn test_custom_template() {
        let mut provider = provider();
        provider.register_template("promo", "Hi {{name}}").unwrap();
        let mut vars = BTreeMap::new();
        vars.insert("name".to_string(), "Ann".to_string());
        assert_eq!(provider.render("promo", &vars).unwrap(), "Hi Ann");
    }

    #[tokio::test]
    async fn test_template_failure_makes_no_request() {
        // Unroutable base URL: a request would surface as Unavailable.
        let provider = provider().with_base_url("http://127.0.0.1:1");
        let err = provider
            .send_template("+15551234567", "missing", &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rejected(_)));
    }
}
