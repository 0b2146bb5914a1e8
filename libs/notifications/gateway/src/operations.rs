//! Maps a validated request to the provider call it performs.
//!
//! Every operation kind resolves here to either a raw `send` or a
//! `send_template` with a fully populated variable map, so dispatch itself
//! stays kind-agnostic.

use std::collections::BTreeMap;

use crate::config::GatewayConfig;
use crate::models::{NotificationRequest, Payload, ProviderCall, TransactionDetails};

struct Variables(BTreeMap<String, String>);

impl Variables {
    fn new() -> Self {
        Self(BTreeMap::new())
    }

    fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    fn brand(self, config: &GatewayConfig) -> Self {
        self.set("app_name", &config.app_name)
            .set("support_email", &config.support_email)
    }

    fn transaction(self, details: &TransactionDetails) -> Self {
        self.set("transaction_id", &details.transaction_id)
            .set("transaction_type", &details.transaction_type)
            .set("amount", format_amount(details.amount))
            .set("currency", &details.currency)
            .set("balance", format_amount(details.balance))
    }
}

fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// OTP lifetime in minutes, falling back to the configured default.
pub fn otp_expiry_minutes(expiry_minutes: Option<u32>, config: &GatewayConfig) -> u32 {
    expiry_minutes
        .filter(|m| *m > 0)
        .unwrap_or(config.default_otp_expiry_minutes)
}

fn jurisdiction<'a>(value: Option<&'a String>, config: &'a GatewayConfig) -> &'a str {
    non_empty(value).unwrap_or(&config.default_jurisdiction)
}

/// Resolves `request` into a provider call. Assumes `validate` passed.
pub fn plan(request: &NotificationRequest, config: &GatewayConfig) -> ProviderCall {
    let to = request.recipient.clone();
    let templates = &config.templates;

    let (template_id, variables) = match &request.payload {
        Payload::Message {
            subject,
            html_body,
            text_body,
        } => {
            return ProviderCall::Send {
                to,
                subject: subject.clone(),
                html_body: html_body.clone(),
                text_body: text_body.clone(),
            };
        }
        Payload::Template {
            template_id,
            variables,
        } => {
            let mut merged = variables.clone();
            // Caller-supplied values win over configured constants.
            for (key, value) in Variables::new().brand(config).0 {
                merged.entry(key).or_insert(value);
            }
            (template_id.clone(), merged)
        }
        Payload::Verification {
            token,
            user_name,
            verification_url,
        } => {
            let url = non_empty(verification_url.as_ref())
                .map(str::to_owned)
                .unwrap_or_else(|| config.verification_url(token));
            let vars = Variables::new()
                .set("user_name", user_name)
                .set("verification_url", url)
                .set("verification_token", token)
                .brand(config);
            (templates.verification.clone(), vars.0)
        }
        Payload::PasswordReset {
            token,
            user_name,
            reset_url,
            expiry_minutes,
        } => {
            let url = non_empty(reset_url.as_ref())
                .map(str::to_owned)
                .unwrap_or_else(|| config.reset_url(token));
            let expiry = expiry_minutes
                .filter(|m| *m > 0)
                .unwrap_or(config.default_reset_expiry_minutes);
            let vars = Variables::new()
                .set("user_name", user_name)
                .set("reset_url", url)
                .set("reset_token", token)
                .set("expiry_minutes", expiry.to_string())
                .brand(config);
            (templates.password_reset.clone(), vars.0)
        }
        Payload::Welcome {
            user_name,
            account_type,
        } => {
            let vars = Variables::new()
                .set("user_name", user_name)
                .set("account_type", account_type)
                .set("dashboard_url", &config.dashboard_url)
                .brand(config);
            (templates.welcome.clone(), vars.0)
        }
        Payload::TransactionNotification(details) => {
            let vars = Variables::new()
                .transaction(details)
                .set("recipient_name", &details.recipient_name)
                .set("timestamp", &details.timestamp)
                .brand(config);
            (templates.transaction_notification.clone(), vars.0)
        }
        Payload::Otp {
            code,
            expiry_minutes,
            purpose,
            jurisdiction: region,
            ..
        } => {
            let vars = Variables::new()
                .set("code", code)
                .set(
                    "expiry_minutes",
                    otp_expiry_minutes(*expiry_minutes, config).to_string(),
                )
                .set("purpose", purpose.to_string())
                .set("jurisdiction", jurisdiction(region.as_ref(), config))
                .brand(config);
            (templates.otp.clone(), vars.0)
        }
        Payload::TransactionAlert {
            details,
            jurisdiction: region,
        } => {
            let vars = Variables::new()
                .transaction(details)
                .set("jurisdiction", jurisdiction(region.as_ref(), config))
                .brand(config);
            (templates.transaction_alert.clone(), vars.0)
        }
    };

    ProviderCall::SendTemplate {
        to,
        template_id,
        variables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OtpPurpose;

    fn template_call(call: ProviderCall) -> (String, BTreeMap<String, String>) {
        match call {
            ProviderCall::SendTemplate {
                template_id,
                variables,
                ..
            } => (template_id, variables),
            other => panic!("expected a template call, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_message_uses_send() {
        let request = NotificationRequest::email(
            "a@b.com",
            Payload::Message {
                subject: "Hi".into(),
                html_body: "<p>x</p>".into(),
                text_body: String::new(),
            },
        );
        assert_eq!(
            plan(&request, &GatewayConfig::default()),
            ProviderCall::Send {
                to: "a@b.com".into(),
                subject: "Hi".into(),
                html_body: "<p>x</p>".into(),
                text_body: String::new(),
            }
        );
    }

    #[test]
    fn test_verification_defaults_url() {
        let request = NotificationRequest::email(
            "user@example.com",
            Payload::Verification {
                token: "abc123".into(),
                user_name: "John Doe".into(),
                verification_url: None,
            },
        );
        let (template_id, vars) = template_call(plan(&request, &GatewayConfig::default()));
        assert_eq!(template_id, "verification-email");
        assert_eq!(
            vars["verification_url"],
            "https://app.cloud9.money/verify?token=abc123"
        );
        assert_eq!(vars["verification_token"], "abc123");
        assert_eq!(vars["user_name"], "John Doe");
        assert_eq!(vars["app_name"], "Cloud9");
        assert_eq!(vars["support_email"], "support@cloud9.money");
    }

    #[test]
    fn test_verification_keeps_supplied_url() {
        let request = NotificationRequest::email(
            "user@example.com",
            Payload::Verification {
                token: "abc123".into(),
                user_name: String::new(),
                verification_url: Some("https://x.test/v".into()),
            },
        );
        let (_, vars) = template_call(plan(&request, &GatewayConfig::default()));
        assert_eq!(vars["verification_url"], "https://x.test/v");
    }

    #[test]
    fn test_password_reset_defaults() {
        let request = NotificationRequest::email(
            "user@example.com",
            Payload::PasswordReset {
                token: "r-1".into(),
                user_name: String::new(),
                reset_url: Some(String::new()),
                expiry_minutes: Some(0),
            },
        );
        let (template_id, vars) = template_call(plan(&request, &GatewayConfig::default()));
        assert_eq!(template_id, "password-reset");
        assert_eq!(
            vars["reset_url"],
            "https://app.cloud9.money/reset-password?token=r-1"
        );
        assert_eq!(vars["expiry_minutes"], "30");
    }

    #[test]
    fn test_transaction_amounts_have_two_decimals() {
        let request = NotificationRequest::email(
            "user@example.com",
            Payload::TransactionNotification(TransactionDetails {
                transaction_id: "tx-9".into(),
                transaction_type: "transfer".into(),
                amount: 1500.5,
                currency: "KES".into(),
                balance: 20.0,
                recipient_name: "Jane".into(),
                timestamp: "2024-05-01T10:00:00Z".into(),
            }),
        );
        let (template_id, vars) = template_call(plan(&request, &GatewayConfig::default()));
        assert_eq!(template_id, "transaction-notification");
        assert_eq!(vars["amount"], "1500.50");
        assert_eq!(vars["balance"], "20.00");
        assert_eq!(vars["recipient_name"], "Jane");
    }

    #[test]
    fn test_template_variables_win_over_constants() {
        let mut variables = BTreeMap::new();
        variables.insert("app_name".to_string(), "Custom".to_string());
        variables.insert("first_name".to_string(), "Ann".to_string());
        let request = NotificationRequest::email(
            "a@b.com",
            Payload::Template {
                template_id: "welcome-email".into(),
                variables,
            },
        );
        let (template_id, vars) = template_call(plan(&request, &GatewayConfig::default()));
        assert_eq!(template_id, "welcome-email");
        assert_eq!(vars["app_name"], "Custom");
        assert_eq!(vars["first_name"], "Ann");
        assert_eq!(vars["support_email"], "support@cloud9.money");
    }

    #[test]
    fn test_otp_defaults() {
        let request = NotificationRequest::sms(
            "+254700000001",
            Payload::Otp {
                code: "123456".into(),
                expiry_minutes: None,
                purpose: OtpPurpose::General,
                reference_id: None,
                jurisdiction: Some(" ".into()),
            },
        );
        let (template_id, vars) = template_call(plan(&request, &GatewayConfig::default()));
        assert_eq!(template_id, "otp-sms");
        assert_eq!(vars["expiry_minutes"], "10");
        assert_eq!(vars["purpose"], "general");
        assert_eq!(vars["jurisdiction"], "KE");
    }

    #[test]
    fn test_transaction_alert_keeps_jurisdiction() {
        let request = NotificationRequest::sms(
            "+254700000001",
            Payload::TransactionAlert {
                details: TransactionDetails {
                    transaction_id: "tx-1".into(),
                    amount: 3.0,
                    ..Default::default()
                },
                jurisdiction: Some("UG".into()),
            },
        );
        let (template_id, vars) = template_call(plan(&request, &GatewayConfig::default()));
        assert_eq!(template_id, "transaction-alert");
        assert_eq!(vars["jurisdiction"], "UG");
        assert_eq!(vars["amount"], "3.00");
    }
}
