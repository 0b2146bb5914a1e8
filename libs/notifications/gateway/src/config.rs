//! Immutable gateway configuration.

use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::time::Duration;

const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 8;

/// Provider template ids used by the fixed-template operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIds {
    pub verification: String,
    pub password_reset: String,
    pub welcome: String,
    pub transaction_notification: String,
    pub otp: String,
    pub transaction_alert: String,
}

impl Default for TemplateIds {
    fn default() -> Self {
        Self {
            verification: "verification-email".to_string(),
            password_reset: "password-reset".to_string(),
            welcome: "welcome-email".to_string(),
            transaction_notification: "transaction-notification".to_string(),
            otp: "otp-sms".to_string(),
            transaction_alert: "transaction-alert".to_string(),
        }
    }
}

/// Constants merged into every templated notification, plus the dispatch
/// timeout. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Product name exposed to templates as `app_name`
    pub app_name: String,
    /// Host used to build default verification and reset links
    pub app_domain: String,
    pub support_email: String,
    pub dashboard_url: String,
    pub default_reset_expiry_minutes: u32,
    pub default_otp_expiry_minutes: u32,
    /// Jurisdiction passed to SMS templates when the request leaves it empty
    pub default_jurisdiction: String,
    /// Upper bound on a single provider call. Kept below the client and
    /// server RPC timeouts so a slow provider surfaces as `DeadlineExceeded`.
    pub provider_timeout: Duration,
    pub templates: TemplateIds,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            app_name: "Cloud9".to_string(),
            app_domain: "app.cloud9.money".to_string(),
            support_email: "support@cloud9.money".to_string(),
            dashboard_url: "https://app.cloud9.money/dashboard".to_string(),
            default_reset_expiry_minutes: 30,
            default_otp_expiry_minutes: 10,
            default_jurisdiction: "KE".to_string(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            templates: TemplateIds::default(),
        }
    }
}

impl FromEnv for GatewayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            app_name: env_or_default("APP_NAME", &defaults.app_name),
            app_domain: env_or_default("APP_DOMAIN", &defaults.app_domain),
            support_email: env_or_default("SUPPORT_EMAIL", &defaults.support_email),
            dashboard_url: env_or_default("DASHBOARD_URL", &defaults.dashboard_url),
            default_reset_expiry_minutes: env_parse(
                "DEFAULT_RESET_EXPIRY_MINUTES",
                defaults.default_reset_expiry_minutes,
            )?,
            default_otp_expiry_minutes: env_parse(
                "DEFAULT_OTP_EXPIRY_MINUTES",
                defaults.default_otp_expiry_minutes,
            )?,
            default_jurisdiction: env_or_default(
                "DEFAULT_JURISDICTION",
                &defaults.default_jurisdiction,
            ),
            provider_timeout: Duration::from_secs(env_parse("PROVIDER_TIMEOUT_SECS", DEFAULT_PROVIDER_TIMEOUT_SECS)?),
            templates: TemplateIds::default(),
        })
    }
}

impl GatewayConfig {
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_app_domain(mut self, domain: impl Into<String>) -> Self {
        self.app_domain = domain.into();
        self
    }

    /// `https://<app_domain>/verify?token=<token>`, token inserted as given.
    pub fn verification_url(&self, token: &str) -> String {
        format!("https://{}/verify?token={}", self.app_domain, token)
    }

    /// `https://<app_domain>/reset-password?token=<token>`
    pub fn reset_url(&self, token: &str) -> String {
        format!("https://{}/reset-password?token={}", self.app_domain, token)
    }
}
