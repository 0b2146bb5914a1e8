//! Shared configuration primitives for the notifier services.
//!
//! - [`Environment`]: development vs production, selected by `APP_ENV`
//! - [`FromEnv`]: trait for config structs loaded from environment variables
//! - [`env_or_default`], [`env_required`], [`env_parse`]: small env helpers
//! - [`tracing`]: subscriber and color-eyre setup

pub mod tracing;

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Application environment (dev = local/kind, prod = full k8s)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development, // Local dev, mock providers
    Production,  // Real email/SMS providers
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Load an environment variable, falling back to `default` when unset
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Load an environment variable or return [`ConfigError::MissingEnvVar`]
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse an environment variable, using `default` when it is unset.
///
/// A value that is set but does not parse is an error, not a silent default.
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Name and version of the running binary, for startup logs and health output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Build an [`AppInfo`] from the calling crate's Cargo metadata
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
            assert!(!env.is_production());
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        temp_env::with_var("APP_ENV", Some("PRODUCTION"), || {
            assert_eq!(Environment::from_env(), Environment::Production);
        });

        temp_env::with_var("APP_ENV", Some("Production"), || {
            assert!(Environment::from_env().is_production());
        });
    }

    #[test]
    fn test_environment_unknown_defaults_to_development() {
        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
    }

    #[test]
    fn test_env_or_default() {
        temp_env::with_var("NOTIFIER_TEST_VAR", Some("value"), || {
            assert_eq!(env_or_default("NOTIFIER_TEST_VAR", "default"), "value");
        });
        temp_env::with_var_unset("NOTIFIER_TEST_VAR", || {
            assert_eq!(env_or_default("NOTIFIER_TEST_VAR", "default"), "default");
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("NOTIFIER_REQUIRED", || {
            let err = env_required("NOTIFIER_REQUIRED").unwrap_err();
            assert!(err.to_string().contains("NOTIFIER_REQUIRED"));
            assert!(err.to_string().contains("required"));
        });
    }

    #[test]
    fn test_env_parse_uses_default_when_unset() {
        temp_env::with_var_unset("NOTIFIER_TIMEOUT", || {
            let value: u64 = env_parse("NOTIFIER_TIMEOUT", 10).unwrap();
            assert_eq!(value, 10);
        });
    }

    #[test]
    fn test_env_parse_reads_value() {
        temp_env::with_var("NOTIFIER_TIMEOUT", Some(" 25 "), || {
            let value: u64 = env_parse("NOTIFIER_TIMEOUT", 10).unwrap();
            assert_eq!(value, 25);
        });
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        temp_env::with_var("NOTIFIER_TIMEOUT", Some("soon"), || {
            let err = env_parse::<u64>("NOTIFIER_TIMEOUT", 10).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { .. }));
            assert!(err.to_string().contains("NOTIFIER_TIMEOUT"));
        });
    }

    #[test]
    fn test_app_info_macro() {
        let info = app_info!();
        assert_eq!(info.name, "core_config");
        assert!(!info.version.is_empty());
    }
}
