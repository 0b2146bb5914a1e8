use std::time::Duration;
use thiserror::Error;

/// Protocol-level failures of a dispatch.
///
/// Provider business failures never show up here; they are shaped into a
/// `NotificationResult` with `success == false`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("provider call timed out after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn missing(field: &str) -> Self {
        Self::InvalidArgument(format!("{field} is required"))
    }
}

impl From<GatewayError> for tonic::Status {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::InvalidArgument(msg) => tonic::Status::invalid_argument(msg),
            GatewayError::DeadlineExceeded(_) => tonic::Status::deadline_exceeded(err.to_string()),
            GatewayError::Unavailable(msg) => tonic::Status::unavailable(msg),
        }
    }
}

/// Errors raised by a provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider answered and refused the message (quota, bad address, ...).
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached or failed on its side.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by an [`OtpStore`](crate::otp::OtpStore).
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("otp store error: {0}")]
    Store(String),
}

impl From<OtpError> for GatewayError {
    fn from(err: OtpError) -> Self {
        GatewayError::Unavailable(err.to_string())
    }
}
