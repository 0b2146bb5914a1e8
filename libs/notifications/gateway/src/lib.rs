//! Notification gateway: one validate → plan → provider → shape routine for
//! every email and SMS operation, exposed over gRPC.
//!
//! ## Components
//!
//! - **Models**: `NotificationRequest`, `Payload`, `NotificationResult`
//! - **Dispatch**: `NotificationGateway` plus bulk SMS and OTP send/verify
//! - **Providers**: `ProviderAdapter` with Resend, Twilio and an in-process mock
//! - **OTP records**: `OtpStore` and `InMemoryOtpStore`
//! - **gRPC**: `EmailServiceImpl`, `SmsServiceImpl`
//!
//! ```ignore
//! use notification_gateway::{GatewayConfig, InMemoryOtpStore, MockProvider, NotificationGateway};
//!
//! let gateway = NotificationGateway::new(
//!     Arc::new(MockProvider::new()),
//!     Arc::new(MockProvider::new()),
//!     Arc::new(InMemoryOtpStore::new()),
//!     GatewayConfig::from_env()?,
//! );
//! let result = gateway.dispatch(&request).await?;
//! ```

pub mod config;
pub mod conversions;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod operations;
pub mod otp;
pub mod provider;
pub mod validation;

pub use config::{GatewayConfig, TemplateIds};
pub use error::{GatewayError, GatewayResult, OtpError, ProviderError};
pub use gateway::NotificationGateway;
pub use handlers::{EmailServiceImpl, SmsServiceImpl};
pub use models::{
    BulkDispatch, Channel, DeliveryStatus, NotificationRequest, NotificationResult,
    OperationKind, OtpDispatch, OtpPurpose, OtpRejection, OtpVerification, Payload,
    ProviderCall, TransactionDetails,
};
pub use otp::{InMemoryOtpStore, OtpRecord, OtpStore};
pub use provider::{MockProvider, ProviderAdapter, ResendProvider, TwilioSmsProvider};

/// Fully qualified gRPC service names, as registered with the health service.
pub const EMAIL_SERVICE: &str = protos::email::v1::email_service_server::SERVICE_NAME;
pub const SMS_SERVICE: &str = protos::sms::v1::sms_service_server::SERVICE_NAME;
