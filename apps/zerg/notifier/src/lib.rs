//! Notifier gRPC Service
//!
//! Serves `email.v1.EmailService` and `sms.v1.SmsService` on one port.
//!
//! ## Architecture
//!
//! ```text
//! gRPC request (EmailService / SmsService)
//!   ↓
//! EmailServiceImpl / SmsServiceImpl (proto → NotificationRequest)
//!   ↓ (validate → plan → call → shape)
//! NotificationGateway
//!   ↓
//! ProviderAdapter (Resend / Twilio, or Mock in development)
//! ```
//!
//! ## Features
//!
//! - Environment-driven configuration (`GRPC_*`, `APP_*`, provider keys)
//! - Health service (`grpc.health.v1.Health`) for Kubernetes probes
//! - Zstd compression and message size limits
//! - Transport-level request timeout
//! - Graceful shutdown on SIGINT/SIGTERM

mod server;

pub use server::{build_gateway, run, shutdown_signal};
