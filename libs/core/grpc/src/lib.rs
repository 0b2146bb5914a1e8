//! # gRPC Client/Server Helpers
//!
//! Shared tonic plumbing for the notifier: channel creation with connect and
//! per-request timeouts, server configuration loaded from the environment,
//! health reporting, and request-id propagation.
//!
//! ## Client
//! ```ignore
//! use grpc_client::{create_channel_with_config, ChannelConfig};
//! use protos::email::v1::email_service_client::EmailServiceClient;
//!
//! let channel = create_channel_with_config("http://[::1]:50051", ChannelConfig::default()).await?;
//! let client = EmailServiceClient::with_interceptor(channel, TracingInterceptor::new());
//! ```
//!
//! ## Server
//! ```ignore
//! use grpc_client::server::{GrpcServer, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let (health_reporter, health_service) = grpc_client::server::create_health_service();
//! GrpcServer::setup_health_multiple(&health_reporter, &[EMAIL_SERVICE, SMS_SERVICE]).await;
//! ```

pub mod channel;
pub mod error;
pub mod interceptors;
pub mod server;

pub use channel::{
  ChannelConfig, create_channel, create_channel_lazy, create_channel_lazy_with_config,
  create_channel_with_config,
};
pub use error::{GrpcError, GrpcResult};
pub use interceptors::{REQUEST_ID_HEADER, TracingInterceptor, request_id};
