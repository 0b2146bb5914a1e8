//! Request interceptors shared by the notifier client and server.

pub use tonic::service::Interceptor;

pub mod tracing;

pub use tracing::{REQUEST_ID_HEADER, TracingInterceptor, request_id};
