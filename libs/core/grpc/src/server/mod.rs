//! gRPC server helpers: environment-driven [`ServerConfig`] and
//! [`GrpcServer`] health/startup utilities.

mod builder;
mod config;

pub use builder::{GrpcServer, create_health_service};
pub use config::ServerConfig;
