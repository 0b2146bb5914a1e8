//! gRPC server startup helpers.

use super::config::ServerConfig;
use tracing::info;

/// Helper for creating gRPC servers with health checks.
///
/// # Example
///
/// ```ignore
/// use grpc_client::server::{GrpcServer, ServerConfig, create_health_service};
///
/// let config = ServerConfig::from_env()?;
/// let (health_reporter, health_service) = create_health_service();
/// GrpcServer::setup_health_multiple(&health_reporter, &[EMAIL_SERVICE, SMS_SERVICE]).await;
/// GrpcServer::log_startup_multiple(&config, &[EMAIL_SERVICE, SMS_SERVICE]);
/// ```
pub struct GrpcServer;

impl GrpcServer {
  /// Log server startup information for a single service.
  pub fn log_startup(config: &ServerConfig, service_name: &str) {
    Self::log_startup_multiple(config, &[service_name]);
  }

  /// Log server startup information for multiple services.
  pub fn log_startup_multiple(config: &ServerConfig, service_names: &[&str]) {
    info!(
      addr = %config.addr_string(),
      services = ?service_names,
      compression = config.enable_compression,
      request_timeout = ?config.request_timeout,
      "gRPC server starting"
    );
  }

  /// Mark every service and the empty service name as serving.
  ///
  /// The empty name is what Kubernetes gRPC probes ask for by default.
  pub async fn setup_health_multiple(
    health_reporter: &tonic_health::server::HealthReporter,
    service_names: &[&str],
  ) {
    for service_name in service_names {
      health_reporter
        .set_service_status(*service_name, tonic_health::ServingStatus::Serving)
        .await;
    }

    health_reporter
      .set_service_status("", tonic_health::ServingStatus::Serving)
      .await;

    info!(services = ?service_names, "Services marked as serving");
  }

  /// Mark every service and the empty service name as not serving.
  ///
  /// Called at the start of graceful shutdown so load balancers drain first.
  pub async fn mark_not_serving(
    health_reporter: &tonic_health::server::HealthReporter,
    service_names: &[&str],
  ) {
    for service_name in service_names {
      health_reporter
        .set_service_status(*service_name, tonic_health::ServingStatus::NotServing)
        .await;
    }

    health_reporter
      .set_service_status("", tonic_health::ServingStatus::NotServing)
      .await;
  }
}

pub use tonic_health::server::health_reporter as create_health_service;
