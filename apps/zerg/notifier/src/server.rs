//! gRPC server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Tracing initialization
//! - Provider selection
//! - Service creation
//! - gRPC server configuration and startup
//! - Health check service (grpc.health.v1.Health)

use std::sync::Arc;

use core_config::{Environment, FromEnv, app_info};
use eyre::{Result, WrapErr};
use grpc_client::server::{GrpcServer, ServerConfig, create_health_service};
use notification_gateway::{
    EMAIL_SERVICE, EmailServiceImpl, GatewayConfig, InMemoryOtpStore, MockProvider,
    NotificationGateway, ProviderAdapter, ResendProvider, SMS_SERVICE, SmsServiceImpl,
    TwilioSmsProvider,
};
use protos::email::v1::email_service_server::EmailServiceServer;
use protos::sms::v1::sms_service_server::SmsServiceServer;
use tokio::signal;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tracing::{info, warn};

/// Build the gateway with providers chosen by environment.
///
/// Production talks to Resend and Twilio and fails fast when their
/// credentials are missing. Development uses the in-process mock provider.
pub fn build_gateway(environment: Environment, config: GatewayConfig) -> Result<NotificationGateway> {
    let (email, sms): (Arc<dyn ProviderAdapter>, Arc<dyn ProviderAdapter>) =
        if environment.is_production() {
            let email = ResendProvider::from_env().wrap_err("Failed to configure Resend")?;
            let sms = TwilioSmsProvider::from_env(&config.templates)
                .wrap_err("Failed to configure Twilio")?;
            (Arc::new(email), Arc::new(sms))
        } else {
            warn!("Development environment: notifications are not delivered (mock provider)");
            (Arc::new(MockProvider::new()), Arc::new(MockProvider::new()))
        };

    info!(
        email_provider = email.name(),
        sms_provider = sms.name(),
        "Providers configured"
    );

    Ok(NotificationGateway::new(
        email,
        sms,
        Arc::new(InMemoryOtpStore::new()),
        config,
    ))
}

/// Run the gRPC server
///
/// This is the main entry point for server initialization. It:
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Loads server and gateway configuration from the environment
/// 3. Selects providers and builds the gateway
/// 4. Starts the gRPC server with health checks, compression and limits
/// 5. Drains on SIGINT/SIGTERM after marking services not serving
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Provider credentials are missing in production
/// - Server binding fails
/// - Server runtime encounters an error
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let app_info = app_info!();
    info!(name = %app_info.name, version = %app_info.version, environment = ?environment, "Starting notifier");

    let server_config = ServerConfig::from_env().wrap_err("Failed to load server configuration")?;
    let gateway_config = GatewayConfig::from_env().wrap_err("Failed to load gateway configuration")?;
    let gateway = Arc::new(build_gateway(environment, gateway_config)?);

    let addr = server_config
        .socket_addr()
        .wrap_err_with(|| format!("Failed to parse server address: {}", server_config.addr_string()))?;

    let mut email_service = EmailServiceServer::new(EmailServiceImpl::new(gateway.clone()))
        .max_decoding_message_size(server_config.max_decoding_message_size)
        .max_encoding_message_size(server_config.max_encoding_message_size);
    let mut sms_service = SmsServiceServer::new(SmsServiceImpl::new(gateway))
        .max_decoding_message_size(server_config.max_decoding_message_size)
        .max_encoding_message_size(server_config.max_encoding_message_size);

    if server_config.enable_compression {
        // zstd: 3-5x faster than gzip at a better ratio
        email_service = email_service
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);
        sms_service = sms_service
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);
    }

    let services = [EMAIL_SERVICE, SMS_SERVICE];
    let (health_reporter, health_service) = create_health_service();
    GrpcServer::setup_health_multiple(&health_reporter, &services).await;
    GrpcServer::log_startup_multiple(&server_config, &services);

    let shutdown = async move {
        if let Err(e) = shutdown_signal().await {
            warn!(error = %e, "Error waiting for shutdown signal");
        }
        GrpcServer::mark_not_serving(&health_reporter, &services).await;
    };

    Server::builder()
        .timeout(server_config.request_timeout)
        .add_service(health_service)
        .add_service(email_service)
        .add_service(sms_service)
        .serve_with_shutdown(addr, shutdown)
        .await
        .wrap_err("gRPC server failed")?;

    info!("Notifier stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.wrap_err("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .wrap_err("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), eyre::Report>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            info!("Received Ctrl+C, initiating shutdown...");
        },
        result = terminate => {
            result?;
            info!("Received SIGTERM, initiating shutdown...");
        },
    }

    Ok(())
}
