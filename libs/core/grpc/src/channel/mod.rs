pub mod config;

pub use config::ChannelConfig;

use crate::error::{GrpcError, GrpcResult};
use tonic::transport::{Channel, Endpoint};

/// Creates a gRPC channel with the default timeouts
///
/// ## Example
/// ```ignore
/// use grpc_client::create_channel;
/// use protos::sms::v1::sms_service_client::SmsServiceClient;
///
/// let channel = create_channel("http://[::1]:50051").await?;
/// let client = SmsServiceClient::new(channel);
/// ```
pub async fn create_channel(addr: impl Into<String>) -> GrpcResult<Channel> {
  create_channel_with_config(addr, ChannelConfig::default()).await
}

/// Creates a lazy gRPC channel that connects on first request
pub fn create_channel_lazy(addr: impl Into<String>) -> GrpcResult<Channel> {
  create_channel_lazy_with_config(addr, ChannelConfig::default())
}

/// Creates a lazy gRPC channel with custom configuration
pub fn create_channel_lazy_with_config(
  addr: impl Into<String>,
  config: ChannelConfig,
) -> GrpcResult<Channel> {
  let endpoint = endpoint(addr.into(), config)?;
  Ok(endpoint.connect_lazy())
}

/// Creates a gRPC channel with custom configuration
///
/// Connection establishment is bounded by `config.connect_timeout`; a
/// connect that does not finish in time maps to [`GrpcError::ConnectionTimeout`].
pub async fn create_channel_with_config(
  addr: impl Into<String>,
  config: ChannelConfig,
) -> GrpcResult<Channel> {
  let addr_string = addr.into();
  let connect_timeout = config.connect_timeout;
  let endpoint = endpoint(addr_string.clone(), config)?;

  tracing::debug!(
    target: "grpc_client",
    addr = %addr_string,
    "Creating gRPC channel"
  );

  match tokio::time::timeout(connect_timeout, endpoint.connect()).await {
    Ok(Ok(channel)) => Ok(channel),
    Ok(Err(e)) => {
      tracing::error!(
        target: "grpc_client",
        addr = %addr_string,
        error = ?e,
        "Failed to connect to gRPC service"
      );
      Err(GrpcError::ConnectionFailed(e))
    }
    Err(_) => {
      tracing::error!(
        target: "grpc_client",
        addr = %addr_string,
        timeout = ?connect_timeout,
        "Timed out connecting to gRPC service"
      );
      Err(GrpcError::ConnectionTimeout(connect_timeout))
    }
  }
}

fn endpoint(addr: String, config: ChannelConfig) -> GrpcResult<Endpoint> {
  let endpoint = Endpoint::from_shared(addr.clone()).map_err(|e| {
    tracing::error!(target: "grpc_client", addr = %addr, error = ?e, "Invalid URI");
    GrpcError::InvalidUri(e)
  })?;

  Ok(config.apply_to_endpoint(endpoint))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_invalid_uri() {
    let result = create_channel("not a valid uri").await;
    assert!(matches!(result.unwrap_err(), GrpcError::InvalidUri(_)));
  }

  #[tokio::test]
  async fn test_lazy_channel_does_not_connect() {
    // Nothing listens here; a lazy channel must still be created.
    let result = create_channel_lazy("http://127.0.0.1:1");
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn test_connection_failed() {
    let result = create_channel("http://127.0.0.1:1").await;
    assert!(result.is_err());
  }
}
