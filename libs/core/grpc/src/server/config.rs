//! Server configuration loaded from environment variables.

use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for a gRPC server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
  /// Host to bind to (default: [::1] for IPv6 localhost)
  pub host: String,
  /// Port to listen on (default: 50051)
  pub port: u16,
  /// Enable Zstd compression (default: true)
  pub enable_compression: bool,
  /// Maximum message size for decoding (default: 10MB)
  pub max_decoding_message_size: usize,
  /// Maximum message size for encoding (default: 10MB)
  pub max_encoding_message_size: usize,
  /// Upper bound on a single RPC, enforced by the transport (default: 15s)
  pub request_timeout: Duration,
}

const DEFAULT_MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: "[::1]".to_string(),
      port: 50051,
      enable_compression: true,
      max_decoding_message_size: DEFAULT_MAX_MESSAGE_SIZE,
      max_encoding_message_size: DEFAULT_MAX_MESSAGE_SIZE,
      request_timeout: Duration::from_secs(15),
    }
  }
}

impl FromEnv for ServerConfig {
  /// Reads:
  /// - `GRPC_HOST` (default: [::1])
  /// - `GRPC_PORT` (default: 50051)
  /// - `GRPC_COMPRESSION` (default: true)
  /// - `GRPC_MAX_MESSAGE_SIZE` (default: 10485760 / 10MB)
  /// - `GRPC_REQUEST_TIMEOUT_SECS` (default: 15)
  fn from_env() -> Result<Self, ConfigError> {
    let host = env_or_default("GRPC_HOST", "[::1]");
    let port = env_parse("GRPC_PORT", 50051u16)?;
    let enable_compression = std::env::var("GRPC_COMPRESSION")
      .map(|v| v != "false" && v != "0")
      .unwrap_or(true);
    let max_message_size = env_parse("GRPC_MAX_MESSAGE_SIZE", DEFAULT_MAX_MESSAGE_SIZE)?;
    let request_timeout_secs = env_parse("GRPC_REQUEST_TIMEOUT_SECS", 15u64)?;

    Ok(Self {
      host,
      port,
      enable_compression,
      max_decoding_message_size: max_message_size,
      max_encoding_message_size: max_message_size,
      request_timeout: Duration::from_secs(request_timeout_secs),
    })
  }
}

impl ServerConfig {
  /// Create a new server config with defaults.
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the host to bind to.
  pub fn with_host(mut self, host: impl Into<String>) -> Self {
    self.host = host.into();
    self
  }

  /// Set the port to listen on.
  pub fn with_port(mut self, port: u16) -> Self {
    self.port = port;
    self
  }

  /// Enable or disable compression.
  pub fn with_compression(mut self, enable: bool) -> Self {
    self.enable_compression = enable;
    self
  }

  /// Set the transport-level request timeout.
  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.request_timeout = timeout;
    self
  }

  /// Get the socket address to bind to.
  pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
    self.addr_string().parse()
  }

  /// Get the address string (for logging).
  pub fn addr_string(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = ServerConfig::default();
    assert_eq!(config.host, "[::1]");
    assert_eq!(config.port, 50051);
    assert!(config.enable_compression);
    assert_eq!(config.request_timeout, Duration::from_secs(15));
    assert!(config.socket_addr().is_ok());
  }

  #[test]
  fn test_builder_pattern() {
    let config = ServerConfig::new()
      .with_host("0.0.0.0")
      .with_port(9090)
      .with_compression(false)
      .with_request_timeout(Duration::from_secs(3));

    assert_eq!(config.addr_string(), "0.0.0.0:9090");
    assert!(!config.enable_compression);
    assert_eq!(config.request_timeout, Duration::from_secs(3));
  }

  #[test]
  fn test_from_env() {
    temp_env::with_vars(
      [
        ("GRPC_HOST", Some("0.0.0.0")),
        ("GRPC_PORT", Some("50052")),
        ("GRPC_COMPRESSION", Some("false")),
        ("GRPC_MAX_MESSAGE_SIZE", None),
        ("GRPC_REQUEST_TIMEOUT_SECS", Some("8")),
      ],
      || {
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.addr_string(), "0.0.0.0:50052");
        assert!(!config.enable_compression);
        assert_eq!(config.max_decoding_message_size, DEFAULT_MAX_MESSAGE_SIZE);
        assert_eq!(config.request_timeout, Duration::from_secs(8));
      },
    );
  }

  #[test]
  fn test_from_env_invalid_port() {
    temp_env::with_var("GRPC_PORT", Some("99999"), || {
      let err = ServerConfig::from_env().unwrap_err();
      assert!(err.to_string().contains("GRPC_PORT"));
    });
  }
}
