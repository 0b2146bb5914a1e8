use std::time::Duration;
use tonic::transport::Endpoint;

/// Configuration for gRPC channel creation
///
/// `connect_timeout` bounds connection establishment and `timeout` bounds each
/// RPC. tonic reports an elapsed request timeout as `CANCELLED` with the
/// message "Timeout expired"; the server abandons the in-flight work.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
  // HTTP/2 Keep-Alive
  pub http2_keep_alive_interval: Option<Duration>,
  pub keep_alive_timeout: Duration,
  pub keep_alive_while_idle: bool,

  // Connection settings
  pub connect_timeout: Duration,
  pub timeout: Duration,

  // TCP settings
  pub tcp_nodelay: bool,
  pub tcp_keepalive: Option<Duration>,
}

impl Default for ChannelConfig {
  /// 5s to connect, 10s per notification RPC.
  fn default() -> Self {
    Self {
      http2_keep_alive_interval: Some(Duration::from_secs(30)),
      keep_alive_timeout: Duration::from_secs(10),
      keep_alive_while_idle: true,
      connect_timeout: Duration::from_secs(5),
      timeout: Duration::from_secs(10),
      tcp_nodelay: true,
      tcp_keepalive: Some(Duration::from_secs(30)),
    }
  }
}

impl ChannelConfig {
  /// Create a new configuration with the default timeouts
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the connection timeout
  pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
    self.connect_timeout = timeout;
    self
  }

  /// Set the request timeout for individual RPCs
  ///
  /// # Example
  /// ```ignore
  /// let config = ChannelConfig::new()
  ///     .with_request_timeout(Duration::from_secs(30));
  /// ```
  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Disable HTTP/2 keep-alive
  pub fn without_keep_alive(mut self) -> Self {
    self.http2_keep_alive_interval = None;
    self
  }

  pub(crate) fn apply_to_endpoint(self, mut endpoint: Endpoint) -> Endpoint {
    if let Some(interval) = self.http2_keep_alive_interval {
      endpoint = endpoint.http2_keep_alive_interval(interval);
    }
    endpoint = endpoint
      .keep_alive_timeout(self.keep_alive_timeout)
      .keep_alive_while_idle(self.keep_alive_while_idle)
      .connect_timeout(self.connect_timeout)
      .timeout(self.timeout)
      .tcp_nodelay(self.tcp_nodelay);

    if let Some(keepalive) = self.tcp_keepalive {
      endpoint = endpoint.tcp_keepalive(Some(keepalive));
    }

    endpoint
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = ChannelConfig::default();
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert!(config.tcp_nodelay);
  }

  #[test]
  fn test_builder_pattern() {
    let config = ChannelConfig::new()
      .with_connect_timeout(Duration::from_secs(2))
      .with_request_timeout(Duration::from_secs(30))
      .without_keep_alive();

    assert_eq!(config.connect_timeout, Duration::from_secs(2));
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.http2_keep_alive_interval, None);
  }
}
