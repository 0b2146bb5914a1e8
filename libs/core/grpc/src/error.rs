use std::time::Duration;
use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors that can occur while creating or configuring gRPC channels and servers
#[derive(Error, Debug)]
pub enum GrpcError {
  /// Invalid URI provided for connection
  #[error("Invalid URI: {0}")]
  InvalidUri(#[from] tonic::transport::Error),

  /// Failed to establish connection
  #[error("Connection failed: {0}")]
  ConnectionFailed(tonic::transport::Error),

  /// Connection timeout
  #[error("Connection timeout after {0:?}")]
  ConnectionTimeout(Duration),

  /// Invalid configuration
  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),
}

impl From<GrpcError> for tonic::Status {
  fn from(err: GrpcError) -> Self {
    match err {
      GrpcError::InvalidUri(_) | GrpcError::InvalidConfig(_) => {
        tonic::Status::invalid_argument(err.to_string())
      }
      GrpcError::ConnectionTimeout(_) => tonic::Status::deadline_exceeded(err.to_string()),
      GrpcError::ConnectionFailed(_) => tonic::Status::unavailable(err.to_string()),
    }
  }
}
