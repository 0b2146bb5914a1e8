use tonic::{Request, Status};

/// Metadata key carrying the correlation id of a call.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Interceptor that stamps every outgoing call with an `x-request-id`.
///
/// An id already present on the request is kept, so a caller that received
/// one upstream can forward it unchanged.
///
/// # Example
/// ```ignore
/// use grpc_client::interceptors::TracingInterceptor;
/// use protos::email::v1::email_service_client::EmailServiceClient;
///
/// let channel = create_channel("http://[::1]:50051").await?;
/// let client = EmailServiceClient::with_interceptor(channel, TracingInterceptor::new());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TracingInterceptor;

impl TracingInterceptor {
  pub fn new() -> Self {
    Self
  }
}

impl tonic::service::Interceptor for TracingInterceptor {
  fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
    let id = match request_id(&request) {
      Some(existing) => existing,
      None => {
        let generated = uuid::Uuid::new_v4().to_string();
        request.metadata_mut().insert(
          REQUEST_ID_HEADER,
          generated
            .parse()
            .map_err(|_| Status::internal("Failed to create request ID"))?,
        );
        generated
      }
    };

    tracing::debug!(target: "grpc_client", request_id = %id, "Outgoing gRPC request");

    Ok(request)
  }
}

/// Reads the `x-request-id` of an incoming or outgoing request, if any.
pub fn request_id<T>(request: &Request<T>) -> Option<String> {
  request
    .metadata()
    .get(REQUEST_ID_HEADER)
    .and_then(|value| value.to_str().ok())
    .filter(|value| !value.is_empty())
    .map(str::to_owned)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tonic::service::Interceptor;

  #[test]
  fn test_generates_request_id() {
    let mut interceptor = TracingInterceptor::new();
    let req = interceptor.call(Request::new(())).unwrap();
    let id = request_id(&req).unwrap();
    assert!(uuid::Uuid::parse_str(&id).is_ok());
  }

  #[test]
  fn test_keeps_existing_request_id() {
    let mut interceptor = TracingInterceptor::new();
    let mut request = Request::new(());
    request
      .metadata_mut()
      .insert(REQUEST_ID_HEADER, "upstream-42".parse().unwrap());

    let req = interceptor.call(request).unwrap();
    assert_eq!(request_id(&req).as_deref(), Some("upstream-42"));
  }

  #[test]
  fn test_request_id_absent() {
    assert!(request_id(&Request::new(())).is_none());
  }
}
