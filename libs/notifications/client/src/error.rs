use grpc_client::GrpcError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The channel could not be created or connected.
    #[error(transparent)]
    Transport(#[from] GrpcError),

    /// The RPC ended with a non-OK status.
    #[error("notifier rpc failed: {0}")]
    Rpc(tonic::Status),

    /// The RPC succeeded but the provider did not deliver the message.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

// tonic's own request timeout surfaces as `Cancelled` with this message.
const TIMEOUT_EXPIRED: &str = "Timeout expired";

impl From<tonic::Status> for ClientError {
    fn from(status: tonic::Status) -> Self {
        if status.code() == tonic::Code::Cancelled && status.message() == TIMEOUT_EXPIRED {
            return ClientError::Rpc(tonic::Status::deadline_exceeded(TIMEOUT_EXPIRED));
        }
        ClientError::Rpc(status)
    }
}

impl ClientError {
    /// gRPC code of an RPC failure, if this is one.
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            ClientError::Rpc(status) => Some(status.code()),
            _ => None,
        }
    }
}
