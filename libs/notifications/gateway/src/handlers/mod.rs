pub mod grpc;

pub use grpc::{EmailServiceImpl, SmsServiceImpl};
