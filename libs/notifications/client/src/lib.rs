//! # Notifier Client
//!
//! Typed client for the notifier's `EmailService` and `SmsService`.
//!
//! Every call carries an `x-request-id`, connects within 5s and completes
//! within 10s (see [`ChannelConfig`]). A response with `success == false` is
//! returned as [`ClientError::Delivery`] so it cannot be mistaken for a send.
//!
//! ```ignore
//! use notifier_client::NotifierClient;
//! use notifier_client::email::SendVerificationEmailRequest;
//!
//! let client = NotifierClient::connect("http://[::1]:50051").await?;
//! let sent = client
//!     .send_verification_email(SendVerificationEmailRequest {
//!         to: "user@example.com".into(),
//!         verification_token: token,
//!         ..Default::default()
//!     })
//!     .await?;
//! ```
//!
//! Fire-and-forget is up to the caller: spawn the future if the result is
//! not needed.

mod error;

pub use error::{ClientError, ClientResult};
pub use grpc_client::ChannelConfig;

/// Email request/response messages
pub use protos::email::v1 as email;
/// SMS request/response messages
pub use protos::sms::v1 as sms;

use grpc_client::TracingInterceptor;
use protos::email::v1::email_service_client::EmailServiceClient;
use protos::email::v1::{
    SendEmailRequest, SendEmailResponse, SendPasswordResetEmailRequest,
    SendTemplateEmailRequest, SendTransactionNotificationRequest, SendVerificationEmailRequest,
    SendWelcomeEmailRequest,
};
use protos::sms::v1::sms_service_client::SmsServiceClient;
use protos::sms::v1::{
    SendBulkSmsRequest, SendBulkSmsResponse, SendOtpRequest, SendOtpResponse, SendSmsRequest,
    SendSmsResponse, SendTransactionAlertRequest, VerifyOtpRequest, VerifyOtpResponse,
};
use tonic::codec::CompressionEncoding;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use tracing::warn;

type Transport = InterceptedService<Channel, TracingInterceptor>;

/// Client for both notifier services over one shared channel.
///
/// Cheap to clone; clones share the underlying HTTP/2 connection.
#[derive(Clone)]
pub struct NotifierClient {
    email: EmailServiceClient<Transport>,
    sms: SmsServiceClient<Transport>,
}

impl NotifierClient {
    /// Connect with the default timeouts (5s connect, 10s per call).
    pub async fn connect(addr: impl Into<String>) -> ClientResult<Self> {
        Self::connect_with_config(addr, ChannelConfig::default()).await
    }

    pub async fn connect_with_config(
        addr: impl Into<String>,
        config: ChannelConfig,
    ) -> ClientResult<Self> {
        let channel = grpc_client::create_channel_with_config(addr, config).await?;
        Ok(Self::from_channel(channel))
    }

    /// Create a client whose connection is established on the first call.
    pub fn connect_lazy(addr: impl Into<String>) -> ClientResult<Self> {
        let channel = grpc_client::create_channel_lazy(addr)?;
        Ok(Self::from_channel(channel))
    }

    pub fn from_channel(channel: Channel) -> Self {
        Self {
            email: EmailServiceClient::with_interceptor(channel.clone(), TracingInterceptor::new())
                .accept_compressed(CompressionEncoding::Zstd),
            sms: SmsServiceClient::with_interceptor(channel, TracingInterceptor::new())
                .accept_compressed(CompressionEncoding::Zstd),
        }
    }

    /// Compress requests with zstd. The server must accept zstd.
    pub fn with_request_compression(mut self) -> Self {
        self.email = self.email.send_compressed(CompressionEncoding::Zstd);
        self.sms = self.sms.send_compressed(CompressionEncoding::Zstd);
        self
    }

    // ------------------------------------------------------------------
    // Email
    // ------------------------------------------------------------------

    pub async fn send_email(&self, request: SendEmailRequest) -> ClientResult<SendEmailResponse> {
        let response = self.email.clone().send_email(request).await?;
        delivered_email(response.into_inner())
    }

    pub async fn send_template_email(
        &self,
        request: SendTemplateEmailRequest,
    ) -> ClientResult<SendEmailResponse> {
        let response = self.email.clone().send_template_email(request).await?;
        delivered_email(response.into_inner())
    }

    pub async fn send_verification_email(
        &self,
        request: SendVerificationEmailRequest,
    ) -> ClientResult<SendEmailResponse> {
        let response = self.email.clone().send_verification_email(request).await?;
        delivered_email(response.into_inner())
    }

    pub async fn send_password_reset_email(
        &self,
        request: SendPasswordResetEmailRequest,
    ) -> ClientResult<SendEmailResponse> {
        let response = self.email.clone().send_password_reset_email(request).await?;
        delivered_email(response.into_inner())
    }

    pub async fn send_welcome_email(
        &self,
        request: SendWelcomeEmailRequest,
    ) -> ClientResult<SendEmailResponse> {
        let response = self.email.clone().send_welcome_email(request).await?;
        delivered_email(response.into_inner())
    }

    pub async fn send_transaction_notification(
        &self,
        request: SendTransactionNotificationRequest,
    ) -> ClientResult<SendEmailResponse> {
        let response = self
            .email
            .clone()
            .send_transaction_notification(request)
            .await?;
        delivered_email(response.into_inner())
    }

    // ------------------------------------------------------------------
    // SMS
    // ------------------------------------------------------------------

    pub async fn send_sms(&self, request: SendSmsRequest) -> ClientResult<SendSmsResponse> {
        let response = self.sms.clone().send_sms(request).await?;
        delivered_sms(response.into_inner())
    }

    /// Send an OTP. Keep the returned `reference_id` for [`Self::verify_otp`].
    pub async fn send_otp(&self, request: SendOtpRequest) -> ClientResult<SendOtpResponse> {
        let response = self.sms.clone().send_otp(request).await?.into_inner();
        match &response.result {
            Some(result) if result.success => Ok(response),
            Some(result) => Err(delivery_error(&result.error)),
            None => Err(delivery_error("")),
        }
    }

    pub async fn send_transaction_alert(
        &self,
        request: SendTransactionAlertRequest,
    ) -> ClientResult<SendSmsResponse> {
        let response = self.sms.clone().send_transaction_alert(request).await?;
        delivered_sms(response.into_inner())
    }

    /// Send one message to many numbers.
    ///
    /// Per-recipient failures are reported in the response, not as an error.
    pub async fn send_bulk_sms(
        &self,
        request: SendBulkSmsRequest,
    ) -> ClientResult<SendBulkSmsResponse> {
        let response = self.sms.clone().send_bulk_sms(request).await?.into_inner();
        if response.failed_count > 0 {
            warn!(
                sent = response.sent_count,
                failed = response.failed_count,
                "Bulk SMS partially failed"
            );
        }
        Ok(response)
    }

    /// Check an OTP. A rejected code is a normal answer with `valid == false`.
    pub async fn verify_otp(&self, request: VerifyOtpRequest) -> ClientResult<VerifyOtpResponse> {
        let response = self.sms.clone().verify_otp(request).await?;
        Ok(response.into_inner())
    }
}

fn delivery_error(error: &str) -> ClientError {
    if error.is_empty() {
        ClientError::Delivery("notification was not delivered".to_string())
    } else {
        ClientError::Delivery(error.to_string())
    }
}

fn delivered_email(response: SendEmailResponse) -> ClientResult<SendEmailResponse> {
    if response.success {
        Ok(response)
    } else {
        Err(delivery_error(&response.error))
    }
}

fn delivered_sms(response: SendSmsResponse) -> ClientResult<SendSmsResponse> {
    if response.success {
        Ok(response)
    } else {
        Err(delivery_error(&response.error))
    }
}
