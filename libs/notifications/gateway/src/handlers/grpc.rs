//! tonic services for `email.v1.EmailService` and `sms.v1.SmsService`.
//!
//! Handlers only convert: proto request → `NotificationRequest` → gateway →
//! proto response. Gateway errors become the matching `Status`.

use std::sync::Arc;

use grpc_client::request_id;
use protos::email::v1::{
    SendEmailRequest, SendEmailResponse, SendPasswordResetEmailRequest,
    SendTemplateEmailRequest, SendTransactionNotificationRequest, SendVerificationEmailRequest,
    SendWelcomeEmailRequest, email_service_server::EmailService,
};
use protos::sms::v1::{
    SendBulkSmsRequest, SendBulkSmsResponse, SendOtpRequest, SendOtpResponse, SendSmsRequest,
    SendSmsResponse, SendTransactionAlertRequest, VerifyOtpRequest, VerifyOtpResponse,
    sms_service_server::SmsService,
};
use tonic::{Request, Response, Status};
use tracing::debug;

use crate::gateway::NotificationGateway;
use crate::models::{NotificationRequest, NotificationResult};

async fn dispatch<Req, Resp>(
    gateway: &NotificationGateway,
    rpc: &'static str,
    request: Request<Req>,
) -> Result<Response<Resp>, Status>
where
    Req: Into<NotificationRequest> + Send,
    Resp: From<NotificationResult>,
{
    let id = request_id(&request);
    debug!(rpc, request_id = ?id, "Handling notification RPC");
    let notification: NotificationRequest = request.into_inner().into();
    let result = gateway.dispatch(&notification).await?;
    Ok(Response::new(result.into()))
}

/// gRPC email service backed by a shared [`NotificationGateway`].
#[derive(Clone)]
pub struct EmailServiceImpl {
    gateway: Arc<NotificationGateway>,
}

impl EmailServiceImpl {
    pub fn new(gateway: Arc<NotificationGateway>) -> Self {
        Self { gateway }
    }
}

#[tonic::async_trait]
impl EmailService for EmailServiceImpl {
    async fn send_email(
        &self,
        request: Request<SendEmailRequest>,
    ) -> Result<Response<SendEmailResponse>, Status> {
        dispatch(&self.gateway, "SendEmail", request).await
    }

    async fn send_template_email(
        &self,
        request: Request<SendTemplateEmailRequest>,
    ) -> Result<Response<SendEmailResponse>, Status> {
        dispatch(&self.gateway, "SendTemplateEmail", request).await
    }

    async fn send_verification_email(
        &self,
        request: Request<SendVerificationEmailRequest>,
    ) -> Result<Response<SendEmailResponse>, Status> {
        dispatch(&self.gateway, "SendVerificationEmail", request).await
    }

    async fn send_password_reset_email(
        &self,
        request: Request<SendPasswordResetEmailRequest>,
    ) -> Result<Response<SendEmailResponse>, Status> {
        dispatch(&self.gateway, "SendPasswordResetEmail", request).await
    }

    async fn send_welcome_email(
        &self,
        request: Request<SendWelcomeEmailRequest>,
    ) -> Result<Response<SendEmailResponse>, Status> {
        dispatch(&self.gateway, "SendWelcomeEmail", request).await
    }

    async fn send_transaction_notification(
        &self,
        request: Request<SendTransactionNotificationRequest>,
    ) -> Result<Response<SendEmailResponse>, Status> {
        dispatch(&self.gateway, "SendTransactionNotification", request).await
    }
}

/// gRPC SMS service backed by a shared [`NotificationGateway`].
#[derive(Clone)]
pub struct SmsServiceImpl {
    gateway: Arc<NotificationGateway>,
}

impl SmsServiceImpl {
    pub fn new(gateway: Arc<NotificationGateway>) -> Self {
        Self { gateway }
    }
}

#[tonic::async_trait]
impl SmsService for SmsServiceImpl {
    async fn send_sms(
        &self,
        request: Request<SendSmsRequest>,
    ) -> Result<Response<SendSmsResponse>, Status> {
        dispatch(&self.gateway, "SendSMS", request).await
    }

    async fn send_otp(
        &self,
        request: Request<SendOtpRequest>,
    ) -> Result<Response<SendOtpResponse>, Status> {
        debug!(request_id = ?request_id(&request), "Handling SendOTP");
        let notification: NotificationRequest = request.into_inner().into();
        let sent = self.gateway.send_otp(&notification).await?;
        Ok(Response::new(sent.into()))
    }

    async fn send_transaction_alert(
        &self,
        request: Request<SendTransactionAlertRequest>,
    ) -> Result<Response<SendSmsResponse>, Status> {
        dispatch(&self.gateway, "SendTransactionAlert", request).await
    }

    async fn send_bulk_sms(
        &self,
        request: Request<SendBulkSmsRequest>,
    ) -> Result<Response<SendBulkSmsResponse>, Status> {
        debug!(request_id = ?request_id(&request), "Handling SendBulkSMS");
        let req = request.into_inner();
        let bulk = self
            .gateway
            .send_bulk_sms(&req.phone_numbers, &req.message)
            .await?;
        Ok(Response::new(bulk.into()))
    }

    async fn verify_otp(
        &self,
        request: Request<VerifyOtpRequest>,
    ) -> Result<Response<VerifyOtpResponse>, Status> {
        debug!(request_id = ?request_id(&request), "Handling VerifyOTP");
        let req = request.into_inner();
        let verdict = self.gateway.verify_otp(&req.code, &req.reference_id).await?;
        Ok(Response::new(verdict.into()))
    }
}
