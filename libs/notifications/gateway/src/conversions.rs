//! Proto ↔ domain conversions
//!
//! Requests convert infallibly: required-field checks belong to validation so
//! that every RPC reports them the same way.

use protos::email::v1::{
    SendEmailRequest, SendEmailResponse, SendPasswordResetEmailRequest,
    SendTemplateEmailRequest, SendTransactionNotificationRequest, SendVerificationEmailRequest,
    SendWelcomeEmailRequest,
};
use protos::sms::v1::{
    OtpPurpose as ProtoOtpPurpose, SendBulkSmsResponse, SendOtpRequest, SendOtpResponse,
    SendSmsRequest, SendSmsResponse, SendTransactionAlertRequest, VerifyOtpResponse,
};

use crate::models::{
    BulkDispatch, NotificationRequest, NotificationResult, OtpDispatch, OtpPurpose,
    OtpVerification, Payload, TransactionDetails,
};

fn optional(value: String) -> Option<String> {
    Some(value).filter(|v| !v.trim().is_empty())
}

fn positive_minutes(value: i32) -> Option<u32> {
    u32::try_from(value).ok().filter(|m| *m > 0)
}

// ============================================================================
// Email requests
// ============================================================================

impl From<SendEmailRequest> for NotificationRequest {
    fn from(req: SendEmailRequest) -> Self {
        NotificationRequest::email(
            req.to,
            Payload::Message {
                subject: req.subject,
                html_body: req.html_body,
                text_body: req.text_body,
            },
        )
    }
}

impl From<SendTemplateEmailRequest> for NotificationRequest {
    fn from(req: SendTemplateEmailRequest) -> Self {
        NotificationRequest::email(
            req.to,
            Payload::Template {
                template_id: req.template_id,
                variables: req.variables.into_iter().collect(),
            },
        )
    }
}

impl From<SendVerificationEmailRequest> for NotificationRequest {
    fn from(req: SendVerificationEmailRequest) -> Self {
        NotificationRequest::email(
            req.to,
            Payload::Verification {
                token: req.verification_token,
                user_name: req.user_name,
                verification_url: optional(req.verification_url),
            },
        )
    }
}

impl From<SendPasswordResetEmailRequest> for NotificationRequest {
    fn from(req: SendPasswordResetEmailRequest) -> Self {
        NotificationRequest::email(
            req.to,
            Payload::PasswordReset {
                token: req.reset_token,
                user_name: req.user_name,
                reset_url: optional(req.reset_url),
                expiry_minutes: positive_minutes(req.expiry_minutes),
            },
        )
    }
}

impl From<SendWelcomeEmailRequest> for NotificationRequest {
    fn from(req: SendWelcomeEmailRequest) -> Self {
        NotificationRequest::email(
            req.to,
            Payload::Welcome {
                user_name: req.user_name,
                account_type: req.account_type,
            },
        )
    }
}

impl From<SendTransactionNotificationRequest> for NotificationRequest {
    fn from(req: SendTransactionNotificationRequest) -> Self {
        NotificationRequest::email(
            req.to,
            Payload::TransactionNotification(TransactionDetails {
                transaction_id: req.transaction_id,
                transaction_type: req.transaction_type,
                amount: req.amount,
                currency: req.currency,
                balance: req.balance,
                recipient_name: req.recipient_name,
                timestamp: req.timestamp,
            }),
        )
    }
}

// ============================================================================
// SMS requests
// ============================================================================

impl From<ProtoOtpPurpose> for OtpPurpose {
    fn from(purpose: ProtoOtpPurpose) -> Self {
        match purpose {
            ProtoOtpPurpose::Unspecified => OtpPurpose::General,
            ProtoOtpPurpose::Login => OtpPurpose::Login,
            ProtoOtpPurpose::Registration => OtpPurpose::Registration,
            ProtoOtpPurpose::Transaction => OtpPurpose::Transaction,
            ProtoOtpPurpose::PasswordReset => OtpPurpose::PasswordReset,
        }
    }
}

impl From<SendSmsRequest> for NotificationRequest {
    /// Raw SMS bodies are sent verbatim; jurisdiction does not apply.
    fn from(req: SendSmsRequest) -> Self {
        NotificationRequest::sms(
            req.phone_number,
            Payload::Message {
                subject: String::new(),
                html_body: String::new(),
                text_body: req.message,
            },
        )
    }
}

impl From<SendOtpRequest> for NotificationRequest {
    fn from(req: SendOtpRequest) -> Self {
        // Unknown enum values decode as Unspecified.
        let purpose = req.purpose().into();
        NotificationRequest::sms(
            req.phone_number,
            Payload::Otp {
                code: req.code,
                expiry_minutes: positive_minutes(req.expiry_minutes),
                purpose,
                reference_id: optional(req.reference_id),
                jurisdiction: optional(req.jurisdiction),
            },
        )
    }
}

impl From<SendTransactionAlertRequest> for NotificationRequest {
    fn from(req: SendTransactionAlertRequest) -> Self {
        NotificationRequest::sms(
            req.phone_number,
            Payload::TransactionAlert {
                details: TransactionDetails {
                    transaction_id: req.transaction_id,
                    transaction_type: req.transaction_type,
                    amount: req.amount,
                    currency: req.currency,
                    balance: req.balance,
                    ..Default::default()
                },
                jurisdiction: optional(req.jurisdiction),
            },
        )
    }
}

// ============================================================================
// Responses
// ============================================================================

impl From<NotificationResult> for SendEmailResponse {
    fn from(result: NotificationResult) -> Self {
        Self {
            status: result.status.to_string(),
            message_id: result.message_id,
            success: result.success,
            error: result.error_message,
            timestamp: result.timestamp,
        }
    }
}

impl From<NotificationResult> for SendSmsResponse {
    fn from(result: NotificationResult) -> Self {
        Self {
            status: result.status.to_string(),
            message_id: result.message_id,
            success: result.success,
            error: result.error_message,
            timestamp: result.timestamp,
        }
    }
}

impl From<OtpDispatch> for SendOtpResponse {
    fn from(dispatch: OtpDispatch) -> Self {
        Self {
            result: Some(dispatch.result.into()),
            reference_id: dispatch.reference_id,
            expires_at: dispatch.expires_at,
        }
    }
}

fn saturating_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl From<BulkDispatch> for SendBulkSmsResponse {
    fn from(bulk: BulkDispatch) -> Self {
        Self {
            sent_count: saturating_i32(bulk.sent_count),
            failed_count: saturating_i32(bulk.failed_count),
            results: bulk.results.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<OtpVerification> for VerifyOtpResponse {
    fn from(verification: OtpVerification) -> Self {
        Self {
            valid: verification.valid,
            reason: verification
                .reason
                .map(|r| r.to_string())
                .unwrap_or_default(),
        }
    }
}
