//! Request and result model shared by every operation kind.

use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumString};

/// Delivery channel; selects which provider adapter handles the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    RawMessage,
    Template,
    Verification,
    PasswordReset,
    Welcome,
    TransactionNotification,
    Otp,
    TransactionAlert,
    BulkMessage,
    OtpVerification,
}

/// What an OTP was issued for. Unknown wire values fall back to `General`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum OtpPurpose {
    #[default]
    General,
    Login,
    Registration,
    Transaction,
    PasswordReset,
}

/// Monetary event details shared by transaction notifications and alerts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDetails {
    pub transaction_id: String,
    pub transaction_type: String,
    pub amount: f64,
    pub currency: String,
    pub balance: f64,
    /// Only used by email notifications
    pub recipient_name: String,
    /// Only used by email notifications
    pub timestamp: String,
}

/// Kind-specific content of a request. The variant fixes the operation kind,
/// so a request can never carry two payloads at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Free-form message. SMS carries its text in `text_body`.
    Message {
        subject: String,
        html_body: String,
        text_body: String,
    },
    Template {
        template_id: String,
        variables: BTreeMap<String, String>,
    },
    Verification {
        token: String,
        user_name: String,
        verification_url: Option<String>,
    },
    PasswordReset {
        token: String,
        user_name: String,
        reset_url: Option<String>,
        expiry_minutes: Option<u32>,
    },
    Welcome {
        user_name: String,
        account_type: String,
    },
    TransactionNotification(TransactionDetails),
    Otp {
        code: String,
        expiry_minutes: Option<u32>,
        purpose: OtpPurpose,
        reference_id: Option<String>,
        jurisdiction: Option<String>,
    },
    TransactionAlert {
        details: TransactionDetails,
        jurisdiction: Option<String>,
    },
}

impl Payload {
    pub fn kind(&self) -> OperationKind {
        match self {
            Payload::Message { .. } => OperationKind::RawMessage,
            Payload::Template { .. } => OperationKind::Template,
            Payload::Verification { .. } => OperationKind::Verification,
            Payload::PasswordReset { .. } => OperationKind::PasswordReset,
            Payload::Welcome { .. } => OperationKind::Welcome,
            Payload::TransactionNotification(_) => OperationKind::TransactionNotification,
            Payload::Otp { .. } => OperationKind::Otp,
            Payload::TransactionAlert { .. } => OperationKind::TransactionAlert,
        }
    }
}

/// A single notification to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub channel: Channel,
    /// Email address or E.164 phone number
    pub recipient: String,
    pub payload: Payload,
}

impl NotificationRequest {
    pub fn email(recipient: impl Into<String>, payload: Payload) -> Self {
        Self {
            channel: Channel::Email,
            recipient: recipient.into(),
            payload,
        }
    }

    pub fn sms(recipient: impl Into<String>, payload: Payload) -> Self {
        Self {
            channel: Channel::Sms,
            recipient: recipient.into(),
            payload,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.payload.kind()
    }
}

/// The provider operation a request resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    Send {
        to: String,
        subject: String,
        html_body: String,
        text_body: String,
    },
    SendTemplate {
        to: String,
        template_id: String,
        variables: BTreeMap<String, String>,
    },
}

impl ProviderCall {
    pub fn recipient(&self) -> &str {
        match self {
            ProviderCall::Send { to, .. } | ProviderCall::SendTemplate { to, .. } => to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// Outcome of a dispatch.
///
/// `success` and `status` always agree; a successful result has a non-empty
/// `message_id` and no error, a failed one the reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationResult {
    pub message_id: String,
    pub success: bool,
    pub error_message: String,
    pub status: DeliveryStatus,
    /// Unix seconds at construction
    pub timestamp: i64,
}

const EMPTY_MESSAGE_ID: &str = "provider returned an empty message id";
const UNKNOWN_PROVIDER_ERROR: &str = "unknown provider error";

impl NotificationResult {
    pub fn sent(message_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            message_id: message_id.into(),
            success: true,
            error_message: String::new(),
            status: DeliveryStatus::Sent,
            timestamp,
        }
    }

    pub fn failed(error_message: impl Into<String>, timestamp: i64) -> Self {
        Self {
            message_id: String::new(),
            success: false,
            error_message: error_message.into(),
            status: DeliveryStatus::Failed,
            timestamp,
        }
    }

    /// Shapes a provider outcome. Pure: the same outcome and timestamp always
    /// produce the same result, and degenerate outcomes still satisfy the
    /// success/message-id/error invariant.
    pub fn from_outcome(outcome: Result<&str, &str>, timestamp: i64) -> Self {
        match outcome {
            Ok(id) if !id.is_empty() => Self::sent(id, timestamp),
            Ok(_) => Self::failed(EMPTY_MESSAGE_ID, timestamp),
            Err(msg) if !msg.is_empty() => Self::failed(msg, timestamp),
            Err(_) => Self::failed(UNKNOWN_PROVIDER_ERROR, timestamp),
        }
    }
}

/// Why a `VerifyOTP` call was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum OtpRejection {
    NotFound,
    Expired,
    AlreadyUsed,
    InvalidCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpVerification {
    pub valid: bool,
    pub reason: Option<OtpRejection>,
}

impl OtpVerification {
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(reason: OtpRejection) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Result of `SendOTP`: the shaped delivery plus the handle used to verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpDispatch {
    pub result: NotificationResult,
    pub reference_id: String,
    /// Unix seconds; zero when nothing was recorded because delivery failed
    pub expires_at: i64,
}

/// Result of a bulk SMS send, one entry per recipient in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDispatch {
    pub results: Vec<NotificationResult>,
    pub sent_count: usize,
    pub failed_count: usize,
}

impl BulkDispatch {
    pub fn from_results(results: Vec<NotificationResult>) -> Self {
        let sent_count = results.iter().filter(|r| r.success).count();
        let failed_count = results.len() - sent_count;
        Self {
            results,
            sent_count,
            failed_count,
        }
    }
}
