//! Required-field checks run before any provider call.
//!
//! Only the fields the operation kind needs are checked; everything else is
//! ignored.

use crate::error::{GatewayError, GatewayResult};
use crate::models::{Channel, NotificationRequest, Payload};

fn require(value: &str, field: &str) -> GatewayResult<()> {
    if value.is_empty() {
        return Err(GatewayError::missing(field));
    }
    Ok(())
}

fn recipient_field(channel: Channel) -> &'static str {
    match channel {
        Channel::Email => "to",
        Channel::Sms => "phone_number",
    }
}

pub fn validate(request: &NotificationRequest) -> GatewayResult<()> {
    require(&request.recipient, recipient_field(request.channel))?;

    match &request.payload {
        Payload::Message {
            subject,
            html_body,
            text_body,
        } => match request.channel {
            Channel::Email => {
                require(subject, "subject")?;
                if html_body.is_empty() && text_body.is_empty() {
                    return Err(GatewayError::InvalidArgument(
                        "html_body or text_body is required".to_string(),
                    ));
                }
                Ok(())
            }
            Channel::Sms => require(text_body, "message"),
        },
        Payload::Template { template_id, .. } => require(template_id, "template_id"),
        Payload::Verification { token, .. } => require(token, "verification_token"),
        Payload::PasswordReset { token, .. } => require(token, "reset_token"),
        Payload::Welcome { .. } => Ok(()),
        Payload::TransactionNotification(details)
        | Payload::TransactionAlert { details, .. } => {
            require(&details.transaction_id, "transaction_id")
        }
        Payload::Otp { code, .. } => require(code, "code"),
    }
}

/// Checks a bulk SMS batch: at least one recipient, none empty, and a body.
pub fn validate_bulk(recipients: &[String], message: &str) -> GatewayResult<()> {
    if recipients.is_empty() {
        return Err(GatewayError::missing("phone_numbers"));
    }
    if let Some(index) = recipients.iter().position(|r| r.is_empty()) {
        return Err(GatewayError::InvalidArgument(format!(
            "phone_numbers[{index}] is empty"
        )));
    }
    require(message, "message")
}

pub fn validate_otp_check(code: &str, reference_id: &str) -> GatewayResult<()> {
    require(code, "code")?;
    require(reference_id, "reference_id")
}
