//! Test binary to send notifications through a running notifier
//!
//! Run with: cargo run -p zerg_notifier --bin send_test_notification
//!
//! Reads `NOTIFIER_ADDR` (default `http://[::1]:50051`), `TEST_EMAIL_TO` and
//! `TEST_SMS_TO`.

use core_config::env_or_default;
use eyre::{Result, WrapErr};
use notifier_client::email::{SendEmailRequest, SendVerificationEmailRequest};
use notifier_client::sms::{OtpPurpose, SendOtpRequest, VerifyOtpRequest};
use notifier_client::{ClientError, NotifierClient};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let addr = env_or_default("NOTIFIER_ADDR", "http://[::1]:50051");
    let email_to = env_or_default("TEST_EMAIL_TO", "test@example.com");
    let sms_to = env_or_default("TEST_SMS_TO", "+254700000001");

    println!("Connecting to notifier at {}", addr);
    let client = NotifierClient::connect(addr.as_str())
        .await
        .wrap_err("Failed to connect to notifier")?;

    let sent = client
        .send_email(SendEmailRequest {
            to: email_to.clone(),
            subject: "Test Email from Zerg".into(),
            html_body: "<h1>Hello!</h1><p>This is a test email sent via the notifier.</p>".into(),
            text_body: "Hello! This is a test email sent via the notifier.".into(),
        })
        .await
        .wrap_err("SendEmail failed")?;
    println!("Email sent to {}: message id {}", email_to, sent.message_id);

    let sent = client
        .send_verification_email(SendVerificationEmailRequest {
            to: email_to.clone(),
            verification_token: "test-token-123".into(),
            user_name: "Test User".into(),
            verification_url: String::new(),
        })
        .await
        .wrap_err("SendVerificationEmail failed")?;
    println!("Verification email sent: message id {}", sent.message_id);

    let otp = client
        .send_otp(SendOtpRequest {
            phone_number: sms_to.clone(),
            code: "123456".into(),
            expiry_minutes: 5,
            purpose: OtpPurpose::Login as i32,
            reference_id: String::new(),
            jurisdiction: String::new(),
        })
        .await;

    match otp {
        Ok(otp) => {
            println!("OTP sent to {}: reference {}", sms_to, otp.reference_id);
            let verdict = client
                .verify_otp(VerifyOtpRequest {
                    code: "123456".into(),
                    reference_id: otp.reference_id,
                })
                .await
                .wrap_err("VerifyOTP failed")?;
            println!("OTP valid: {} {}", verdict.valid, verdict.reason);
        }
        Err(ClientError::Delivery(reason)) => println!("OTP not delivered: {}", reason),
        Err(e) => return Err(e).wrap_err("SendOTP failed"),
    }

    Ok(())
}
