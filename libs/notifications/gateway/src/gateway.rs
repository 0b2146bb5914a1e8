//! Dispatch: validate, plan, call the provider, shape the result.

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult, ProviderError};
use crate::models::{
    BulkDispatch, Channel, NotificationRequest, NotificationResult, OperationKind, OtpDispatch,
    OtpRejection, OtpVerification, Payload, ProviderCall,
};
use crate::operations::{otp_expiry_minutes, plan};
use crate::otp::{OtpRecord, OtpStore};
use crate::provider::{self, ProviderAdapter};
use crate::validation::{validate, validate_bulk, validate_otp_check};

/// Uniform entry point for every notification operation.
///
/// Holds no per-call state: providers, the OTP store and the configuration
/// are shared read-only across concurrent calls.
#[derive(Clone)]
pub struct NotificationGateway {
    email: Arc<dyn ProviderAdapter>,
    sms: Arc<dyn ProviderAdapter>,
    otp_store: Arc<dyn OtpStore>,
    config: Arc<GatewayConfig>,
}

impl NotificationGateway {
    pub fn new(
        email: Arc<dyn ProviderAdapter>,
        sms: Arc<dyn ProviderAdapter>,
        otp_store: Arc<dyn OtpStore>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            email,
            sms,
            otp_store,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn provider(&self, channel: Channel) -> &dyn ProviderAdapter {
        match channel {
            Channel::Email => self.email.as_ref(),
            Channel::Sms => self.sms.as_ref(),
        }
    }

    /// Dispatch a single notification.
    ///
    /// Errors only for malformed requests, provider timeouts and unreachable
    /// providers; a provider refusing the message yields `success == false`.
    #[instrument(
        skip(self, request),
        fields(channel = %request.channel, kind = %request.kind(), to = %request.recipient)
    )]
    pub async fn dispatch(&self, request: &NotificationRequest) -> GatewayResult<NotificationResult> {
        validate(request)?;
        let call = plan(request, &self.config);
        self.deliver(request.channel, &call).await
    }

    async fn deliver(&self, channel: Channel, call: &ProviderCall) -> GatewayResult<NotificationResult> {
        let provider = self.provider(channel);
        let timeout = self.config.provider_timeout;

        let outcome = tokio::time::timeout(timeout, provider::execute(provider, call))
            .await
            .map_err(|_| {
                warn!(provider = provider.name(), ?timeout, "Provider call timed out");
                GatewayError::DeadlineExceeded(timeout)
            })?;

        let now = Utc::now().timestamp();
        let result = match outcome {
            Ok(message_id) => NotificationResult::from_outcome(Ok(&message_id), now),
            Err(ProviderError::Rejected(reason)) => {
                NotificationResult::from_outcome(Err(&reason), now)
            }
            Err(ProviderError::Unavailable(reason)) => {
                warn!(provider = provider.name(), error = %reason, "Provider unavailable");
                return Err(GatewayError::Unavailable(reason));
            }
        };

        if result.success {
            info!(provider = provider.name(), message_id = %result.message_id, "Notification sent");
        } else {
            warn!(provider = provider.name(), error = %result.error_message, "Notification rejected");
        }
        Ok(result)
    }

    /// Send the same SMS to every recipient.
    ///
    /// The batch is validated up front. Recipients are then sent
    /// independently; a protocol failure on one of them is reported as that
    /// entry's failed result instead of aborting the rest.
    #[instrument(
        skip(self, recipients, message),
        fields(kind = %OperationKind::BulkMessage, count = recipients.len())
    )]
    pub async fn send_bulk_sms(
        &self,
        recipients: &[String],
        message: &str,
    ) -> GatewayResult<BulkDispatch> {
        validate_bulk(recipients, message)?;

        let sends = recipients.iter().map(|recipient| async move {
            let request = NotificationRequest::sms(
                recipient.clone(),
                Payload::Message {
                    subject: String::new(),
                    html_body: String::new(),
                    text_body: message.to_string(),
                },
            );
            match self.dispatch(&request).await {
                Ok(result) => result,
                Err(e) => NotificationResult::failed(e.to_string(), Utc::now().timestamp()),
            }
        });

        let bulk = BulkDispatch::from_results(join_all(sends).await);
        info!(sent = bulk.sent_count, failed = bulk.failed_count, "Bulk SMS finished");
        Ok(bulk)
    }

    /// Deliver an OTP and record it for later verification.
    ///
    /// The record is stored only when the provider accepted the message.
    #[instrument(skip(self, request), fields(to = %request.recipient))]
    pub async fn send_otp(&self, request: &NotificationRequest) -> GatewayResult<OtpDispatch> {
        let Payload::Otp {
            code,
            expiry_minutes,
            purpose,
            reference_id,
            ..
        } = &request.payload
        else {
            return Err(GatewayError::InvalidArgument(format!(
                "expected an OTP payload, got {}",
                request.kind()
            )));
        };

        validate(request)?;

        let reference_id = reference_id
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let call = plan(request, &self.config);
        let result = self.deliver(Channel::Sms, &call).await?;
        if !result.success {
            return Ok(OtpDispatch {
                result,
                reference_id,
                expires_at: 0,
            });
        }

        let ttl = otp_expiry_minutes(*expiry_minutes, &self.config);
        let expires_at = Utc::now() + chrono::Duration::minutes(i64::from(ttl));
        self.otp_store
            .insert(OtpRecord::new(
                reference_id.clone(),
                request.recipient.clone(),
                *purpose,
                code,
                expires_at,
            ))
            .await?;

        debug!(reference_id = %reference_id, ttl_minutes = ttl, "OTP recorded");
        Ok(OtpDispatch {
            result,
            reference_id,
            expires_at: expires_at.timestamp(),
        })
    }

    /// Check a code against the record stored under `reference_id`.
    ///
    /// A matching code is consumed and cannot be used again.
    #[instrument(skip(self, code), fields(kind = %OperationKind::OtpVerification))]
    pub async fn verify_otp(&self, code: &str, reference_id: &str) -> GatewayResult<OtpVerification> {
        validate_otp_check(code, reference_id)?;

        let verdict = match self.otp_store.get(reference_id).await? {
            None => OtpVerification::rejected(OtpRejection::NotFound),
            Some(record) if record.consumed => OtpVerification::rejected(OtpRejection::AlreadyUsed),
            Some(record) if record.is_expired(Utc::now()) => {
                OtpVerification::rejected(OtpRejection::Expired)
            }
            Some(record) if !record.matches(code) => {
                OtpVerification::rejected(OtpRejection::InvalidCode)
            }
            Some(_) => {
                if self.otp_store.mark_consumed(reference_id).await? {
                    OtpVerification::valid()
                } else {
                    // Lost a race with a concurrent verification.
                    OtpVerification::rejected(OtpRejection::AlreadyUsed)
                }
            }
        };

        info!(valid = verdict.valid, reason = ?verdict.reason, "OTP verified");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeliveryStatus, OtpPurpose};
    use crate::otp::{InMemoryOtpStore, MockOtpStore, digest};
    use crate::provider::{MockProvider, MockProviderAdapter};
    use std::time::Duration;

    fn gateway_with(email: Arc<dyn ProviderAdapter>, sms: Arc<dyn ProviderAdapter>) -> NotificationGateway {
        NotificationGateway::new(
            email,
            sms,
            Arc::new(InMemoryOtpStore::new()),
            GatewayConfig::default(),
        )
    }

    fn raw_email(to: &str) -> NotificationRequest {
        NotificationRequest::email(
            to,
            Payload::Message {
                subject: "Hi".into(),
                html_body: "<p>Hi</p>".into(),
                text_body: String::new(),
            },
        )
    }

    fn otp(code: &str, reference_id: Option<&str>) -> NotificationRequest {
        NotificationRequest::sms(
            "+254700000001",
            Payload::Otp {
                code: code.into(),
                expiry_minutes: Some(5),
                purpose: OtpPurpose::Login,
                reference_id: reference_id.map(str::to_owned),
                jurisdiction: None,
            },
        )
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_channel_provider() {
        let email = Arc::new(MockProvider::returning_id("email-1"));
        let sms = Arc::new(MockProvider::returning_id("sms-1"));
        let gateway = gateway_with(email.clone(), sms.clone());

        let result = gateway.dispatch(&raw_email("a@b.com")).await.unwrap();
        assert_eq!(result.message_id, "email-1");
        assert_eq!(email.call_count().await, 1);
        assert_eq!(sms.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_request_makes_no_provider_call() {
        let mut email = MockProviderAdapter::new();
        email.expect_send().never();
        email.expect_send_template().never();
        let gateway = gateway_with(Arc::new(email), Arc::new(MockProvider::new()));

        let err = gateway.dispatch(&raw_email("")).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_rejection_is_shaped() {
        let mut email = MockProviderAdapter::new();
        email
            .expect_send_template()
            .times(1)
            .returning(|_, _, _| Err(ProviderError::Rejected("quota exceeded".into())));
        email.expect_name().return_const("stub");
        let gateway = gateway_with(Arc::new(email), Arc::new(MockProvider::new()));

        let request = NotificationRequest::email(
            "a@b.com",
            Payload::Welcome {
                user_name: "Ann".into(),
                account_type: "personal".into(),
            },
        );
        let result = gateway.dispatch(&request).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.error_message, "quota exceeded");
        assert_eq!(result.status, DeliveryStatus::Failed);
        assert!(result.message_id.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_is_protocol_error() {
        let gateway = gateway_with(
            Arc::new(MockProvider::unavailable("connection refused")),
            Arc::new(MockProvider::new()),
        );
        let err = gateway.dispatch(&raw_email("a@b.com")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout() {
        let slow = MockProvider::returning_id("late").with_delay(Duration::from_secs(30));
        let gateway = NotificationGateway::new(
            Arc::new(slow),
            Arc::new(MockProvider::new()),
            Arc::new(InMemoryOtpStore::new()),
            GatewayConfig::default().with_provider_timeout(Duration::from_secs(2)),
        );

        let err = gateway.dispatch(&raw_email("a@b.com")).await.unwrap_err();
        assert!(matches!(err, GatewayError::DeadlineExceeded(d) if d == Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_bulk_reports_each_recipient() {
        let sms = Arc::new(MockProvider::with_responder(|call| {
            if call.recipient().ends_with('0') {
                Err(ProviderError::Rejected("invalid number".into()))
            } else {
                Ok(format!("sms-{}", call.recipient()))
            }
        }));
        let gateway = gateway_with(Arc::new(MockProvider::new()), sms.clone());

        let recipients = vec!["+2547001".to_string(), "+2547000".to_string(), "+2547002".to_string()];
        let bulk = gateway.send_bulk_sms(&recipients, "Maintenance tonight").await.unwrap();

        assert_eq!(bulk.sent_count, 2);
        assert_eq!(bulk.failed_count, 1);
        assert_eq!(bulk.results[0].message_id, "sms-+2547001");
        assert_eq!(bulk.results[1].error_message, "invalid number");
        assert_eq!(sms.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_bulk_validates_before_sending() {
        let sms = Arc::new(MockProvider::new());
        let gateway = gateway_with(Arc::new(MockProvider::new()), sms.clone());

        let err = gateway
            .send_bulk_sms(&["+1".to_string(), String::new()], "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArgument(_)));
        assert_eq!(sms.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_otp_roundtrip() {
        let store = Arc::new(InMemoryOtpStore::new());
        let gateway = NotificationGateway::new(
            Arc::new(MockProvider::new()),
            Arc::new(MockProvider::returning_id("sms-otp")),
            store.clone(),
            GatewayConfig::default(),
        );

        let sent = gateway.send_otp(&otp("123456", None)).await.unwrap();
        assert!(sent.result.success);
        assert!(!sent.reference_id.is_empty());
        assert!(sent.expires_at > Utc::now().timestamp());

        let wrong = gateway.verify_otp("000000", &sent.reference_id).await.unwrap();
        assert_eq!(wrong.reason, Some(OtpRejection::InvalidCode));

        let ok = gateway.verify_otp("123456", &sent.reference_id).await.unwrap();
        assert!(ok.valid);

        let again = gateway.verify_otp("123456", &sent.reference_id).await.unwrap();
        assert_eq!(again.reason, Some(OtpRejection::AlreadyUsed));

        let missing = gateway.verify_otp("123456", "nope").await.unwrap();
        assert_eq!(missing.reason, Some(OtpRejection::NotFound));
    }

    #[tokio::test]
    async fn test_otp_expired() {
        let store = Arc::new(InMemoryOtpStore::new());
        store
            .insert(OtpRecord::new(
                "ref-old",
                "+254700000001",
                OtpPurpose::Login,
                "123456",
                Utc::now() - chrono::Duration::minutes(1),
            ))
            .await
            .unwrap();
        let gateway = NotificationGateway::new(
            Arc::new(MockProvider::new()),
            Arc::new(MockProvider::new()),
            store,
            GatewayConfig::default(),
        );

        let verdict = gateway.verify_otp("123456", "ref-old").await.unwrap();
        assert_eq!(verdict, OtpVerification::rejected(OtpRejection::Expired));
    }

    #[tokio::test]
    async fn test_expired_reason_survives_later_issues() {
        let store = Arc::new(InMemoryOtpStore::new());
        store
            .insert(OtpRecord::new(
                "ref-old",
                "+254700000001",
                OtpPurpose::Login,
                "123456",
                Utc::now() - chrono::Duration::minutes(1),
            ))
            .await
            .unwrap();
        let gateway = NotificationGateway::new(
            Arc::new(MockProvider::new()),
            Arc::new(MockProvider::returning_id("sms-2")),
            store,
            GatewayConfig::default(),
        );

        let mut other = otp("654321", Some("ref-new"));
        other.recipient = "+254700000002".into();
        let sent = gateway.send_otp(&other).await.unwrap();
        assert!(sent.result.success);

        let verdict = gateway.verify_otp("123456", "ref-old").await.unwrap();
        assert_eq!(verdict.reason, Some(OtpRejection::Expired));
    }

    #[tokio::test]
    async fn test_failed_otp_is_not_recorded() {
        let mut store = MockOtpStore::new();
        store.expect_insert().never();
        let gateway = NotificationGateway::new(
            Arc::new(MockProvider::new()),
            Arc::new(MockProvider::failing("blocked number")),
            Arc::new(store),
            GatewayConfig::default(),
        );

        let sent = gateway.send_otp(&otp("123456", Some("ref-7"))).await.unwrap();
        assert!(!sent.result.success);
        assert_eq!(sent.reference_id, "ref-7");
        assert_eq!(sent.expires_at, 0);
    }

    #[tokio::test]
    async fn test_verify_handles_consume_race() {
        let mut store = MockOtpStore::new();
        store.expect_get().returning(|id| {
            Ok(Some(OtpRecord {
                reference_id: id.to_string(),
                recipient: "+1555".into(),
                purpose: OtpPurpose::General,
                code_digest: digest("4321"),
                expires_at: Utc::now() + chrono::Duration::minutes(5),
                consumed: false,
            }))
        });
        store.expect_mark_consumed().times(1).returning(|_| Ok(false));
        let gateway = NotificationGateway::new(
            Arc::new(MockProvider::new()),
            Arc::new(MockProvider::new()),
            Arc::new(store),
            GatewayConfig::default(),
        );

        let verdict = gateway.verify_otp("4321", "ref-1").await.unwrap();
        assert_eq!(verdict.reason, Some(OtpRejection::AlreadyUsed));
    }

    #[tokio::test]
    async fn test_verify_requires_inputs() {
        let gateway = gateway_with(Arc::new(MockProvider::new()), Arc::new(MockProvider::new()));
        assert!(matches!(
            gateway.verify_otp("", "ref").await,
            Err(GatewayError::InvalidArgument(_))
        ));
    }
}
