//! End-to-end tests: real tonic server on an ephemeral port, generated clients.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use notification_gateway::{
    EmailServiceImpl, GatewayConfig, InMemoryOtpStore, MockProvider, NotificationGateway,
    ProviderError, SmsServiceImpl,
};
use protos::email::v1::email_service_client::EmailServiceClient;
use protos::email::v1::email_service_server::EmailServiceServer;
use protos::email::v1::{
    SendEmailRequest, SendPasswordResetEmailRequest, SendTemplateEmailRequest,
    SendTransactionNotificationRequest, SendVerificationEmailRequest, SendWelcomeEmailRequest,
};
use protos::sms::v1::sms_service_client::SmsServiceClient;
use protos::sms::v1::sms_service_server::SmsServiceServer;
use protos::sms::v1::{
    OtpPurpose, SendBulkSmsRequest, SendOtpRequest, SendSmsRequest, SendTransactionAlertRequest,
    VerifyOtpRequest,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::Code;
use tonic::transport::{Channel, Server};

struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start(email: Arc<MockProvider>, sms: Arc<MockProvider>) -> Self {
        let gateway = Arc::new(NotificationGateway::new(
            email,
            sms,
            Arc::new(InMemoryOtpStore::new()),
            GatewayConfig::default(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let handle = tokio::spawn(async move {
            Server::builder()
                .add_service(EmailServiceServer::new(EmailServiceImpl::new(gateway.clone())))
                .add_service(SmsServiceServer::new(SmsServiceImpl::new(gateway)))
                .serve_with_incoming(TcpListenerStream::new(listener))
                .await
                .expect("Test server failed");
        });

        Self { addr, handle }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    async fn email_client(&self) -> EmailServiceClient<Channel> {
        EmailServiceClient::connect(self.url())
            .await
            .expect("Failed to connect email client")
    }

    async fn sms_client(&self) -> SmsServiceClient<Channel> {
        SmsServiceClient::connect(self.url())
            .await
            .expect("Failed to connect sms client")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

mod email_tests {
    use super::*;

    #[tokio::test]
    async fn test_verification_email_is_sent() {
        let email = Arc::new(MockProvider::returning_id("msg_001"));
        let server = TestServer::start(email.clone(), Arc::new(MockProvider::new())).await;
        let mut client = server.email_client().await;

        let response = client
            .send_verification_email(SendVerificationEmailRequest {
                to: "user@example.com".into(),
                verification_token: "abc123".into(),
                user_name: "John Doe".into(),
                verification_url: String::new(),
            })
            .await
            .expect("RPC failed")
            .into_inner();

        assert!(response.success);
        assert_eq!(response.message_id, "msg_001");
        assert_eq!(response.status, "sent");
        assert!(response.error.is_empty());
        assert!(response.timestamp > 0);

        let calls = email.calls().await;
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            notification_gateway::ProviderCall::SendTemplate {
                template_id,
                variables,
                ..
            } => {
                assert_eq!(template_id, "verification-email");
                assert_eq!(
                    variables["verification_url"],
                    "https://app.cloud9.money/verify?token=abc123"
                );
            }
            other => panic!("unexpected provider call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_recipient_makes_no_provider_call() {
        let email = Arc::new(MockProvider::new());
        let server = TestServer::start(email.clone(), Arc::new(MockProvider::new())).await;
        let mut client = server.email_client().await;

        let status = client
            .send_email(SendEmailRequest {
                to: String::new(),
                subject: "x".into(),
                html_body: "y".into(),
                text_body: String::new(),
            })
            .await
            .expect_err("empty recipient must be rejected");

        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(email.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_provider_error_is_shaped() {
        let email = Arc::new(MockProvider::failing("quota exceeded"));
        let server = TestServer::start(email, Arc::new(MockProvider::new())).await;
        let mut client = server.email_client().await;

        let mut variables = HashMap::new();
        variables.insert("user_name".to_string(), "Ann".to_string());

        let response = client
            .send_template_email(SendTemplateEmailRequest {
                to: "a@b.com".into(),
                template_id: "welcome-email".into(),
                variables,
            })
            .await
            .expect("business failures are not RPC errors")
            .into_inner();

        assert!(!response.success);
        assert_eq!(response.error, "quota exceeded");
        assert_eq!(response.status, "failed");
        assert!(response.message_id.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_unavailable() {
        let email = Arc::new(MockProvider::unavailable("connection refused"));
        let server = TestServer::start(email, Arc::new(MockProvider::new())).await;
        let mut client = server.email_client().await;

        let status = client
            .send_welcome_email(SendWelcomeEmailRequest {
                to: "a@b.com".into(),
                user_name: "Ann".into(),
                account_type: "business".into(),
            })
            .await
            .expect_err("outage must surface as a status");

        assert_eq!(status.code(), Code::Unavailable);
    }

    #[tokio::test]
    async fn test_concurrent_calls_do_not_cross_talk() {
        // Odd-numbered recipients fail, even ones succeed with an id derived
        // from the recipient.
        let email = Arc::new(MockProvider::with_responder(|call| {
            let to = call.recipient();
            let n: usize = to
                .trim_start_matches("user")
                .trim_end_matches("@example.com")
                .parse()
                .map_err(|_| ProviderError::Rejected(format!("bad recipient {to}")))?;
            if n % 2 == 0 {
                Ok(format!("id-{n}"))
            } else {
                Err(ProviderError::Rejected(format!("rejected {n}")))
            }
        }));
        let server = TestServer::start(email.clone(), Arc::new(MockProvider::new())).await;
        let client = server.email_client().await;

        let calls = (0..32).map(|n| {
            let mut client = client.clone();
            tokio::spawn(async move {
                let response = client
                    .send_email(SendEmailRequest {
                        to: format!("user{n}@example.com"),
                        subject: "Hello".into(),
                        html_body: String::new(),
                        text_body: format!("body {n}"),
                    })
                    .await
                    .expect("RPC failed")
                    .into_inner();
                (n, response)
            })
        });

        for handle in calls.collect::<Vec<_>>() {
            let (n, response) = handle.await.expect("task panicked");
            if n % 2 == 0 {
                assert!(response.success);
                assert_eq!(response.message_id, format!("id-{n}"));
            } else {
                assert!(!response.success);
                assert_eq!(response.error, format!("rejected {n}"));
            }
        }

        assert_eq!(email.call_count().await, 32);
    }
}

mod sms_tests {
    use super::*;

    #[tokio::test]
    async fn test_otp_send_and_verify() {
        let sms = Arc::new(MockProvider::returning_id("SM123"));
        let server = TestServer::start(Arc::new(MockProvider::new()), sms.clone()).await;
        let mut client = server.sms_client().await;

        let sent = client
            .send_otp(SendOtpRequest {
                phone_number: "+254700000001".into(),
                code: "482913".into(),
                expiry_minutes: 5,
                purpose: OtpPurpose::Login as i32,
                reference_id: String::new(),
                jurisdiction: String::new(),
            })
            .await
            .expect("RPC failed")
            .into_inner();

        let result = sent.result.expect("result must be set");
        assert!(result.success);
        assert_eq!(result.message_id, "SM123");
        assert!(!sent.reference_id.is_empty());
        assert!(sent.expires_at > result.timestamp);

        let verdict = client
            .verify_otp(VerifyOtpRequest {
                code: "482913".into(),
                reference_id: sent.reference_id.clone(),
            })
            .await
            .expect("RPC failed")
            .into_inner();
        assert!(verdict.valid);
        assert!(verdict.reason.is_empty());

        let replay = client
            .verify_otp(VerifyOtpRequest {
                code: "482913".into(),
                reference_id: sent.reference_id,
            })
            .await
            .expect("RPC failed")
            .into_inner();
        assert!(!replay.valid);
        assert_eq!(replay.reason, "already_used");
    }

    #[tokio::test]
    async fn test_verify_requires_reference() {
        let server = TestServer::start(Arc::new(MockProvider::new()), Arc::new(MockProvider::new())).await;
        let mut client = server.sms_client().await;

        let status = client
            .verify_otp(VerifyOtpRequest {
                code: "1234".into(),
                reference_id: String::new(),
            })
            .await
            .expect_err("reference id is required");
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_bulk_sms_counts() {
        let sms = Arc::new(MockProvider::with_responder(|call| {
            if call.recipient() == "+254700000002" {
                Err(ProviderError::Rejected("unreachable handset".into()))
            } else {
                Ok(format!("SM-{}", call.recipient()))
            }
        }));
        let server = TestServer::start(Arc::new(MockProvider::new()), sms.clone()).await;
        let mut client = server.sms_client().await;

        let response = client
            .send_bulk_sms(SendBulkSmsRequest {
                phone_numbers: vec![
                    "+254700000001".into(),
                    "+254700000002".into(),
                    "+254700000003".into(),
                ],
                message: "Scheduled maintenance at 02:00".into(),
                jurisdiction: "KE".into(),
            })
            .await
            .expect("RPC failed")
            .into_inner();

        assert_eq!(response.sent_count, 2);
        assert_eq!(response.failed_count, 1);
        assert_eq!(response.results.len(), 3);
        assert_eq!(response.results[1].error, "unreachable handset");
        assert_eq!(sms.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_empty_bulk_is_rejected() {
        let sms = Arc::new(MockProvider::new());
        let server = TestServer::start(Arc::new(MockProvider::new()), sms.clone()).await;
        let mut client = server.sms_client().await;

        let status = client
            .send_bulk_sms(SendBulkSmsRequest {
                phone_numbers: vec![],
                message: "hi".into(),
                jurisdiction: String::new(),
            })
            .await
            .expect_err("empty batch must be rejected");
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(sms.call_count().await, 0);
    }
}

/// Every RPC rejects an empty recipient before reaching a provider.
mod missing_recipient_tests {
    use super::*;

    async fn start() -> (TestServer, Arc<MockProvider>, Arc<MockProvider>) {
        let email = Arc::new(MockProvider::new());
        let sms = Arc::new(MockProvider::new());
        let server = TestServer::start(email.clone(), sms.clone()).await;
        (server, email, sms)
    }

    fn assert_invalid<T: std::fmt::Debug>(result: Result<T, tonic::Status>) {
        let status = result.expect_err("empty recipient must be rejected");
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_email_operations() {
        let (server, email, _) = start().await;
        let mut client = server.email_client().await;

        assert_invalid(
            client
                .send_email(SendEmailRequest {
                    subject: "s".into(),
                    html_body: "h".into(),
                    ..Default::default()
                })
                .await,
        );
        assert_invalid(
            client
                .send_template_email(SendTemplateEmailRequest {
                    template_id: "welcome-email".into(),
                    ..Default::default()
                })
                .await,
        );
        assert_invalid(
            client
                .send_verification_email(SendVerificationEmailRequest {
                    verification_token: "t".into(),
                    ..Default::default()
                })
                .await,
        );
        assert_invalid(
            client
                .send_password_reset_email(SendPasswordResetEmailRequest {
                    reset_token: "t".into(),
                    ..Default::default()
                })
                .await,
        );
        assert_invalid(
            client
                .send_welcome_email(SendWelcomeEmailRequest::default())
                .await,
        );
        assert_invalid(
            client
                .send_transaction_notification(SendTransactionNotificationRequest {
                    transaction_id: "tx-1".into(),
                    ..Default::default()
                })
                .await,
        );

        assert_eq!(email.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_sms_operations() {
        let (server, _, sms) = start().await;
        let mut client = server.sms_client().await;

        assert_invalid(
            client
                .send_sms(SendSmsRequest {
                    message: "m".into(),
                    ..Default::default()
                })
                .await,
        );
        assert_invalid(
            client
                .send_otp(SendOtpRequest {
                    code: "1234".into(),
                    ..Default::default()
                })
                .await,
        );
        assert_invalid(
            client
                .send_transaction_alert(SendTransactionAlertRequest {
                    transaction_id: "tx-1".into(),
                    ..Default::default()
                })
                .await,
        );
        assert_invalid(
            client
                .send_bulk_sms(SendBulkSmsRequest {
                    phone_numbers: vec![String::new()],
                    message: "m".into(),
                    ..Default::default()
                })
                .await,
        );

        assert_eq!(sms.call_count().await, 0);
    }
}
