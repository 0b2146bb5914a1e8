// @generated
// This file is @generated by prost-build.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendEmailRequest {
    #[prost(string, tag = "1")]
    pub to: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub subject: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub html_body: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub text_body: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct SendTemplateEmailRequest {
    #[prost(string, tag = "1")]
    pub to: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub template_id: ::prost::alloc::string::String,
    #[prost(map = "string, string", tag = "3")]
    pub variables: ::std::collections::HashMap<
        ::prost::alloc::string::String,
        ::prost::alloc::string::String,
    >,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendVerificationEmailRequest {
    #[prost(string, tag = "1")]
    pub to: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub verification_token: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub user_name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub verification_url: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendPasswordResetEmailRequest {
    #[prost(string, tag = "1")]
    pub to: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub reset_token: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub user_name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub reset_url: ::prost::alloc::string::String,
    #[prost(int32, tag = "5")]
    pub expiry_minutes: i32,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendWelcomeEmailRequest {
    #[prost(string, tag = "1")]
    pub to: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub user_name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub account_type: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendTransactionNotificationRequest {
    #[prost(string, tag = "1")]
    pub to: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub transaction_id: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub transaction_type: ::prost::alloc::string::String,
    #[prost(double, tag = "4")]
    pub amount: f64,
    #[prost(string, tag = "5")]
    pub currency: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub recipient_name: ::prost::alloc::string::String,
    #[prost(string, tag = "7")]
    pub timestamp: ::prost::alloc::string::String,
    #[prost(double, tag = "8")]
    pub balance: f64,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendEmailResponse {
    #[prost(string, tag = "1")]
    pub message_id: ::prost::alloc::string::String,
    #[prost(bool, tag = "2")]
    pub success: bool,
    #[prost(string, tag = "3")]
    pub error: ::prost::alloc::string::String,
    /// "sent" or "failed", always consistent with success.
    #[prost(string, tag = "4")]
    pub status: ::prost::alloc::string::String,
    #[prost(int64, tag = "5")]
    pub timestamp: i64,
}
include!("email.v1.tonic.rs");
// @@protoc_insertion_point(module)
