// @generated
// This file is @generated by prost-build.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendSmsRequest {
    #[prost(string, tag = "1")]
    pub phone_number: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub jurisdiction: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendOtpRequest {
    #[prost(string, tag = "1")]
    pub phone_number: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub code: ::prost::alloc::string::String,
    #[prost(int32, tag = "3")]
    pub expiry_minutes: i32,
    #[prost(enumeration = "OtpPurpose", tag = "4")]
    pub purpose: i32,
    #[prost(string, tag = "5")]
    pub reference_id: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub jurisdiction: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendTransactionAlertRequest {
    #[prost(string, tag = "1")]
    pub phone_number: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub transaction_id: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub transaction_type: ::prost::alloc::string::String,
    #[prost(double, tag = "4")]
    pub amount: f64,
    #[prost(string, tag = "5")]
    pub currency: ::prost::alloc::string::String,
    #[prost(double, tag = "6")]
    pub balance: f64,
    #[prost(string, tag = "7")]
    pub jurisdiction: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendBulkSmsRequest {
    #[prost(string, repeated, tag = "1")]
    pub phone_numbers: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub jurisdiction: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct VerifyOtpRequest {
    #[prost(string, tag = "1")]
    pub code: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub reference_id: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendSmsResponse {
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
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendOtpResponse {
    #[prost(message, optional, tag = "1")]
    pub result: ::core::option::Option<SendSmsResponse>,
    #[prost(string, tag = "2")]
    pub reference_id: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub expires_at: i64,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SendBulkSmsResponse {
    #[prost(message, repeated, tag = "1")]
    pub results: ::prost::alloc::vec::Vec<SendSmsResponse>,
    #[prost(int32, tag = "2")]
    pub sent_count: i32,
    #[prost(int32, tag = "3")]
    pub failed_count: i32,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct VerifyOtpResponse {
    #[prost(bool, tag = "1")]
    pub valid: bool,
    #[prost(string, tag = "2")]
    pub reason: ::prost::alloc::string::String,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum OtpPurpose {
    Unspecified = 0,
    Login = 1,
    Registration = 2,
    Transaction = 3,
    PasswordReset = 4,
}
impl OtpPurpose {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "OTP_PURPOSE_UNSPECIFIED",
            Self::Login => "OTP_PURPOSE_LOGIN",
            Self::Registration => "OTP_PURPOSE_REGISTRATION",
            Self::Transaction => "OTP_PURPOSE_TRANSACTION",
            Self::PasswordReset => "OTP_PURPOSE_PASSWORD_RESET",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "OTP_PURPOSE_UNSPECIFIED" => Some(Self::Unspecified),
            "OTP_PURPOSE_LOGIN" => Some(Self::Login),
            "OTP_PURPOSE_REGISTRATION" => Some(Self::Registration),
            "OTP_PURPOSE_TRANSACTION" => Some(Self::Transaction),
            "OTP_PURPOSE_PASSWORD_RESET" => Some(Self::PasswordReset),
            _ => None,
        }
    }
}
include!("sms.v1.tonic.rs");
// @@protoc_insertion_point(module)
