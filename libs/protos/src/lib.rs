// Wires up the buf-generated protobuf code under libs/protos/src/generated.
// The prost files include!() their tonic counterparts.

pub mod email {
    pub mod v1 {
        include!("generated/email/v1/email.v1.rs");
    }
}

pub mod sms {
    pub mod v1 {
        include!("generated/sms/v1/sms.v1.rs");
    }
}
