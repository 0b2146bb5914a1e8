//! One-time password records.
//!
//! Only a SHA-256 digest of a delivered code is kept. Verification compares
//! digests in constant time and consumes the record on success.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::OtpError;
use crate::models::OtpPurpose;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub reference_id: String,
    pub recipient: String,
    pub purpose: OtpPurpose,
    pub code_digest: [u8; 32],
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
}

impl OtpRecord {
    pub fn new(
        reference_id: impl Into<String>,
        recipient: impl Into<String>,
        purpose: OtpPurpose,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            reference_id: reference_id.into(),
            recipient: recipient.into(),
            purpose,
            code_digest: digest(code),
            expires_at,
            consumed: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn matches(&self, code: &str) -> bool {
        constant_time_eq(&self.code_digest, &digest(code))
    }
}

/// Storage for issued codes, keyed by reference id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store a record, replacing any previous one under the same reference id.
    async fn insert(&self, record: OtpRecord) -> Result<(), OtpError>;

    async fn get(&self, reference_id: &str) -> Result<Option<OtpRecord>, OtpError>;

    /// Atomically flag the record as used. Returns `false` when it was
    /// already consumed or no longer exists.
    async fn mark_consumed(&self, reference_id: &str) -> Result<bool, OtpError>;
}

/// Hours an expired record is kept so verification can still answer
/// `expired` instead of `not_found`.
pub const EXPIRED_RETENTION_HOURS: i64 = 24;

/// Process-local store. Records older than `expires_at + retention` are
/// pruned on insert.
pub struct InMemoryOtpStore {
    records: RwLock<HashMap<String, OtpRecord>>,
    retention: Duration,
}

impl Default for InMemoryOtpStore {
    fn default() -> Self {
        Self {
            records: RwLock::default(),
            retention: Duration::hours(EXPIRED_RETENTION_HOURS),
        }
    }
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn insert(&self, record: OtpRecord) -> Result<(), OtpError> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let horizon = now - self.retention;
        records.retain(|_, r| r.expires_at > horizon);
        records.insert(record.reference_id.clone(), record);
        Ok(())
    }

    async fn get(&self, reference_id: &str) -> Result<Option<OtpRecord>, OtpError> {
        Ok(self.records.read().await.get(reference_id).cloned())
    }

    async fn mark_consumed(&self, reference_id: &str) -> Result<bool, OtpError> {
        let mut records = self.records.write().await;
        match records.get_mut(reference_id) {
            Some(record) if !record.consumed => {
                record.consumed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

pub fn digest(code: &str) -> [u8; 32] {
    Sha256::digest(code.as_bytes()).into()
}

/// Equal-length comparison whose timing does not depend on where the inputs differ.
pub fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let diff = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    std::hint::black_box(diff) == 0
}
