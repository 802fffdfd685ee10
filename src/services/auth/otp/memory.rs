use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::services::auth::otp::store::{OtpError, OtpStore};

/// In-process OTP store for development and tests.
///
/// Not suitable for multi-instance deployments; production wires the
/// Valkey-backed store instead (enforced at config time).
#[derive(Debug, Default)]
pub struct InMemoryOtpStore {
    entries: Mutex<HashMap<Uuid, (String, Instant)>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn put(&self, user_id: Uuid, otp_hash: &str, ttl: Duration) -> Result<(), OtpError> {
        let mut entries = self.entries.lock().expect("otp store lock poisoned");
        entries.insert(user_id, (otp_hash.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn take(&self, user_id: Uuid) -> Result<Option<String>, OtpError> {
        let mut entries = self.entries.lock().expect("otp store lock poisoned");

        match entries.remove(&user_id) {
            Some((hash, expires_at)) if Instant::now() < expires_at => Ok(Some(hash)),
            // Expired entries are dropped on access.
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn take_consumes_the_code() {
        let store = InMemoryOtpStore::new();
        let user_id = Uuid::new_v4();

        store
            .put(user_id, "abc123", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.take(user_id).await.unwrap().as_deref(), Some("abc123"));
        // Second take: already consumed.
        assert_eq!(store.take(user_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_code_is_gone() {
        let store = InMemoryOtpStore::new();
        let user_id = Uuid::new_v4();

        store
            .put(user_id, "abc123", Duration::from_secs(0))
            .await
            .unwrap();

        assert_eq!(store.take(user_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_outstanding_code() {
        let store = InMemoryOtpStore::new();
        let user_id = Uuid::new_v4();

        store
            .put(user_id, "first", Duration::from_secs(60))
            .await
            .unwrap();
        store
            .put(user_id, "second", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.take(user_id).await.unwrap().as_deref(), Some("second"));
    }
}
