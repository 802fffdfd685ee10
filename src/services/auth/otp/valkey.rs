use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

use crate::services::auth::otp::store::{OtpError, OtpStore};
use crate::services::cache::{CacheClient, ValkeyClient};

/// Valkey-backed OTP store (Redis protocol).
///
/// TTL enforcement is delegated to the backend (`SET ... EX`); single use is
/// `GETDEL`.
#[derive(Clone)]
pub struct ValkeyOtpStore<C: CacheClient> {
    cache: Arc<C>,
    // Key prefix to avoid collisions across environments
    prefix: String,
}

impl ValkeyOtpStore<ValkeyClient> {
    pub async fn new(redis_url: &str) -> Result<Self, OtpError> {
        let client = ValkeyClient::new(redis_url).await?;

        Ok(Self {
            cache: Arc::new(client),
            prefix: "auth:otp".to_string(),
        })
    }
}

impl<C: CacheClient> ValkeyOtpStore<C> {
    fn key(&self, user_id: Uuid) -> String {
        format!("{}:{}", self.prefix, user_id)
    }
}

#[async_trait]
impl<C: CacheClient> OtpStore for ValkeyOtpStore<C> {
    async fn put(&self, user_id: Uuid, otp_hash: &str, ttl: Duration) -> Result<(), OtpError> {
        self.cache
            .set_with_ttl(&self.key(user_id), otp_hash, ttl)
            .await?;

        Ok(())
    }

    async fn take(&self, user_id: Uuid) -> Result<Option<String>, OtpError> {
        let stored = self.cache.get_del(&self.key(user_id)).await?;

        Ok(stored)
    }
}
