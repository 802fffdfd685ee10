use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;
use uuid::Uuid;

use crate::services::cache::CacheError;

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Storage for outstanding one-time passwords, keyed by user.
///
/// Only the SHA-256 hex digest of the code is ever stored, and `take`
/// consumes it: a code can be checked at most once.
///
/// Backend failures surface as `Err`; callers treat that as verification
/// failure (fail-closed).
#[async_trait]
pub trait OtpStore: Send + Sync {
    // Store the OTP hash for a user, replacing any outstanding code.
    async fn put(&self, user_id: Uuid, otp_hash: &str, ttl: Duration) -> Result<(), OtpError>;

    // Remove and return the stored hash, if one is still valid.
    async fn take(&self, user_id: Uuid) -> Result<Option<String>, OtpError>;
}

/// 6 decimal digits from OS randomness, zero-padded.
pub fn generate_otp() -> String {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes).expect("getrandom failed");

    let n = u32::from_le_bytes(bytes) % 1_000_000;
    format!("{:06}", n)
}

/// sha256(otp) -> lowercase hex. Codes are never stored in the clear.
pub fn hash_otp(otp: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(otp.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_is_six_decimal_digits() {
        for _ in 0..50 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn otp_hash_is_stable_hex() {
        let a = hash_otp("123456");
        let b = hash_otp("123456");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_otp("123457"));
    }
}
