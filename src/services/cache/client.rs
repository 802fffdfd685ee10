//! Cache client interface used by higher-level services (OTP storage).
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command/serialization).
///
/// Kept independent from `AppError` so callers can decide how to fail
/// (fail-closed for OTP verification, fail-open for metrics, etc.).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
}

/// A minimal cache interface.
///
/// This is intentionally small and string-based: OTP storage only needs
/// `SET EX` and `GETDEL`. Other features can add methods later, but keep the
/// surface area small.
///
/// Implementations must be cheap to clone (typically `Arc<...>` inside).
#[async_trait]
pub trait CacheClient: Clone + Send + Sync + 'static {
    // Set value with TTL, overwriting any previous value.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    // Get and delete in one step. Returns the value that was stored, if any.
    async fn get_del(&self, key: &str) -> CacheResult<Option<String>>;
}
