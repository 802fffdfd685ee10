//! Outbound mail seam.
//!
//! Delivery itself is an external concern (a hosted mail provider); the app
//! only needs "send this OTP to this address" behind a trait so the login
//! flow can run without a provider in development and in tests.

pub mod http_api;
pub mod noop;

use async_trait::async_trait;

pub use http_api::HttpApiMailer;
pub use noop::NoopMailer;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mail provider request failed: {0}")]
    Transport(String),
    #[error("mail provider rejected the message: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait OtpMailer: Send + Sync {
    // Send the verification code. Failures are reported to the caller but do
    // not abort the login flow (the response carries the email status).
    async fn send_otp(&self, to: &str, full_name: &str, otp: &str) -> Result<(), MailerError>;
}
