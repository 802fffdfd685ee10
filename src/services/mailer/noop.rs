use async_trait::async_trait;
use tracing::info;

use crate::services::mailer::{MailerError, OtpMailer};

/// Development mailer: logs instead of sending.
///
/// The OTP itself is deliberately not logged.
#[derive(Clone, Debug, Default)]
pub struct NoopMailer;

#[async_trait]
impl OtpMailer for NoopMailer {
    async fn send_otp(&self, to: &str, _full_name: &str, _otp: &str) -> Result<(), MailerError> {
        info!(to = %to, "otp email suppressed (no mail provider configured)");
        Ok(())
    }
}
