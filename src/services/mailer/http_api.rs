use async_trait::async_trait;
use serde_json::json;

use crate::services::mailer::{MailerError, OtpMailer};

/// Mailer backed by an HTTP mail provider (Resend/SendGrid-style JSON API).
///
/// POST {api_url} with a bearer API key and a `{from, to, subject, text}`
/// body. Provider choice is a deployment detail; anything with this shape
/// works.
#[derive(Clone)]
pub struct HttpApiMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpApiMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            from,
        }
    }
}

impl std::fmt::Debug for HttpApiMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the API key
        f.debug_struct("HttpApiMailer")
            .field("api_url", &self.api_url)
            .field("from", &self.from)
            .finish()
    }
}

#[async_trait]
impl OtpMailer for HttpApiMailer {
    async fn send_otp(&self, to: &str, full_name: &str, otp: &str) -> Result<(), MailerError> {
        let body = json!({
            "from": self.from,
            "to": [to],
            "subject": "Your verification code",
            "text": format!(
                "Hi {full_name},\n\nYour one-time password is: {otp}\nIt expires in 10 minutes.\n"
            ),
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(MailerError::Rejected(format!("{status}: {detail}")));
        }

        Ok(())
    }
}
