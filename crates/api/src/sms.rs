//! Thin client for the external SMS gateway.
//!
//! Delivery failures never fail the calling request: the pending
//! verification code stays valid server-side, so the worst case is a user
//! who has to register again.

use std::time::Duration;

use serde_json::json;

/// Timeout for the gateway call; verification SMS is best-effort.
const SMS_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the `/sendsms` endpoint of the SMS gateway.
pub struct SmsClient {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl SmsClient {
    /// Create a client. `base_url = None` disables outbound SMS entirely
    /// (local development); the verification code is then only observable
    /// through logs.
    pub fn new(base_url: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(SMS_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            http,
        }
    }

    /// Send a verification code to a phone number.
    pub async fn send_verification(&self, phone: &str, code: &str) -> Result<(), reqwest::Error> {
        let Some(base) = &self.base_url else {
            tracing::debug!(%phone, %code, "SMS gateway not configured; skipping delivery");
            return Ok(());
        };

        let body = json!({
            "phone": phone,
            "message": format!("Your Imagia verification code is {code}"),
        });

        self.http
            .post(format!("{base}/sendsms"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(%phone, "Verification SMS dispatched");
        Ok(())
    }
}
