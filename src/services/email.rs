use reqwest::Client;
use std::time::Duration;

use crate::config::EmailConfig;
use crate::errors::{AppError, Result};

/// Outbound mail over an HTTP mail API.
///
/// Requests are bounded by the configured timeout; a timed-out or failed
/// dispatch surfaces to the caller, who decides what to do with the
/// already-persisted OTP.
#[derive(Clone)]
pub struct EmailService {
    api_url: String,
    api_key: String,
    from: String,
    client: Client,
}

impl EmailService {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
            client,
        })
    }

    pub async fn send_otp(&self, to: &str, code: &str) -> Result<()> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": to,
            "subject": "Your FOODMED OTP Code",
            "text": format!("Your OTP code is {}", code),
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::dispatch(format!("Mail API error: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::dispatch(format!(
                "Mail sending failed with status: {}",
                response.status()
            )))
        }
    }
}
