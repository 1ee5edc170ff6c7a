// ==================== MAIL RELAY CLIENT ====================
// Outbound mail goes through an HTTP relay (JSON API, bearer token).
// Credentials come from the environment; delivery itself is driven by the
// background queue in jobs/mail_queue.rs.

use crate::utils::error::AppError;
use serde::Serialize;
use std::env;

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[derive(Clone)]
pub struct MailerClient {
    http: reqwest::Client,
    relay_url: String,
    relay_token: String,
    from: String,
}

impl MailerClient {
    pub fn from_env() -> Result<Self, AppError> {
        let relay_url = env::var("MAIL_RELAY_URL")
            .map_err(|_| AppError::Mail("MAIL_RELAY_URL not configured".to_string()))?;
        let relay_token = env::var("MAIL_RELAY_TOKEN")
            .map_err(|_| AppError::Mail("MAIL_RELAY_TOKEN not configured".to_string()))?;
        let from = env::var("MAIL_FROM")
            .map_err(|_| AppError::Mail("MAIL_FROM not configured".to_string()))?;

        Ok(MailerClient {
            http: reqwest::Client::new(),
            relay_url,
            relay_token,
            from,
        })
    }

    /// Posts a single message to the relay. One attempt only - retry policy
    /// belongs to the queue worker.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let url = format!("{}/messages", self.relay_url.trim_end_matches('/'));

        let message = RelayMessage {
            from: &self.from,
            to,
            subject,
            text: body,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.relay_token)
            .json(&message)
            .send()
            .await
            .map_err(|e| AppError::Mail(format!("Failed to reach mail relay: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Mail(format!(
                "Mail relay error: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Builds the verification message for a freshly registered user.
pub fn verification_email(base_url: &str, token: &str) -> (String, String) {
    let subject = "Email Verification".to_string();
    let body = format!(
        "Please click on the following link to verify your email: {}/verify/{}",
        base_url.trim_end_matches('/'),
        token
    );
    (subject, body)
}

/// Base URL embedded in verification links.
pub fn public_base_url() -> String {
    env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_embeds_link() {
        let (subject, body) = verification_email("http://localhost:4000", "deadbeef");
        assert_eq!(subject, "Email Verification");
        assert!(body.contains("http://localhost:4000/verify/deadbeef"));
    }

    #[test]
    fn verification_email_handles_trailing_slash() {
        let (_, body) = verification_email("https://roomie.example.com/", "tok123");
        assert!(body.contains("https://roomie.example.com/verify/tok123"));
        assert!(!body.contains(".com//verify"));
    }
}
