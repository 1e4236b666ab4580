use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::{
    config::MailConfig,
    mail::{templates, Mailer},
};

/// Mailer backed by an HTTP send API (Mailtrap-style JSON endpoint).
pub struct ApiMailer {
    http: reqwest::Client,
    api_url: String,
    api_token: String,
    from_email: String,
    from_name: String,
}

impl ApiMailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        }
    }

    async fn send(&self, to: &str, subject: &str, html: &str, category: &str) -> anyhow::Result<()> {
        let body = json!({
            "from": { "email": self.from_email, "name": self.from_name },
            "to": [{ "email": to }],
            "subject": subject,
            "html": html,
            "category": category,
        });

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .context("email provider request")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("email provider returned {status}: {text}");
        }

        debug!(%to, %category, "email accepted by provider");
        Ok(())
    }
}

#[async_trait]
impl Mailer for ApiMailer {
    async fn send_verification_email(&self, to: &str, code: &str) -> anyhow::Result<()> {
        self.send(
            to,
            "Verify your email",
            &templates::verification_email(code),
            "email_verification",
        )
        .await
    }

    async fn send_welcome_email(&self, to: &str, name: &str) -> anyhow::Result<()> {
        self.send(to, "Welcome", &templates::welcome_email(name), "welcome")
            .await
    }

    async fn send_password_reset_email(&self, to: &str, reset_url: &str) -> anyhow::Result<()> {
        self.send(
            to,
            "Reset your password",
            &templates::password_reset_email(reset_url),
            "password_reset",
        )
        .await
    }

    async fn send_reset_success_email(&self, to: &str) -> anyhow::Result<()> {
        self.send(
            to,
            "Password reset successful",
            &templates::reset_success_email(),
            "password_reset",
        )
        .await
    }
}
