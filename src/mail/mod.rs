use async_trait::async_trait;

pub mod dispatcher;
pub mod provider;
pub mod templates;

/// Outbound email capability. The auth core never talks to the provider
/// directly; it enqueues notifications that a background task delivers
/// through this trait.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_email(&self, to: &str, code: &str) -> anyhow::Result<()>;
    async fn send_welcome_email(&self, to: &str, name: &str) -> anyhow::Result<()>;
    async fn send_password_reset_email(&self, to: &str, reset_url: &str) -> anyhow::Result<()>;
    async fn send_reset_success_email(&self, to: &str) -> anyhow::Result<()>;
}
