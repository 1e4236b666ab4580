use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::mail::Mailer;

const QUEUE_CAPACITY: usize = 256;

/// A notification bound for a user's email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Verification { email: String, code: String },
    Welcome { email: String, name: String },
    PasswordReset { email: String, reset_url: String },
    ResetSuccess { email: String },
}

/// Handle for enqueueing notifications onto the background delivery task.
///
/// Handlers enqueue and move on; delivery latency never shows up in request
/// latency. A notification enqueued before the HTTP response is sent will be
/// delivered (or retried and logged) by the worker.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<Notification>,
}

impl Notifier {
    /// Spawn the delivery worker and return the enqueue handle.
    pub fn spawn(mailer: Arc<dyn Mailer>) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(deliver_loop(rx, mailer));
        Self { tx }
    }

    pub async fn dispatch(&self, notification: Notification) -> anyhow::Result<()> {
        self.tx
            .send(notification)
            .await
            .context("notification queue closed")
    }

    /// A notifier whose receiving end is handed to the test instead of a
    /// worker, so tests observe exactly what was enqueued.
    #[cfg(test)]
    pub(crate) fn test_pair() -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        (Self { tx }, rx)
    }
}

async fn deliver_loop(mut rx: mpsc::Receiver<Notification>, mailer: Arc<dyn Mailer>) {
    while let Some(notification) = rx.recv().await {
        if let Err(e) = deliver(&*mailer, &notification).await {
            warn!(error = %e, "email delivery failed, retrying once");
            if let Err(e) = deliver(&*mailer, &notification).await {
                error!(error = %e, "email delivery failed again, dropping notification");
            }
        }
    }
}

async fn deliver(mailer: &dyn Mailer, notification: &Notification) -> anyhow::Result<()> {
    match notification {
        Notification::Verification { email, code } => {
            mailer.send_verification_email(email, code).await
        }
        Notification::Welcome { email, name } => mailer.send_welcome_email(email, name).await,
        Notification::PasswordReset { email, reset_url } => {
            mailer.send_password_reset_email(email, reset_url).await
        }
        Notification::ResetSuccess { email } => mailer.send_reset_success_email(email).await,
    }
}
