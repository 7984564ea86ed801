// SPDX-License-Identifier: MIT

//! The [`Notifier`] capability and [`NotifyAction`], its matched-bundle
//! consumer.

use crate::error::ActionError;
use crate::formatter::Formatter;
use crate::Action;
use async_trait::async_trait;
use logtrap_core::Message;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification send failed: {0}")]
    SendFailed(String),
}

/// Sink for a formatted (title, body) notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Desktop notification sink using `notify-rust`.
///
/// On macOS, `notify-rust` uses `mac-notification-sys` to talk to the
/// Notification Center; the first call there runs an `NSAppleScript`
/// lookup for the bundle identifier, which blocks forever in a daemon
/// process without Automation permissions. We pre-set the identifier at
/// construction time so that lookup never happens.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = notify_rust::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let title = title.to_string();
        let body = body.to_string();

        tokio::task::spawn_blocking(move || match notify_rust::Notification::new().summary(&title).body(&body).show() {
            Ok(_) => {
                tracing::info!(%title, "desktop notification sent");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%title, error = %e, "desktop notification failed");
                Err(NotifyError::SendFailed(e.to_string()))
            }
        })
        .await
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?
    }
}

/// Formats a matched bundle into a title and body, then delegates to one
/// or more [`Notifier`] sinks.
///
/// The first message's rendering via `title_formatter` is the title; every
/// message rendered through `body_formatter` and concatenated is the
/// body. `0` in either max-size field means unlimited.
pub struct NotifyAction {
    title_formatter: Arc<dyn Formatter>,
    body_formatter: Arc<dyn Formatter>,
    max_title_size: usize,
    max_body_size: usize,
    services: Vec<Arc<dyn Notifier>>,
}

impl NotifyAction {
    pub fn new(title_formatter: Arc<dyn Formatter>, body_formatter: Arc<dyn Formatter>, max_title_size: usize, max_body_size: usize, services: Vec<Arc<dyn Notifier>>) -> Self {
        Self { title_formatter, body_formatter, max_title_size, max_body_size, services }
    }
}

fn truncate(text: String, max: usize) -> String {
    if max == 0 || text.chars().count() <= max {
        text
    } else {
        text.chars().take(max).collect()
    }
}

#[async_trait]
impl Action for NotifyAction {
    async fn perform(&self, messages: &[Message]) -> Result<(), ActionError> {
        let Some(first) = messages.first() else {
            return Err(ActionError::EmptyBundle);
        };

        let title = truncate(self.title_formatter.format(first)?, self.max_title_size);

        let mut body = String::new();
        for message in messages {
            body.push_str(&self.body_formatter.format(message)?);
        }
        let body = truncate(body, self.max_body_size);

        for service in &self.services {
            service.send(&title, &body).await?;
        }

        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::{Notifier, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Debug, Clone)]
    pub struct NotifyCall {
        pub title: String,
        pub body: String,
    }

    /// Records every call for assertions instead of touching a real
    /// notification transport.
    #[derive(Default)]
    pub struct FakeNotifier {
        calls: Mutex<Vec<NotifyCall>>,
    }

    impl FakeNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<NotifyCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError> {
            self.calls.lock().push(NotifyCall { title: title.to_string(), body: body.to_string() });
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
