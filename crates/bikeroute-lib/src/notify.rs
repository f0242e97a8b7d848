//! Operational push notifications.
//!
//! Messages are posted as plain text to an ntfy-compatible server under a
//! topic, with the send time appended as an RFC 3339 timestamp. Topics are
//! optional: a [`Notifier`] without a topic for a given kind silently skips
//! that kind.

use std::fmt::Display;

use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};

/// Public ntfy server.
pub const DEFAULT_NOTIFY_URL: &str = "https://ntfy.sh";

/// Kind of notification, mapped to a topic by the [`Notifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Info,
}

/// A message ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub content: String,
}

impl Notification {
    /// `Error occurred: <err> | Context: <context>`
    pub fn error(err: impl Display, context: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            content: format!("Error occurred: {} | Context: {}", err, context),
        }
    }

    /// `Info: <info> | Context: <context>`
    pub fn info(info: impl Display, context: &str) -> Self {
        Self {
            kind: NotificationKind::Info,
            content: format!("Info: {} | Context: {}", info, context),
        }
    }

    /// Body as sent on the wire, stamped with the current time.
    pub fn body(&self) -> String {
        format!(
            "{}\nTime: {}",
            self.content,
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Delivers [`Notification`]s over HTTP.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Notifier {
    http: Client,
    base_url: String,
    error_topic: Option<String>,
    info_topic: Option<String>,
}

impl Notifier {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            error_topic: None,
            info_topic: None,
        }
    }

    /// A notifier with no topics; every send is a no-op.
    pub fn disabled() -> Self {
        Self::new(Client::new(), DEFAULT_NOTIFY_URL)
    }

    pub fn with_error_topic(mut self, topic: Option<String>) -> Self {
        self.error_topic = topic.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_info_topic(mut self, topic: Option<String>) -> Self {
        self.info_topic = topic.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn topic_for(&self, kind: NotificationKind) -> Option<&str> {
        match kind {
            NotificationKind::Error => self.error_topic.as_deref(),
            NotificationKind::Info => self.info_topic.as_deref(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.error_topic.is_some() || self.info_topic.is_some()
    }

    /// Post the notification; returns `Ok(false)` when its kind has no topic.
    pub async fn send(&self, notification: &Notification) -> Result<bool> {
        let Some(topic) = self.topic_for(notification.kind) else {
            return Ok(false);
        };

        let response = self
            .http
            .post(format!("{}/{}", self.base_url, topic))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(notification.body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NotificationRejected {
                topic: topic.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(topic, "notification delivered");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_format_matches_operations_convention() {
        let n = Notification::error("directions error: timeout", "Route Handler");
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(
            n.content,
            "Error occurred: directions error: timeout | Context: Route Handler"
        );
    }

    #[test]
    fn info_body_carries_timestamp() {
        let n = Notification::info("Route request processed", "Route Handler");
        let body = n.body();
        assert!(body.starts_with("Info: Route request processed | Context: Route Handler\nTime: "));
        assert!(body.ends_with('Z'));
    }

    #[test]
    fn blank_topics_disable_the_kind() {
        let notifier = Notifier::disabled()
            .with_error_topic(Some("  ".to_string()))
            .with_info_topic(Some("bike-router-info".to_string()));

        assert_eq!(notifier.topic_for(NotificationKind::Error), None);
        assert_eq!(notifier.topic_for(NotificationKind::Info), Some("bike-router-info"));
        assert!(notifier.is_enabled());
        assert!(!Notifier::disabled().is_enabled());
    }
}
