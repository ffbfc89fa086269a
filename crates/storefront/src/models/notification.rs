//! User-facing notifications (toasts).
//!
//! Notifications raised while handling a request that ends in a redirect are
//! queued in the session and shown once on the next rendered page. HTMX
//! fragment responses render them directly instead.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session_keys;

/// Severity of a notification; selects its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    /// CSS class suffix for templates.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Queue a notification for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn push(
    session: &Session,
    notification: Notification,
) -> Result<(), tower_sessions::session::Error> {
    let mut queued: Vec<Notification> = session
        .get(session_keys::NOTIFICATIONS)
        .await?
        .unwrap_or_default();
    queued.push(notification);
    session.insert(session_keys::NOTIFICATIONS, queued).await
}

/// Take every queued notification, leaving the queue empty.
///
/// Session failures are logged and yield no notifications.
pub async fn take(session: &Session) -> Vec<Notification> {
    match session
        .remove::<Vec<Notification>>(session_keys::NOTIFICATIONS)
        .await
    {
        Ok(queued) => queued.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read notifications from session: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_push_then_take_drains_queue() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push(&session, Notification::success("Logged in")).await.unwrap();
        push(&session, Notification::warning("Item already in cart")).await.unwrap();

        let taken = take(&session).await;
        assert_eq!(
            taken,
            vec![
                Notification::success("Logged in"),
                Notification::warning("Item already in cart"),
            ]
        );
        assert!(take(&session).await.is_empty());
    }

    #[test]
    fn test_constructors_set_level() {
        assert_eq!(Notification::success("ok").level, Level::Success);
        assert_eq!(Notification::warning("careful").level, Level::Warning);
        assert_eq!(Notification::error("failed").level, Level::Error);
    }

    #[test]
    fn test_level_css_names() {
        assert_eq!(Level::Warning.as_str(), "warning");
        assert_eq!(Level::Info.as_str(), "info");
    }
}
