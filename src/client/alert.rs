//! Transient status banner.

use crate::errors::Error;
use std::time::Duration;
use tokio::time::Instant;

/// How long a banner stays on screen.
pub const ALERT_DURATION: Duration = Duration::from_secs(3);

/// Banner styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Green banner with a check mark
    Success,
    /// Red banner with a cross
    Error,
}

/// A banner shown after an action, hidden again after [`ALERT_DURATION`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    kind: AlertKind,
    message: String,
    shown_at: Instant,
}

impl Alert {
    fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    /// A success banner.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Success, message)
    }

    /// An error banner.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Error, message)
    }

    /// An error banner for a failed request.
    ///
    /// Uses the server's message when the server answered, and `fallback` when
    /// the request never got an answer.
    #[must_use]
    pub fn from_failure(error: &Error, fallback: &str) -> Self {
        match error {
            Error::Api { message, .. } if !message.is_empty() => Self::error(message.clone()),
            _ => Self::error(fallback),
        }
    }

    /// Banner styling.
    #[must_use]
    pub const fn kind(&self) -> AlertKind {
        self.kind
    }

    /// Banner text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True until [`ALERT_DURATION`] has passed since the banner was shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.shown_at.elapsed() < ALERT_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_failure_prefers_server_message() {
        let err = Error::Api {
            status: 400,
            message: "Name and price are required".to_string(),
        };
        let alert = Alert::from_failure(&err, "Failed to save product");
        assert_eq!(alert.kind(), AlertKind::Error);
        assert_eq!(alert.message(), "Name and price are required");
    }

    #[test]
    fn test_from_failure_uses_fallback() {
        let err = Error::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(
            Alert::from_failure(&err, "Failed to save product").message(),
            "Failed to save product"
        );

        let err = Error::validation("boom");
        assert_eq!(
            Alert::from_failure(&err, "failed to load products").message(),
            "failed to load products"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_hides_after_three_seconds() {
        let alert = Alert::success("Product created successfully");
        assert!(alert.is_visible());

        tokio::time::advance(Duration::from_millis(2999)).await;
        assert!(alert.is_visible());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!alert.is_visible());
    }
}
