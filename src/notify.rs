//! Notifications
//!
//! Observer seam for user-visible messages. The cart invokes the notifier on
//! state-changing operations and never waits on or inspects the outcome; how
//! a notice is surfaced (toast, log line, nothing) is the implementor's
//! business.

use std::sync::{Mutex, PoisonError};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Neutral state change.
    Info,

    /// An operation succeeded.
    Success,

    /// An operation was rejected or failed.
    Error,
}

/// Receiver for user-visible notices.
pub trait Notifier: Send + Sync {
    /// Deliver one notice. Must not block.
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// A notifier that discards every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _kind: NoticeKind, _message: &str) {}
}

/// A notifier that records every notice, for assertions in tests and for
/// callers that render notices after the fact.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice received so far, in delivery order.
    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Just the message texts, in delivery order.
    pub fn messages(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .map(|(_, message)| message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, message.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_delivery_order() {
        let notifier = RecordingNotifier::new();

        notifier.notify(NoticeKind::Success, "first");
        notifier.notify(NoticeKind::Error, "second");

        assert_eq!(
            notifier.notices(),
            vec![
                (NoticeKind::Success, "first".to_owned()),
                (NoticeKind::Error, "second".to_owned()),
            ]
        );
        assert_eq!(notifier.messages(), vec!["first", "second"]);
    }

    #[test]
    fn noop_notifier_accepts_notices() {
        NoopNotifier.notify(NoticeKind::Info, "ignored");
    }
}
