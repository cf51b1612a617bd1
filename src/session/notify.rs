use std::time::Duration;

use crate::transform::placement::ImagePosition;

/// Severity of a user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Something the user asked for completed.
    Success,
    /// Something failed; the user may retry.
    Error,
}

/// A transient message for the user, shown for `duration`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text shown to the user.
    pub message: String,
    /// How long the message stays visible.
    pub duration: Duration,
}

impl Notification {
    /// A [`NotificationLevel::Success`] message shown for `duration_ms`.
    pub fn success(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            duration: Duration::from_millis(duration_ms),
        }
    }

    /// A [`NotificationLevel::Error`] message shown for `duration_ms`.
    pub fn error(message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            duration: Duration::from_millis(duration_ms),
        }
    }
}

/// Presents notifications (toasts in a UI, stderr lines in the CLI).
pub trait Notifier {
    /// Show one notification.
    fn notify(&mut self, notification: Notification);
}

impl<F: FnMut(Notification)> Notifier for F {
    fn notify(&mut self, notification: Notification) {
        self(notification)
    }
}

/// Keeps every notification it receives, in order.
#[derive(Clone, Debug, Default)]
pub struct NotificationLog {
    /// Everything received so far, oldest first.
    pub entries: Vec<Notification>,
}

impl NotificationLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the error notifications, in order.
    pub fn errors(&self) -> impl Iterator<Item = &Notification> {
        self.entries
            .iter()
            .filter(|n| n.level == NotificationLevel::Error)
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, notification: Notification) {
        self.entries.push(notification);
    }
}

/// Upstream owner of the persisted [`ImagePosition`]. Receives commits proposed by the preview.
pub trait PositionSink {
    /// Persist `next` as the committed position.
    fn on_position_update(&mut self, next: ImagePosition);
}

impl<F: FnMut(ImagePosition)> PositionSink for F {
    fn on_position_update(&mut self, next: ImagePosition) {
        self(next)
    }
}

/// Records every committed position; the last entry is the persisted one.
#[derive(Clone, Debug, Default)]
pub struct PositionLog {
    /// Every commit received, oldest first.
    pub updates: Vec<ImagePosition>,
}

impl PositionLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent commit, if any.
    pub fn latest(&self) -> Option<ImagePosition> {
        self.updates.last().copied()
    }
}

impl PositionSink for PositionLog {
    fn on_position_update(&mut self, next: ImagePosition) {
        self.updates.push(next);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/notify.rs"]
mod tests;
