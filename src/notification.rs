//! Diagnostic notifications.
//!
//! Non-fatal issues encountered while building a document from templates (or
//! while decomposing one for writing) are reported as [`Notification`] items
//! rather than being silently dropped or causing hard errors. A single
//! [`Notifier`] is the only reporting channel of both directions: it records
//! every notification, mirrors it to `tracing`, and forwards it to an
//! optional user callback.
//!
//! After a build the collected notifications are available on
//! [`CadDocument::notifications`](crate::CadDocument::notifications).

use std::error::Error;
use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A record kind is recognised but has no resolution handler.
    NotImplemented,
    /// Non-fatal warning (e.g., missing handle, duplicate key).
    Warning,
    /// Error that was recovered from.
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single notification produced during building or writing.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The severity / category.
    pub notification_type: NotificationType,
    /// A human-readable description of the issue.
    pub message: String,
    /// Rendered underlying error, if the issue was caused by one.
    pub cause: Option<String>,
}

impl Notification {
    /// Create a new notification.
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the error that caused this notification.
    pub fn with_cause(mut self, cause: &dyn Error) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({})", cause)?;
        }
        Ok(())
    }
}

/// Collects notifications during a build/write operation.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification.
    pub fn push(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// Append every notification of another collection.
    pub fn extend(&mut self, other: NotificationCollection) {
        self.items.extend(other.items);
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// User callback invoked for every notification.
pub type NotificationHandler = Box<dyn FnMut(&Notification)>;

/// The diagnostic channel shared by the builder and the writer.
#[derive(Default)]
pub struct Notifier {
    collection: NotificationCollection,
    handler: Option<NotificationHandler>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the callback that receives every notification.
    pub fn set_handler(&mut self, handler: NotificationHandler) {
        self.handler = Some(handler);
    }

    /// Report an issue.
    pub fn notify(
        &mut self,
        notification_type: NotificationType,
        message: impl Into<String>,
        cause: Option<&dyn Error>,
    ) {
        let mut notification = Notification::new(notification_type, message);
        if let Some(cause) = cause {
            notification = notification.with_cause(cause);
        }

        match notification_type {
            NotificationType::NotImplemented => tracing::info!("{}", notification),
            NotificationType::Warning | NotificationType::Error => {
                tracing::warn!("{}", notification)
            }
        }

        if let Some(handler) = self.handler.as_mut() {
            handler(&notification);
        }
        self.collection.push(notification);
    }

    /// Notifications recorded so far.
    pub fn notifications(&self) -> &NotificationCollection {
        &self.collection
    }

    /// Take the recorded notifications, leaving the handler installed.
    pub fn take(&mut self) -> NotificationCollection {
        std::mem::take(&mut self.collection)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("collection", &self.collection)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notification_creation() {
        let n = Notification::new(NotificationType::Warning, "handle missing");
        assert_eq!(n.notification_type, NotificationType::Warning);
        assert_eq!(n.message, "handle missing");
        assert!(n.cause.is_none());
    }

    #[test]
    fn test_collection_basics() {
        let mut notifier = Notifier::new();
        notifier.notify(NotificationType::Warning, "w1", None);
        notifier.notify(NotificationType::Error, "e1", None);
        notifier.notify(NotificationType::Warning, "w2", None);

        let c = notifier.notifications();
        assert_eq!(c.len(), 3);
        assert_eq!(c.of_type(NotificationType::Warning).len(), 2);
        assert!(c.has_type(NotificationType::Error));
        assert!(!c.has_type(NotificationType::NotImplemented));
    }

    #[test]
    fn test_handler_receives_every_notification() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut notifier = Notifier::new();
        notifier.set_handler(Box::new(move |n| sink.borrow_mut().push(n.message.clone())));
        notifier.notify(NotificationType::NotImplemented, "ACAD_PROXY_OBJECT", None);
        notifier.notify(NotificationType::Warning, "layer not found", None);

        assert_eq!(*seen.borrow(), vec!["ACAD_PROXY_OBJECT", "layer not found"]);
        assert_eq!(notifier.take().len(), 2);
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_display_with_cause() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let n = Notification::new(NotificationType::Error, "sink failed").with_cause(&err);
        assert_eq!(format!("{}", n), "[Error] sink failed (boom)");
    }
}
