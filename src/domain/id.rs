//! Notification identifiers.
//!
//! A `NotificationId` is the caller-chosen key that distinguishes one kind
//! (or instance) of notification from another for de-duplication purposes.
//! Two triggers with equal ids are duplicates; everything else is independent.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Opaque string key for a notification.
///
/// Backed by an `Arc<str>` so the key can be cloned into scheduled expiry
/// tasks without copying the string.
///
/// Empty ids are accepted. They behave like any other key; validating them is
/// left to the caller.
///
/// # Example
/// ```
/// use toast_dedup::NotificationId;
///
/// let a = NotificationId::from("toast-1");
/// let b = NotificationId::new(String::from("toast-1"));
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "toast-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(Arc<str>);

impl NotificationId {
    /// Create an id from anything string-like.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(id: &str) -> Self {
        Self(Arc::from(id))
    }
}

impl From<String> for NotificationId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<&String> for NotificationId {
    fn from(id: &String) -> Self {
        Self(Arc::from(id.as_str()))
    }
}

impl From<Arc<str>> for NotificationId {
    fn from(id: Arc<str>) -> Self {
        Self(id)
    }
}

impl AsRef<str> for NotificationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NotificationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
