//! Suppression summaries.
//!
//! Each open window counts the repeats it swallowed. A summary is a snapshot of
//! that count together with the window bounds, used for diagnostics when the
//! window closes and for callers inspecting the registry.

use crate::domain::{id::NotificationId, window::SuppressionWindow};
use std::fmt;
use std::time::{Duration, Instant};

/// Repeats swallowed by one suppression window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionSummary {
    /// The suppressed notification
    pub id: NotificationId,
    /// Number of triggers swallowed after the first one fired
    pub suppressed: usize,
    /// When the notification fired and the window opened
    pub opened_at: Instant,
    /// When the window closes
    pub expires_at: Instant,
    /// Most recent swallowed trigger, if any
    pub last_suppressed: Option<Instant>,
}

impl SuppressionSummary {
    /// Build a summary for a window.
    pub fn new(
        id: NotificationId,
        window: &SuppressionWindow,
        suppressed: usize,
        last_suppressed: Option<Instant>,
    ) -> Self {
        Self {
            id,
            suppressed,
            opened_at: window.opened_at(),
            expires_at: window.expires_at(),
            last_suppressed,
        }
    }

    /// Length of the window.
    pub fn cooldown(&self) -> Duration {
        self.expires_at.saturating_duration_since(self.opened_at)
    }

    /// Whether any duplicate was swallowed.
    pub fn has_suppressions(&self) -> bool {
        self.suppressed > 0
    }

    /// Format the summary as a human-readable message.
    pub fn format_message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SuppressionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Notification `{}` suppressed {} times within {:?} cooldown",
            self.id,
            self.suppressed,
            self.cooldown()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::window::DEFAULT_COOLDOWN;

    #[test]
    fn test_summary_from_window() {
        let start = Instant::now();
        let window = SuppressionWindow::open(start, DEFAULT_COOLDOWN);
        let last = start + Duration::from_millis(300);

        let summary = SuppressionSummary::new("toast-1".into(), &window, 3, Some(last));

        assert_eq!(summary.id.as_str(), "toast-1");
        assert_eq!(summary.suppressed, 3);
        assert_eq!(summary.opened_at, start);
        assert_eq!(summary.expires_at, start + DEFAULT_COOLDOWN);
        assert_eq!(summary.last_suppressed, Some(last));
        assert_eq!(summary.cooldown(), DEFAULT_COOLDOWN);
        assert!(summary.has_suppressions());
    }

    #[test]
    fn test_summary_without_repeats() {
        let window = SuppressionWindow::open(Instant::now(), DEFAULT_COOLDOWN);
        let summary = SuppressionSummary::new("quiet".into(), &window, 0, None);

        assert!(!summary.has_suppressions());
        assert!(summary.last_suppressed.is_none());
    }

    #[test]
    fn test_summary_message() {
        let window = SuppressionWindow::open(Instant::now(), Duration::from_secs(5));
        let summary = SuppressionSummary::new("save-failed".into(), &window, 2, None);
        let message = summary.format_message();

        assert!(message.contains("`save-failed`"));
        assert!(message.contains("suppressed 2 times"));
        assert!(message.contains("5s"));
    }
}
