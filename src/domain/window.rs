//! Fixed suppression windows.
//!
//! A window opens when a notification fires and closes exactly one cooldown
//! later. Repeat triggers that land inside the window are swallowed and never
//! move its end: the window does not slide.

use std::time::{Duration, Instant};

/// Cooldown applied when none is configured.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(5000);

/// A half-open interval `[opened_at, expires_at)` during which an id is
/// suppressed.
///
/// # Example
/// ```
/// use toast_dedup::SuppressionWindow;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let window = SuppressionWindow::open(start, Duration::from_millis(5000));
///
/// assert!(window.is_active(start + Duration::from_millis(4999)));
/// assert!(!window.is_active(start + Duration::from_millis(5000)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuppressionWindow {
    opened_at: Instant,
    expires_at: Instant,
}

/// `now + delay`, clamped to the latest representable instant instead of
/// overflowing.
pub(crate) fn saturating_deadline(now: Instant, delay: Duration) -> Instant {
    if let Some(deadline) = now.checked_add(delay) {
        return deadline;
    }

    // Instant has no MAX; walk down from `delay` to the largest step that fits.
    let mut deadline = now;
    let mut step = delay;
    while !step.is_zero() {
        match deadline.checked_add(step) {
            Some(next) => deadline = next,
            None => step /= 2,
        }
    }
    deadline
}

impl SuppressionWindow {
    /// Open a window at `now` lasting `cooldown`.
    ///
    /// A cooldown reaching past the end of the clock's range closes at the
    /// latest representable instant.
    pub fn open(now: Instant, cooldown: Duration) -> Self {
        Self {
            opened_at: now,
            expires_at: saturating_deadline(now, cooldown),
        }
    }

    /// When the window opened.
    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }

    /// When the window closes.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Length of the window.
    pub fn cooldown(&self) -> Duration {
        self.expires_at.saturating_duration_since(self.opened_at)
    }

    /// Whether `now` falls inside the window.
    pub fn is_active(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    /// Time left until the window closes, zero once it has.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
