//! Mock clock for testing.

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Mock clock for testing.
///
/// Time only moves when the test says so, which makes cooldown boundaries
/// (4999 ms vs 5000 ms) exact. Pair it with a `DeferredQueue` built on the same
/// clock so window checks and expiries agree.
///
/// # Examples
///
/// ```
/// use toast_dedup::infrastructure::mocks::MockClock;
/// use toast_dedup::{DeferredQueue, ToastDeduplicator};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = MockClock::starting_now();
/// let queue = Arc::new(DeferredQueue::new(Arc::new(clock.clone())));
/// let toasts = ToastDeduplicator::builder()
///     .with_clock(Arc::new(clock.clone()))
///     .with_scheduler(queue.clone())
///     .build()
///     .unwrap();
///
/// toasts.trigger(|| {}, "toast-1");
/// clock.advance_millis(4999);
/// assert!(toasts.is_suppressed("toast-1"));
///
/// clock.advance_millis(1);
/// queue.run_due();
/// assert!(!toasts.is_suppressed("toast-1"));
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying time value, so advancing time in
/// one clone affects all clones.
#[derive(Debug, Clone)]
pub struct MockClock {
    current_time: Arc<Mutex<Instant>>,
}

impl MockClock {
    /// Create a mock clock starting at a specific instant.
    pub fn new(start: Instant) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a mock clock frozen at the current instant.
    pub fn starting_now() -> Self {
        Self::new(Instant::now())
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let mut time = self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *time += duration;
    }

    /// Advance the clock by a number of milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self
            .current_time
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock() {
        let start = Instant::now();
        let clock = MockClock::new(start);

        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now(), start + Duration::from_secs(10));

        clock.advance_millis(250);
        assert_eq!(clock.now(), start + Duration::from_millis(10_250));
    }

    #[test]
    fn test_clones_share_time() {
        let clock = MockClock::starting_now();
        let start = clock.now();
        let clone = clock.clone();

        clone.advance_millis(5000);
        assert_eq!(clock.now(), start + Duration::from_millis(5000));
    }
}
