//! Observability metrics for notification de-duplication.
//!
//! Provides counters describing how many notifications fired, how many
//! duplicates were swallowed and how suppression windows ended.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking de-duplication statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Notifications whose action ran
    notifications_fired: AtomicU64,
    /// Duplicate triggers dropped
    notifications_suppressed: AtomicU64,
    /// Windows that ran out (timer or sweep)
    windows_expired: AtomicU64,
    /// Windows dropped by an explicit clear
    windows_cleared: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                notifications_fired: AtomicU64::new(0),
                notifications_suppressed: AtomicU64::new(0),
                windows_expired: AtomicU64::new(0),
                windows_cleared: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_fired(&self) {
        self.inner
            .notifications_fired
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.inner
            .notifications_suppressed
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expired(&self) {
        self.inner.windows_expired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cleared(&self, count: u64) {
        self.inner
            .windows_cleared
            .fetch_add(count, Ordering::Relaxed);
    }

    /// Get the number of notifications whose action ran.
    pub fn notifications_fired(&self) -> u64 {
        self.inner.notifications_fired.load(Ordering::Relaxed)
    }

    /// Get the number of duplicate triggers dropped.
    pub fn notifications_suppressed(&self) -> u64 {
        self.inner.notifications_suppressed.load(Ordering::Relaxed)
    }

    /// Get the number of windows that ran out.
    pub fn windows_expired(&self) -> u64 {
        self.inner.windows_expired.load(Ordering::Relaxed)
    }

    /// Get the number of windows dropped by `clear()`.
    pub fn windows_cleared(&self) -> u64 {
        self.inner.windows_cleared.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            notifications_fired: self.notifications_fired(),
            notifications_suppressed: self.notifications_suppressed(),
            windows_expired: self.windows_expired(),
            windows_cleared: self.windows_cleared(),
        }
    }

}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Notifications whose action ran
    pub notifications_fired: u64,
    /// Duplicate triggers dropped
    pub notifications_suppressed: u64,
    /// Windows that ran out
    pub windows_expired: u64,
    /// Windows dropped by an explicit clear
    pub windows_cleared: u64,
}

impl MetricsSnapshot {
    /// Calculate the suppression rate (0.0 to 1.0).
    ///
    /// Returns the ratio of suppressed triggers to all triggers.
    /// Returns 0.0 if nothing has been triggered.
    pub fn suppression_rate(&self) -> f64 {
        let total = self.total_triggers();
        if total == 0 {
            0.0
        } else {
            self.notifications_suppressed as f64 / total as f64
        }
    }

    /// Get the total number of triggers (fired + suppressed).
    pub fn total_triggers(&self) -> u64 {
        self.notifications_fired
            .saturating_add(self.notifications_suppressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initial_state() {
        let metrics = Metrics::new();
        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                notifications_fired: 0,
                notifications_suppressed: 0,
                windows_expired: 0,
                windows_cleared: 0,
            }
        );
    }

    #[test]
    fn test_record_counters() {
        let metrics = Metrics::new();
        metrics.record_fired();
        metrics.record_fired();
        metrics.record_suppressed();
        metrics.record_expired();
        metrics.record_cleared(3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.notifications_fired, 2);
        assert_eq!(snapshot.notifications_suppressed, 1);
        assert_eq!(snapshot.windows_expired, 1);
        assert_eq!(snapshot.windows_cleared, 3);
    }

    #[test]
    fn test_snapshot_suppression_rate() {
        let metrics = Metrics::new();

        // Nothing triggered yet
        assert_eq!(metrics.snapshot().suppression_rate(), 0.0);

        metrics.record_fired();
        assert_eq!(metrics.snapshot().suppression_rate(), 0.0);

        metrics.record_suppressed();
        assert!((metrics.snapshot().suppression_rate() - 0.5).abs() < f64::EPSILON);

        metrics.record_suppressed();
        metrics.record_suppressed();
        assert!((metrics.snapshot().suppression_rate() - 0.75).abs() < f64::EPSILON);
        assert_eq!(metrics.snapshot().total_triggers(), 4);
    }

    #[test]
    fn test_metrics_clone_shares_counters() {
        let metrics1 = Metrics::new();
        metrics1.record_fired();

        let metrics2 = metrics1.clone();
        metrics2.record_fired();

        assert_eq!(metrics1.notifications_fired(), 2);
        assert_eq!(metrics2.notifications_fired(), 2);
    }

    #[test]
    fn test_concurrent_updates() {
        use std::thread;

        let metrics = Metrics::new();
        let mut handles = vec![];

        for _ in 0..10 {
            let m = metrics.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    m.record_fired();
                    m.record_suppressed();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.notifications_fired(), 1000);
        assert_eq!(metrics.notifications_suppressed(), 1000);
    }
}
