//! Notification de-duplication coordination logic.
//!
//! The deduplicator decides whether a triggered notification runs, schedules
//! the end of its suppression window and keeps metrics.

use crate::application::metrics::Metrics;
use crate::application::ports::{Scheduler, Storage};
use crate::application::registry::{Claim, SuppressionEntry, SuppressionRegistry};
use crate::domain::{id::NotificationId, summary::SuppressionSummary};
use std::sync::Arc;
use std::time::Duration;

/// Coordinates suppression decisions.
#[derive(Clone)]
pub struct Deduplicator<S>
where
    S: Storage<NotificationId, SuppressionEntry> + Clone,
{
    registry: SuppressionRegistry<S>,
    scheduler: Arc<dyn Scheduler>,
    metrics: Metrics,
}

impl<S> Deduplicator<S>
where
    S: Storage<NotificationId, SuppressionEntry> + Clone + 'static,
{
    /// Create a new deduplicator.
    ///
    /// # Arguments
    /// * `registry` - The suppression registry (which contains the clock and cooldown)
    /// * `scheduler` - Runs window expiries after the cooldown
    /// * `metrics` - Metrics tracker
    pub fn new(
        registry: SuppressionRegistry<S>,
        scheduler: Arc<dyn Scheduler>,
        metrics: Metrics,
    ) -> Self {
        Self {
            registry,
            scheduler,
            metrics,
        }
    }

    /// Run `action` unless `id` is inside an open suppression window.
    ///
    /// Returns the action's result, or `None` when the trigger was swallowed.
    ///
    /// The expiry is scheduled before `action` runs, so a panicking action
    /// still leaves `id` suppressed for exactly one cooldown. No registry lock
    /// is held while `action` runs.
    pub fn trigger_with<R>(&self, id: NotificationId, action: impl FnOnce() -> R) -> Option<R> {
        match self.registry.claim(id.clone()) {
            Claim::Granted {
                generation,
                window,
                stale,
            } => {
                if let Some(summary) = stale {
                    record_expiry(&self.metrics, &summary);
                }
                self.schedule_release(id.clone(), generation, window.cooldown());
                self.metrics.record_fired();
                tracing::trace!(id = %id, generation, "notification fired");
                Some(action())
            }
            Claim::Held {
                remaining,
                suppressed,
            } => {
                self.metrics.record_suppressed();
                tracing::debug!(
                    id = %id,
                    remaining_ms = remaining.as_millis() as u64,
                    suppressed,
                    "duplicate notification suppressed"
                );
                None
            }
        }
    }

    /// Run `action` unless `id` is inside an open suppression window.
    pub fn trigger(&self, id: NotificationId, action: impl FnOnce()) {
        self.trigger_with(id, action);
    }

    /// Drop every open window at once, returning how many there were.
    ///
    /// Windows that already closed by the clock are reported as expiries
    /// first. Scheduled expiries stay queued and become no-ops.
    pub fn clear(&self) -> usize {
        self.purge_expired();
        let dropped = self.registry.clear();
        self.metrics.record_cleared(dropped as u64);
        tracing::debug!(dropped, "suppression registry cleared");
        dropped
    }

    /// Drop windows that have closed by the clock but whose expiry has not
    /// run yet. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let expired = self.registry.purge_expired();
        for summary in &expired {
            record_expiry(&self.metrics, summary);
        }
        expired.len()
    }

    /// Get the suppression registry.
    pub fn registry(&self) -> &SuppressionRegistry<S> {
        &self.registry
    }

    /// Get the metrics tracker.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn schedule_release(&self, id: NotificationId, generation: u64, delay: Duration) {
        let registry = self.registry.clone();
        let metrics = self.metrics.clone();

        self.scheduler.schedule(
            delay,
            Box::new(move || match registry.release(&id, generation) {
                Some(summary) => record_expiry(&metrics, &summary),
                None => tracing::trace!(id = %id, generation, "expiry found no matching window"),
            }),
        );
    }
}

fn record_expiry(metrics: &Metrics, summary: &SuppressionSummary) {
    metrics.record_expired();
    if summary.has_suppressions() {
        tracing::debug!(
            id = %summary.id,
            suppressed = summary.suppressed,
            "{}",
            summary
        );
    } else {
        tracing::trace!(id = %summary.id, "suppression window expired");
    }
}
