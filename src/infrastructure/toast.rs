//! Notification de-duplication facade.
//!
//! `ToastDeduplicator` is the handle UI code holds on to. It is cheap to clone;
//! clones share one suppression registry, so the same instance can be passed to
//! every call site that shows notifications.

use crate::application::{
    deduplicator::Deduplicator,
    metrics::Metrics,
    ports::{Clock, Scheduler},
    registry::{SuppressionEntry, SuppressionRegistry},
};
use crate::domain::{id::NotificationId, summary::SuppressionSummary, window::DEFAULT_COOLDOWN};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::storage::ShardedStorage;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Storage type backing a `ToastDeduplicator`.
pub type SharedStorage = Arc<ShardedStorage<NotificationId, SuppressionEntry>>;

/// Error returned when building a `ToastDeduplicator` fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Cooldown must be greater than zero
    ZeroCooldown,
    /// Cooldown reaches past the last instant the clock can represent
    CooldownTooLarge,
    /// No scheduler was configured and none could be derived from the environment
    NoScheduler,
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::ZeroCooldown => {
                write!(f, "cooldown must be greater than 0")
            }
            BuildError::CooldownTooLarge => {
                write!(f, "cooldown overflows the clock's time range")
            }
            BuildError::NoScheduler => {
                write!(
                    f,
                    "no scheduler configured and no Tokio runtime available"
                )
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Builder for constructing a `ToastDeduplicator`.
pub struct ToastDeduplicatorBuilder {
    cooldown: Duration,
    clock: Option<Arc<dyn Clock>>,
    scheduler: Option<Arc<dyn Scheduler>>,
    exempt_ids: BTreeSet<NotificationId>,
}

impl ToastDeduplicatorBuilder {
    /// Set how long a notification stays suppressed after it fires.
    ///
    /// Default: 5000 ms. The value will be validated when `build()` is called.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the scheduler that ends suppression windows.
    ///
    /// If not set, `build()` uses a `TokioScheduler` for the current runtime
    /// (feature `async`) and fails with `BuildError::NoScheduler` outside one.
    ///
    /// # Example
    ///
    /// ```
    /// # use toast_dedup::{DeferredQueue, SystemClock, ToastDeduplicator};
    /// # use std::sync::Arc;
    /// let queue = Arc::new(DeferredQueue::new(Arc::new(SystemClock::new())));
    /// let toasts = ToastDeduplicator::builder()
    ///     .with_scheduler(queue.clone())
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Exempt specific ids from de-duplication.
    ///
    /// Triggers for these ids always run their action and never touch the
    /// registry. Useful for notifications that must be shown every time, such
    /// as security prompts. Duplicates and empty ids are dropped.
    ///
    /// ```no_run
    /// # use toast_dedup::ToastDeduplicator;
    /// let toasts = ToastDeduplicator::builder()
    ///     .with_exempt_ids(["session-expired", "permission-denied"])
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn with_exempt_ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NotificationId>,
    {
        self.exempt_ids = ids
            .into_iter()
            .map(Into::into)
            .filter(|id: &NotificationId| !id.is_empty())
            .collect();
        self
    }

    /// Build the deduplicator.
    ///
    /// # Errors
    /// Returns `BuildError` if the configuration is invalid or no scheduler is
    /// available.
    pub fn build(self) -> Result<ToastDeduplicator, BuildError> {
        if self.cooldown.is_zero() {
            return Err(BuildError::ZeroCooldown);
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        if clock.now().checked_add(self.cooldown).is_none() {
            return Err(BuildError::CooldownTooLarge);
        }

        let scheduler = match self.scheduler {
            Some(scheduler) => scheduler,
            None => default_scheduler().ok_or(BuildError::NoScheduler)?,
        };

        Ok(ToastDeduplicator::from_parts(
            self.cooldown,
            clock,
            scheduler,
            self.exempt_ids,
        ))
    }
}

#[cfg(feature = "async")]
fn default_scheduler() -> Option<Arc<dyn Scheduler>> {
    crate::infrastructure::scheduler::TokioScheduler::current()
        .map(|scheduler| Arc::new(scheduler) as Arc<dyn Scheduler>)
}

#[cfg(not(feature = "async"))]
fn default_scheduler() -> Option<Arc<dyn Scheduler>> {
    None
}

/// Suppresses repeated notifications with the same id within a cooldown.
///
/// The first trigger for an id runs its action and opens a fixed window
/// (5000 ms by default). Further triggers for that id are dropped until the
/// window ends. Repeats never extend the window.
///
/// # Example
///
/// ```
/// # use toast_dedup::{DeferredQueue, SystemClock, ToastDeduplicator};
/// # use std::sync::Arc;
/// # let queue = Arc::new(DeferredQueue::new(Arc::new(SystemClock::new())));
/// let toasts = ToastDeduplicator::with_scheduler(queue);
/// let mut shown = 0;
///
/// toasts.trigger(|| shown += 1, "network-error");
/// toasts.trigger(|| shown += 1, "network-error");
/// assert_eq!(shown, 1);
///
/// // e.g. on logout
/// toasts.clear();
/// toasts.trigger(|| shown += 1, "network-error");
/// assert_eq!(shown, 2);
/// ```
#[derive(Clone)]
pub struct ToastDeduplicator {
    inner: Deduplicator<SharedStorage>,
    exempt_ids: Arc<BTreeSet<NotificationId>>,
}

impl ToastDeduplicator {
    /// Create a builder for configuring the deduplicator.
    pub fn builder() -> ToastDeduplicatorBuilder {
        ToastDeduplicatorBuilder {
            cooldown: DEFAULT_COOLDOWN,
            clock: None,
            scheduler: None,
            exempt_ids: BTreeSet::new(),
        }
    }

    /// Create a deduplicator with the default cooldown and system clock,
    /// expiring windows through `scheduler`.
    pub fn with_scheduler(scheduler: Arc<dyn Scheduler>) -> Self {
        Self::from_parts(
            DEFAULT_COOLDOWN,
            Arc::new(SystemClock::new()),
            scheduler,
            BTreeSet::new(),
        )
    }

    fn from_parts(
        cooldown: Duration,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        exempt_ids: BTreeSet<NotificationId>,
    ) -> Self {
        let storage = Arc::new(ShardedStorage::new());
        let registry = SuppressionRegistry::new(storage, clock, cooldown);

        Self {
            inner: Deduplicator::new(registry, scheduler, Metrics::new()),
            exempt_ids: Arc::new(exempt_ids),
        }
    }

    /// Run `action` unless a notification with the same `id` fired within the
    /// cooldown.
    ///
    /// The action runs synchronously on the calling thread. If it panics, the
    /// panic propagates and `id` stays suppressed until its window ends.
    pub fn trigger<F>(&self, action: F, id: impl Into<NotificationId>)
    where
        F: FnOnce(),
    {
        self.trigger_with(id, action);
    }

    /// Like [`trigger`](Self::trigger), returning the action's result, or
    /// `None` when the trigger was suppressed.
    pub fn trigger_with<R>(
        &self,
        id: impl Into<NotificationId>,
        action: impl FnOnce() -> R,
    ) -> Option<R> {
        let id = id.into();
        if self.exempt_ids.contains(&id) {
            self.inner.metrics().record_fired();
            return Some(action());
        }
        self.inner.trigger_with(id, action)
    }

    /// Forget every suppressed id, e.g. on logout or a navigation reset.
    ///
    /// Returns how many open windows were dropped. Expiries already scheduled
    /// are not cancelled; they become no-ops.
    pub fn clear(&self) -> usize {
        self.inner.clear()
    }

    /// Whether `id` is currently suppressed.
    pub fn is_suppressed(&self, id: impl Into<NotificationId>) -> bool {
        self.inner.registry().is_suppressed(&id.into())
    }

    /// Time left before `id` may fire again, `None` if it may fire now.
    pub fn remaining(&self, id: impl Into<NotificationId>) -> Option<Duration> {
        self.inner.registry().remaining(&id.into())
    }

    /// Number of ids currently suppressed.
    pub fn active_count(&self) -> usize {
        self.inner.registry().active_count()
    }

    /// Summaries of every open suppression window.
    pub fn summaries(&self) -> Vec<SuppressionSummary> {
        self.inner.registry().summaries()
    }

    /// Drop windows that have ended but whose expiry has not run yet.
    ///
    /// Only needed when the scheduler runs rarely or late, or when a
    /// `TokioScheduler`'s runtime has shut down and its expiries will never run.
    pub fn purge_expired(&self) -> usize {
        self.inner.purge_expired()
    }

    /// Whether `id` bypasses de-duplication.
    pub fn is_exempt(&self, id: impl Into<NotificationId>) -> bool {
        self.exempt_ids.contains(&id.into())
    }

    /// Get the configured cooldown.
    pub fn cooldown(&self) -> Duration {
        self.inner.registry().cooldown()
    }

    /// Get de-duplication metrics.
    pub fn metrics(&self) -> &Metrics {
        self.inner.metrics()
    }
}

impl std::fmt::Debug for ToastDeduplicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastDeduplicator")
            .field("cooldown", &self.cooldown())
            .field("active", &self.active_count())
            .field("exempt_ids", &self.exempt_ids)
            .finish()
    }
}
