//! Central registry for tracking notification suppression state.
//!
//! The registry maps each currently suppressed notification id to the window
//! it is suppressed for. Ids enter the registry when a claim is granted and
//! leave it when their expiry runs, when a sweep finds them expired, or when
//! the registry is cleared.

use crate::application::ports::{Clock, Storage};
use crate::domain::{
    id::NotificationId, summary::SuppressionSummary, window::SuppressionWindow,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// State tracked for each suppressed notification id.
#[derive(Debug, Clone)]
pub struct SuppressionEntry {
    /// The window the id is suppressed for
    pub window: SuppressionWindow,
    /// Identifies the claim that opened the window
    pub generation: u64,
    /// Triggers swallowed since the window opened
    pub suppressed: usize,
    /// Most recent swallowed trigger
    pub last_suppressed: Option<Instant>,
}

impl SuppressionEntry {
    /// Open a fresh entry at `now`.
    pub fn open(now: Instant, cooldown: Duration, generation: u64) -> Self {
        Self {
            window: SuppressionWindow::open(now, cooldown),
            generation,
            suppressed: 0,
            last_suppressed: None,
        }
    }

    /// Record a swallowed trigger.
    pub fn record_suppression(&mut self, now: Instant) {
        self.suppressed = self.suppressed.saturating_add(1);
        self.last_suppressed = Some(now);
    }

    /// Summarize this entry for `id`.
    pub fn summary(&self, id: NotificationId) -> SuppressionSummary {
        SuppressionSummary::new(id, &self.window, self.suppressed, self.last_suppressed)
    }
}

/// Outcome of asking the registry to suppress an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The id was not suppressed. A window is now open for it and the caller
    /// should fire the notification.
    Granted {
        /// Generation of the new window, needed to release it later
        generation: u64,
        /// The newly opened window
        window: SuppressionWindow,
        /// A window for the same id that had already run out by the clock but
        /// whose expiry had not been processed yet
        stale: Option<SuppressionSummary>,
    },
    /// The id is inside an open window. The trigger was counted and must be
    /// dropped.
    Held {
        /// Time until the open window closes
        remaining: Duration,
        /// Total triggers swallowed by the open window, this one included
        suppressed: usize,
    },
}

impl Claim {
    /// Whether the claim was granted.
    pub fn is_granted(&self) -> bool {
        matches!(self, Claim::Granted { .. })
    }
}

/// Registry managing all notification suppression state.
///
/// Uses the Storage port for concurrent access.
///
/// This type is generic over the storage implementation, allowing different
/// storage backends to be used. In production, use `Arc<ShardedStorage>`.
#[derive(Clone)]
pub struct SuppressionRegistry<S>
where
    S: Storage<NotificationId, SuppressionEntry> + Clone,
{
    storage: S,
    clock: Arc<dyn Clock>,
    cooldown: Duration,
    generations: Arc<AtomicU64>,
}

impl<S> SuppressionRegistry<S>
where
    S: Storage<NotificationId, SuppressionEntry> + Clone,
{
    /// Create a new registry with storage, clock and the cooldown every window
    /// lasts for.
    pub fn new(storage: S, clock: Arc<dyn Clock>, cooldown: Duration) -> Self {
        Self {
            storage,
            clock,
            cooldown,
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Try to open a suppression window for `id`.
    ///
    /// Grants the claim when `id` is absent, or present with a window that has
    /// already closed by the clock. Otherwise the existing window is left
    /// untouched apart from its suppression count.
    pub fn claim(&self, id: NotificationId) -> Claim {
        let now = self.clock.now();
        let cooldown = self.cooldown;
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let key = id.clone();

        self.storage.with_entry_mut(
            key,
            || SuppressionEntry::open(now, cooldown, generation),
            |entry| {
                if entry.generation == generation {
                    return Claim::Granted {
                        generation,
                        window: entry.window,
                        stale: None,
                    };
                }

                if !entry.window.is_active(now) {
                    let stale = entry.summary(id);
                    *entry = SuppressionEntry::open(now, cooldown, generation);
                    return Claim::Granted {
                        generation,
                        window: entry.window,
                        stale: Some(stale),
                    };
                }

                entry.record_suppression(now);
                Claim::Held {
                    remaining: entry.window.remaining(now),
                    suppressed: entry.suppressed,
                }
            },
        )
    }

    /// Close the window opened by claim `generation` for `id`.
    ///
    /// A no-op when the id is absent or has since been reclaimed under a
    /// newer generation.
    pub fn release(&self, id: &NotificationId, generation: u64) -> Option<SuppressionSummary> {
        self.storage
            .remove_if(id, |entry| entry.generation == generation)
            .map(|entry| entry.summary(id.clone()))
    }

    /// Whether `id` is inside an open window.
    pub fn is_suppressed(&self, id: &NotificationId) -> bool {
        let now = self.clock.now();
        self.storage
            .with_entry(id, |entry| entry.window.is_active(now))
            .unwrap_or(false)
    }

    /// Time left in the open window for `id`.
    pub fn remaining(&self, id: &NotificationId) -> Option<Duration> {
        let now = self.clock.now();
        self.storage
            .with_entry(id, |entry| {
                entry
                    .window
                    .is_active(now)
                    .then(|| entry.window.remaining(now))
            })
            .flatten()
    }

    /// Summaries of every open window.
    pub fn summaries(&self) -> Vec<SuppressionSummary> {
        let now = self.clock.now();
        let mut summaries = Vec::new();
        self.storage.for_each(|id, entry| {
            if entry.window.is_active(now) {
                summaries.push(entry.summary(id.clone()));
            }
        });
        summaries
    }

    /// Number of ids inside an open window.
    pub fn active_count(&self) -> usize {
        let now = self.clock.now();
        let mut count = 0;
        self.storage.for_each(|_, entry| {
            if entry.window.is_active(now) {
                count += 1;
            }
        });
        count
    }

    /// Drop every entry whose window has closed by the clock.
    pub fn purge_expired(&self) -> Vec<SuppressionSummary> {
        let now = self.clock.now();
        let mut expired = Vec::new();
        self.storage.retain(|id, entry| {
            let keep = entry.window.is_active(now);
            if !keep {
                expired.push(entry.summary(id.clone()));
            }
            keep
        });
        expired
    }

    /// Get the cooldown applied to new windows.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Get the registry's clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Get the number of stored entries, including closed windows that have
    /// not been released yet.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Drop all suppression state, returning the number of windows that were
    /// still open.
    ///
    /// Pending releases are not cancelled; they find nothing to remove.
    pub fn clear(&self) -> usize {
        let now = self.clock.now();
        let mut dropped = 0;
        self.storage.retain(|_, entry| {
            if entry.window.is_active(now) {
                dropped += 1;
            }
            false
        });
        dropped
    }
}
