//! # toast-dedup
//!
//! Cooldown-based de-duplication for transient notifications (toasts, alerts,
//! banners).
//!
//! UI code often fires the same notification several times in quick
//! succession: a retried request fails twice, an event handler runs once per
//! subscriber, a button gets double-clicked. This crate keeps a registry of
//! recently shown notification ids and drops repeats until a fixed cooldown
//! (5000 ms by default) has passed since the first one fired.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use toast_dedup::ToastDeduplicator;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! // Inside a Tokio runtime the builder picks up the runtime for expiries.
//! let toasts = ToastDeduplicator::builder().build().unwrap();
//!
//! toasts.trigger(|| println!("Connection lost"), "connection-lost");
//! toasts.trigger(|| println!("Connection lost"), "connection-lost"); // suppressed
//! # }
//! ```
//!
//! Hosts with their own event loop use a [`DeferredQueue`] and drain it on
//! every tick:
//!
//! ```rust
//! use toast_dedup::{DeferredQueue, SystemClock, ToastDeduplicator};
//! use std::sync::Arc;
//!
//! let queue = Arc::new(DeferredQueue::new(Arc::new(SystemClock::new())));
//! let toasts = ToastDeduplicator::with_scheduler(queue.clone());
//!
//! toasts.trigger(|| println!("Saved"), "saved");
//!
//! // once per frame
//! queue.run_due();
//! ```
//!
//! ## Semantics
//!
//! - The first trigger for an id runs its action synchronously and opens a
//!   suppression window.
//! - Triggers for the same id inside the window are dropped. They do **not**
//!   extend the window.
//! - Distinct ids never suppress each other.
//! - [`ToastDeduplicator::clear`] drops every window immediately. Expiries
//!   already scheduled are not cancelled; each one only removes the window it
//!   was scheduled for, so a stale expiry never ends a newer window.
//! - A panicking action propagates to the caller and its id stays suppressed
//!   until the window ends.
//!
//! ## Sharing
//!
//! `ToastDeduplicator` is a cheap, cloneable handle. Pass it (or a clone) to
//! the code that shows notifications instead of reaching for a global; tests
//! build their own isolated instances.
//!
//! ## Diagnostics
//!
//! Suppressed triggers emit a `DEBUG` event through `tracing` with the `id`
//! and `remaining_ms` fields, and windows that swallowed repeats report the
//! count when they close. Counters are available through
//! [`ToastDeduplicator::metrics`]:
//!
//! ```rust
//! # use toast_dedup::{DeferredQueue, SystemClock, ToastDeduplicator};
//! # use std::sync::Arc;
//! # let queue = Arc::new(DeferredQueue::new(Arc::new(SystemClock::new())));
//! # let toasts = ToastDeduplicator::with_scheduler(queue);
//! let snapshot = toasts.metrics().snapshot();
//! println!("fired: {}", snapshot.notifications_fired);
//! println!("suppressed: {}", snapshot.notifications_suppressed);
//! println!("suppression rate: {:.2}%", snapshot.suppression_rate() * 100.0);
//! ```
//!
//! ## Features
//!
//! - `async` (default): [`TokioScheduler`] and [`TokioClock`].
//! - `test-helpers`: `infrastructure::mocks` with `MockClock` and
//!   `MockCaptureLayer`.

// Domain layer - pure types
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    id::NotificationId,
    summary::SuppressionSummary,
    window::{SuppressionWindow, DEFAULT_COOLDOWN},
};

pub use application::{
    deduplicator::Deduplicator,
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, Scheduler, Storage, Task},
    registry::{Claim, SuppressionEntry, SuppressionRegistry},
};

pub use infrastructure::{
    clock::SystemClock,
    scheduler::DeferredQueue,
    storage::ShardedStorage,
    toast::{BuildError, SharedStorage, ToastDeduplicator, ToastDeduplicatorBuilder},
};

#[cfg(feature = "async")]
pub use infrastructure::{clock::TokioClock, scheduler::TokioScheduler};
