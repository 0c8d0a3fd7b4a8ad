//! Scheduler adapters for deferred window expiry.
//!
//! - `DeferredQueue`: a deadline-ordered queue drained by the host's own event
//!   loop via [`DeferredQueue::run_due`]. Tasks run on the polling thread.
//! - `TokioScheduler` (feature `async`): one sleeping task per expiry on a
//!   Tokio runtime.

use crate::application::ports::{Clock, Scheduler, Task};
use crate::domain::window::saturating_deadline;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[cfg(feature = "async")]
use tokio::runtime::Handle;

struct Pending {
    due: Instant,
    seq: u64,
    task: Task,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Default)]
struct QueueState {
    heap: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
}

/// Cooperative scheduler for hosts that own their event loop.
///
/// Scheduling only records a deadline. Nothing runs until the host calls
/// [`run_due`](Self::run_due), typically once per frame or tick. Tasks with
/// equal deadlines run in the order they were scheduled.
///
/// # Example
/// ```
/// use toast_dedup::{DeferredQueue, SystemClock, ToastDeduplicator};
/// use std::sync::Arc;
///
/// let queue = Arc::new(DeferredQueue::new(Arc::new(SystemClock::new())));
/// let toasts = ToastDeduplicator::with_scheduler(queue.clone());
///
/// toasts.trigger(|| println!("Saved"), "saved");
///
/// // In the host's event loop:
/// queue.run_due();
/// ```
pub struct DeferredQueue {
    clock: Arc<dyn Clock>,
    state: Mutex<QueueState>,
}

impl DeferredQueue {
    /// Create an empty queue reading deadlines from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Run every task whose deadline has passed. Returns how many ran.
    ///
    /// The queue is unlocked while a task runs, so tasks may schedule more
    /// work.
    pub fn run_due(&self) -> usize {
        let now = self.clock.now();
        let mut ran = 0;

        loop {
            let task = {
                let mut state = self.lock();
                let due = state
                    .heap
                    .peek()
                    .map_or(false, |Reverse(next)| next.due <= now);
                if due {
                    state.heap.pop().map(|Reverse(pending)| pending.task)
                } else {
                    None
                }
            };

            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }

        ran
    }

    /// Number of tasks waiting.
    pub fn pending(&self) -> usize {
        self.lock().heap.len()
    }

    /// Deadline of the earliest waiting task.
    pub fn next_due(&self) -> Option<Instant> {
        self.lock().heap.peek().map(|Reverse(next)| next.due)
    }

    /// How long the host may sleep before the next task is due.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_due().map(|due| due.saturating_duration_since(now))
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("clock", &self.clock)
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler for DeferredQueue {
    fn schedule(&self, delay: Duration, task: Task) {
        let due = saturating_deadline(self.clock.now(), delay);
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.heap.push(Reverse(Pending { due, seq, task }));
    }
}

/// Scheduler spawning one sleeping task per expiry onto a Tokio runtime.
///
/// Spawned tasks are detached: dropping the scheduler does not cancel them,
/// and shutting the runtime down drops them without running.
///
/// Once the runtime is gone, ids triggered through this scheduler keep their
/// entries after the window closes. They stop suppressing on time, but the
/// storage only shrinks when the same id fires again or the owner calls
/// `ToastDeduplicator::purge_expired`.
#[cfg(feature = "async")]
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

#[cfg(feature = "async")]
impl TokioScheduler {
    /// Create a scheduler spawning onto `handle`.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Create a scheduler for the runtime the caller is running in, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

#[cfg(feature = "async")]
impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::MockClock;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn queue() -> (Arc<DeferredQueue>, MockClock) {
        let clock = MockClock::starting_now();
        (Arc::new(DeferredQueue::new(Arc::new(clock.clone()))), clock)
    }

    fn push(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Task {
        let log = Arc::clone(log);
        Box::new(move || log.lock().unwrap().push(name))
    }

    #[test]
    fn test_nothing_runs_before_deadline() {
        let (queue, clock) = queue();
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.schedule(Duration::from_millis(100), push(&log, "a"));
        assert_eq!(queue.run_due(), 0);

        clock.advance(Duration::from_millis(99));
        assert_eq!(queue.run_due(), 0);
        assert_eq!(queue.time_until_next(), Some(Duration::from_millis(1)));

        clock.advance(Duration::from_millis(1));
        assert_eq!(queue.run_due(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.next_due(), None);
    }

    #[test]
    fn test_runs_in_deadline_then_schedule_order() {
        let (queue, clock) = queue();
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.schedule(Duration::from_millis(300), push(&log, "late"));
        queue.schedule(Duration::from_millis(100), push(&log, "first"));
        queue.schedule(Duration::from_millis(100), push(&log, "second"));

        clock.advance(Duration::from_millis(500));
        assert_eq!(queue.run_due(), 3);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "late"]);
    }

    #[test]
    fn test_task_can_schedule_more_work() {
        let (queue, clock) = queue();
        let count = Arc::new(AtomicUsize::new(0));

        let inner_queue = Arc::clone(&queue);
        let inner_count = Arc::clone(&count);
        queue.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                inner_count.fetch_add(1, AtomicOrdering::SeqCst);
                let again = Arc::clone(&inner_count);
                inner_queue.schedule(
                    Duration::from_millis(10),
                    Box::new(move || {
                        again.fetch_add(1, AtomicOrdering::SeqCst);
                    }),
                );
            }),
        );

        clock.advance(Duration::from_millis(10));
        assert_eq!(queue.run_due(), 1);
        assert_eq!(queue.pending(), 1);

        clock.advance(Duration::from_millis(10));
        assert_eq!(queue.run_due(), 1);
        assert_eq!(count.load(AtomicOrdering::SeqCst), 2);
    }

    #[test]
    fn test_oversized_delay_is_clamped() {
        let (queue, clock) = queue();
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.schedule(Duration::MAX, push(&log, "never"));
        queue.schedule(Duration::from_millis(10), push(&log, "soon"));

        clock.advance(Duration::from_secs(86_400));
        assert_eq!(queue.run_due(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["soon"]);
        assert_eq!(queue.pending(), 1);
    }

    #[cfg(feature = "async")]
    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_waits_for_delay() {
        let scheduler = TokioScheduler::current().expect("inside a runtime");
        let count = Arc::new(AtomicUsize::new(0));
        let task_count = Arc::clone(&count);

        scheduler.schedule(
            Duration::from_millis(5000),
            Box::new(move || {
                task_count.fetch_add(1, AtomicOrdering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(count.load(AtomicOrdering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(AtomicOrdering::SeqCst), 1);
    }

    #[cfg(feature = "async")]
    #[test]
    fn test_tokio_scheduler_requires_runtime() {
        assert!(TokioScheduler::current().is_none());
    }
}
