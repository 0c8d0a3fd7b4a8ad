//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time, Tokio time, mock)
//! - Storage implementations (sharded maps)
//! - Schedulers (polled deadline queue, Tokio tasks)
//! - The `ToastDeduplicator` facade

pub mod clock;
pub mod scheduler;
pub mod storage;
pub mod toast;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds. It provides controllable test doubles for testing
/// suppression timing and diagnostics.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// toast-dedup = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
