//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain types and manages runtime behavior:
//! - Suppression registry (storage of open windows)
//! - Deduplicator (trigger decisions and scheduled expiry)
//! - Metrics
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod deduplicator;
pub mod metrics;
pub mod ports;
pub mod registry;
