//! Domain layer - pure types with no runtime dependencies.
//!
//! This layer contains the core concepts of notification de-duplication:
//! - Notification identifiers
//! - Fixed, non-sliding suppression windows
//! - Summaries of swallowed repeats
//!
//! All types in this layer are pure and easily testable.

pub mod id;
pub mod summary;
pub mod window;
