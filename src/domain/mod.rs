//! Domain layer - pure business logic with no external dependencies.
//!
//! This layer contains the core concepts and invariants of the throttle gate:
//! - Validated gate configuration
//! - Persisted window state
//! - Gate identity
//! - The decision engine
//!
//! All types in this layer are pure and easily testable.

pub mod config;
pub mod identity;
pub mod policy;
pub mod state;
