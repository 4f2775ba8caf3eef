// Path: crates/types/src/app/mod.rs
//! Core application-level data structures.

/// Events emitted by successful state transitions.
pub mod events;
/// The canonical `AccountId`.
pub mod identity;
/// Oracle, submission and administrative records.
pub mod verification;

pub use events::*;
pub use identity::AccountId;
pub use verification::*;
