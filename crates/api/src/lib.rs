// Path: crates/api/src/lib.rs

//! # Verdant API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]
//! # Verdant API
//!
//! Core traits and interfaces for the Verdant verification engine. This crate
//! defines the stable contract between the state backends, the services and
//! the execution layer.

/// Re-exports all core error types from the central `verdant-types` crate.
pub mod error;
/// Defines the `InitiativeCatalog` trait for decoupled initiative bounds lookups.
pub mod initiative;
/// Traits for pluggable blockchain services and the service directory.
pub mod services;
/// Core traits for state access, the copy-on-write overlay and namespacing.
pub mod state;
/// Defines the per-call transaction context.
pub mod transaction;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::error::{
        ChainError, CoreError, ErrorCode, StateError, TransactionError, VerificationError,
    };
    pub use crate::initiative::InitiativeCatalog;
    pub use crate::services::access::ServiceDirectory;
    pub use crate::services::BlockchainService;
    pub use crate::state::{NamespacedStateAccess, StateAccess, StateOverlay};
    pub use crate::transaction::context::TxContext;
}
