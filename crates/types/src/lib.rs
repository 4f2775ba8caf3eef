// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Verdant Types
//!
//! This crate is the foundational library for the Verdant verification engine,
//! containing the core data model, error taxonomy, and configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `verdant-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This structure prevents
//! circular dependencies and provides a stable, canonical definition for shared
//! types like `AccountId`, `Oracle`, `Submission`, and the error enums.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::CoreError> = std::result::Result<T, E>;

/// Core application-level data structures like `AccountId`, `Oracle` and `Submission`.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical state.
pub mod codec;
/// Node and service configuration loaded from TOML.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Constants and builders for well-known state keys.
pub mod keys;
/// Parameter structures for services and service capability flags.
pub mod service_configs;
