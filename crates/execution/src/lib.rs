// Path: crates/execution/src/lib.rs
//! # Verdant Execution Crate Lints
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
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]
//! # Verdant Execution
//!
//! The serialized apply loop of the verification engine. Every call runs to
//! completion under a single writer lock, against a copy-on-write overlay of
//! the committed state, and is committed in one batch only if it succeeds.

pub mod app;
pub mod genesis;

pub use crate::app::{ExecutionMachine, Receipt};
