// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
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

//! Services hosted by the Verdant execution layer.

pub mod initiatives;
pub mod verification;
