// Path: crates/storage/src/lib.rs
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

//! State backends implementing `verdant_api::state::StateAccess`.
//!
//! `MemoryStore` keeps everything in an ordered map and is used by tests and
//! ephemeral nodes. `RedbStore` persists every committed batch in a single
//! redb write transaction.

pub mod memory;
pub mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;
