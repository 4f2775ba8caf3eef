// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use verdant_types::error::{
    ChainError, CoreError, ErrorCode, StateError, TransactionError, VerificationError,
};
pub use verdant_types::Result;
