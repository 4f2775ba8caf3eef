// Path: crates/cli/src/commands/mod.rs
pub mod config;
pub mod query;
pub mod replay;
