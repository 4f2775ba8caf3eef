// Path: crates/api/src/transaction/mod.rs
//! Transaction-scoped types shared by services and the execution layer.

pub mod context;
