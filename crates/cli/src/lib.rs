// Path: crates/cli/src/lib.rs
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

//! # Verdant CLI Library
//!
//! Helpers behind the `verdant` binary, usable on their own to drive an
//! engine in-process.
//!
//! `verdant-cli` is an *external consumer* of the engine: it only touches the
//! public APIs of the other `verdant-*` crates and holds no verification
//! logic of its own. It composes them into operator workflows: loading a
//! configuration, opening the configured store, replaying scripted calls and
//! reading the results back.

pub mod client;
pub mod script;

pub use client::{Call, Query, VerificationClient};

use anyhow::{Context, Result};
use std::path::Path;
use verdant_api::state::StateAccess;
use verdant_storage::{MemoryStore, RedbStore};
use verdant_types::config::{NodeConfig, StateBackend, VerdantConfig};

/// Reads and validates a `verdant.toml` file.
pub fn load_config(path: &Path) -> Result<VerdantConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: VerdantConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Opens the state backend selected by `node`.
pub fn open_store(node: &NodeConfig) -> Result<Box<dyn StateAccess>> {
    match node.state_backend {
        StateBackend::Memory => Ok(Box::new(MemoryStore::new())),
        StateBackend::Redb => {
            let path = node
                .state_file
                .as_deref()
                .context("'node.state_file' is required when using the Redb backend")?;
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let store = RedbStore::open(path)
                .with_context(|| format!("Failed to open state file {}", path))?;
            Ok(Box::new(store))
        }
    }
}

/// Opens the configured store and builds a client over a fresh engine.
pub fn connect(config: &VerdantConfig) -> Result<VerificationClient> {
    let store = open_store(&config.node)?;
    let machine = verdant_execution::ExecutionMachine::from_config(store, config)?;
    Ok(VerificationClient::new(machine))
}
