// Path: crates/api/src/services/mod.rs
//! Traits for pluggable blockchain services.

use crate::initiative::InitiativeCatalog;
use crate::state::StateAccess;
use crate::transaction::context::TxContext;
use async_trait::async_trait;
use std::any::Any;
use verdant_types::error::TransactionError;
use verdant_types::service_configs::Capabilities;

pub mod access;

/// The base trait for any service managed by the execution layer.
///
/// # Storage Invariant: Namespaced Access
///
/// All reads and writes performed by a service through `handle_service_call`
/// or `handle_service_query` are scoped to a private namespace. Any key `k`
/// accessed by the service is physically stored as `_service_data::{service_id}::{k}`.
/// Shared `system::` keys are only reachable if the service's policy allowlists
/// the prefix.
///
/// When seeding state for a service at genesis or in tests, namespacing is
/// **not** applied automatically. Build the full key with
/// `verdant_api::state::service_namespace_prefix(service_id) + your_key`.
#[async_trait]
pub trait BlockchainService: Any + Send + Sync {
    /// A unique, static, lowercase string identifier for the service.
    /// This is used for deterministic sorting and for dispatching calls.
    fn id(&self) -> &str;

    /// The version of the ABI the service expects from the host.
    fn abi_version(&self) -> u32;

    /// A string identifying the schema of the state this service reads/writes.
    fn state_schema(&self) -> &str;

    /// Returns a bitmask of the cross-service capabilities this service implements.
    fn capabilities(&self) -> Capabilities;

    /// Provides access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Handles a dispatched, state-mutating call and returns the SCALE-encoded result.
    ///
    /// The default implementation returns an `Unsupported` error.
    async fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &mut TxContext<'_>,
    ) -> Result<Vec<u8>, TransactionError> {
        let _ = (state, params, ctx);
        Err(TransactionError::Unsupported(format!(
            "Service '{}' does not support call '{}'",
            self.id(),
            method
        )))
    }

    /// Handles a dispatched, read-only query and returns the SCALE-encoded result.
    ///
    /// The default implementation returns an `Unsupported` error.
    fn handle_service_query(
        &self,
        state: &dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &TxContext<'_>,
    ) -> Result<Vec<u8>, TransactionError> {
        let _ = (state, params, ctx);
        Err(TransactionError::Unsupported(format!(
            "Service '{}' does not support query '{}'",
            self.id(),
            method
        )))
    }

    /// Attempts to downcast this service to an `InitiativeCatalog` trait object.
    fn as_initiative_catalog(&self) -> Option<&dyn InitiativeCatalog> {
        None
    }
}
