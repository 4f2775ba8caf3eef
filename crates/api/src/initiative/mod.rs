// Path: crates/api/src/initiative/mod.rs

//! Defines the `InitiativeCatalog` trait for decoupled initiative bounds lookups.

use crate::services::BlockchainService;
use crate::state::StateAccess;
use verdant_types::app::InitiativeBounds;
use verdant_types::error::TransactionError;

/// A read-only view of the acceptance bounds of registered initiatives.
///
/// Implemented by catalog services and used by the verification service to
/// validate reported magnitudes without a direct dependency on the catalog.
/// Lookups are synchronous snapshots; the verification service never caches
/// their results between calls.
pub trait InitiativeCatalog: BlockchainService {
    /// Resolves an initiative id to its bounds, or `None` if it is unknown.
    fn resolve_initiative(
        &self,
        state: &dyn StateAccess,
        initiative_id: u64,
    ) -> Result<Option<InitiativeBounds>, TransactionError>;
}
