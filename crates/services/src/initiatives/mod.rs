// Path: crates/services/src/initiatives/mod.rs
//! A configuration-backed initiative catalog.
//!
//! Bounds are written once at genesis under the shared
//! `system::initiatives::` prefix and never change afterwards. Any service
//! whose policy allowlists that prefix can resolve them through the
//! `InitiativeCatalog` capability.

use verdant_api::initiative::InitiativeCatalog;
use verdant_api::state::{read_record, StateAccess};
use verdant_api::transaction::context::TxContext;
use verdant_macros::service_interface;
use verdant_types::app::InitiativeBounds;
use verdant_types::codec;
use verdant_types::config::InitiativeConfig;
use verdant_types::error::{CoreError, TransactionError};
use verdant_types::keys::initiative_key;

/// The dispatch id of the initiative catalog.
pub const SERVICE_ID: &str = "initiatives";

#[derive(Default, Debug)]
pub struct StaticInitiativeCatalog;

impl StaticInitiativeCatalog {
    /// Returns the raw writes that publish `initiatives` at genesis.
    pub fn genesis_entries(
        initiatives: &[InitiativeConfig],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, CoreError> {
        initiatives
            .iter()
            .map(|i| {
                let value = codec::to_bytes_canonical(&i.bounds()).map_err(CoreError::Custom)?;
                Ok((initiative_key(i.id), value))
            })
            .collect()
    }
}

#[service_interface(
    id = "initiatives",
    abi_version = 1,
    state_schema = "v1",
    capabilities = "INITIATIVE_CATALOG"
)]
impl StaticInitiativeCatalog {
    #[query]
    pub fn get_initiative(
        &self,
        state: &dyn StateAccess,
        initiative_id: u64,
        _ctx: &TxContext,
    ) -> Result<Option<InitiativeBounds>, TransactionError> {
        self.resolve_initiative(state, initiative_id)
    }
}

impl InitiativeCatalog for StaticInitiativeCatalog {
    fn resolve_initiative(
        &self,
        state: &dyn StateAccess,
        initiative_id: u64,
    ) -> Result<Option<InitiativeBounds>, TransactionError> {
        Ok(read_record(state, &initiative_key(initiative_id))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use verdant_api::services::access::ServiceDirectory;
    use verdant_api::services::BlockchainService;
    use verdant_api::state::ReadOnlyNamespacedStateAccess;
    use verdant_storage::MemoryStore;
    use verdant_types::config::default_service_policies;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        let entries = StaticInitiativeCatalog::genesis_entries(&[
            InitiativeConfig { id: 1, min: 100, max: 10_000 },
            InitiativeConfig { id: 7, min: 0, max: 5 },
        ])
        .unwrap();
        store.batch_apply(&entries, &[]).unwrap();
        store
    }

    #[test]
    fn test_catalog_resolves_seeded_bounds() {
        let store = seeded();
        let policies = default_service_policies();
        let view = ReadOnlyNamespacedStateAccess::new(&store, SERVICE_ID, &policies[SERVICE_ID]);

        let catalog = StaticInitiativeCatalog;
        assert_eq!(
            catalog.resolve_initiative(&view, 7).unwrap(),
            Some(InitiativeBounds { min: 0, max: 5 })
        );
        assert_eq!(catalog.resolve_initiative(&view, 2).unwrap(), None);
    }

    #[test]
    fn test_capability_is_discoverable_through_directory() {
        let directory = ServiceDirectory::new(vec![
            Arc::new(StaticInitiativeCatalog) as Arc<dyn BlockchainService>
        ]);
        let catalog = directory.initiative_catalog().unwrap();
        assert_eq!(catalog.id(), SERVICE_ID);
    }

    #[test]
    fn test_get_initiative_query_encodes_bounds() {
        let store = seeded();
        let policies = default_service_policies();
        let view = ReadOnlyNamespacedStateAccess::new(&store, SERVICE_ID, &policies[SERVICE_ID]);
        let directory = ServiceDirectory::default();
        let ctx = TxContext::for_query(0, &directory);

        let params = codec::to_bytes_canonical(&1u64).unwrap();
        let raw = StaticInitiativeCatalog
            .handle_service_query(&view, "get_initiative@v1", &params, &ctx)
            .unwrap();
        let bounds: Option<InitiativeBounds> = codec::from_bytes_canonical(&raw).unwrap();
        assert_eq!(bounds, Some(InitiativeBounds { min: 100, max: 10_000 }));
    }
}
