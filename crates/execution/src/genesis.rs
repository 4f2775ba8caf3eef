// Path: crates/execution/src/genesis.rs
//! Seeds an empty store from the node configuration.

use verdant_api::state::StateAccess;
use verdant_services::initiatives::StaticInitiativeCatalog;
use verdant_services::verification::VerificationService;
use verdant_types::codec;
use verdant_types::config::VerdantConfig;
use verdant_types::error::CoreError;
use verdant_types::keys::STATUS_KEY;

/// Writes the genesis state unless the store already holds one.
///
/// Returns `true` if genesis was applied. A store that was initialized
/// before is left untouched, including its initiative bounds, so editing
/// `[[initiatives]]` has no effect on an existing database.
pub fn apply_genesis(store: &mut dyn StateAccess, config: &VerdantConfig) -> Result<bool, CoreError> {
    if store.get(STATUS_KEY)?.is_some() {
        tracing::info!(target: "execution", event = "genesis_skipped", "Store already initialized.");
        return Ok(false);
    }

    let mut inserts = VerificationService::genesis_entries(config.node.deployer)?;
    inserts.extend(StaticInitiativeCatalog::genesis_entries(&config.initiatives)?);
    inserts.push((
        STATUS_KEY.to_vec(),
        codec::to_bytes_canonical(&0u64).map_err(CoreError::Custom)?,
    ));
    store.batch_apply(&inserts, &[])?;

    tracing::info!(
        target: "execution",
        event = "genesis_applied",
        deployer = %config.node.deployer,
        initiatives = config.initiatives.len(),
        keys = inserts.len()
    );
    Ok(true)
}
