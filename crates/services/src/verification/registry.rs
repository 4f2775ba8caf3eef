// Path: crates/services/src/verification/registry.rs
//! The oracle registry.
//!
//! Oracles are stored under `oracle::{id}` and never deleted. A secondary
//! index `oracle_by_reporter::{account}` holds the id of the most recent entry
//! registered for an identity; since a new entry for the same identity can
//! only be created once the previous one is inactive, the index always points
//! at the only entry that could be active.

use super::admin::{ensure_admin, load_admin, store_admin};
use super::{AddOracleParams, UpdateReputationParams};
use verdant_api::state::{read_record, write_record, StateAccess};
use verdant_api::transaction::context::TxContext;
use verdant_types::app::{AccountId, Oracle, VerificationEvent};
use verdant_types::codec;
use verdant_types::error::{TransactionError, VerificationError};
use verdant_types::keys::{oracle_by_reporter_key, oracle_key, ORACLE_KEY_PREFIX};
use verdant_types::service_configs::VerificationParams;

pub(super) fn load_oracle(
    state: &dyn StateAccess,
    oracle_id: u64,
) -> Result<Option<Oracle>, TransactionError> {
    Ok(read_record(state, &oracle_key(oracle_id))?)
}

fn store_oracle(state: &mut dyn StateAccess, oracle: &Oracle) -> Result<(), TransactionError> {
    write_record(state, &oracle_key(oracle.id), oracle)?;
    Ok(())
}

pub(super) fn oracle_by_reporter(
    state: &dyn StateAccess,
    reporter: &AccountId,
) -> Result<Option<Oracle>, TransactionError> {
    match read_record::<u64>(state, &oracle_by_reporter_key(reporter))? {
        Some(id) => load_oracle(state, id),
        None => Ok(None),
    }
}

pub(super) fn list_oracles(state: &dyn StateAccess) -> Result<Vec<Oracle>, TransactionError> {
    state
        .prefix_scan(ORACLE_KEY_PREFIX)?
        .map(|row| {
            let (_, value) = row?;
            codec::from_bytes_canonical::<Oracle>(&value).map_err(TransactionError::Deserialization)
        })
        .collect()
}

/// Resolves the oracle a reporter acts as and checks that the caller may use it.
///
/// Unknown ids fail with `OracleNotFound`; an inactive oracle or one bound to
/// a different identity fails with `NotAuthorized`.
pub(super) fn authorize_oracle(
    state: &dyn StateAccess,
    oracle_id: u64,
    caller: &AccountId,
) -> Result<Oracle, TransactionError> {
    let oracle = load_oracle(state, oracle_id)?.ok_or(VerificationError::OracleNotFound)?;
    if !oracle.active || oracle.reporter != *caller {
        return Err(VerificationError::NotAuthorized.into());
    }
    Ok(oracle)
}

pub(super) fn add_oracle(
    params: &VerificationParams,
    state: &mut dyn StateAccess,
    p: AddOracleParams,
    ctx: &mut TxContext,
) -> Result<u64, TransactionError> {
    let mut admin = load_admin(state)?;
    ensure_admin(&admin, &ctx.signer_account_id)?;

    // Only an *active* entry blocks re-registration of the same identity.
    if let Some(existing) = oracle_by_reporter(state, &p.reporter)? {
        if existing.active {
            return Err(VerificationError::OracleAlreadyExists.into());
        }
    }

    let id = admin.next_oracle_id;
    admin.next_oracle_id = id
        .checked_add(1)
        .ok_or_else(|| TransactionError::Invalid("oracle id space exhausted".into()))?;

    let oracle = Oracle {
        id,
        reporter: p.reporter,
        name: p.name,
        description: p.description,
        active: true,
        created_at: ctx.block_height,
        reputation: params.initial_reputation,
    };
    store_oracle(state, &oracle)?;
    write_record(state, &oracle_by_reporter_key(&oracle.reporter), &id)?;
    store_admin(state, &admin)?;

    tracing::info!(
        target: "verification",
        event = "oracle_added",
        oracle_id = id,
        reporter = %oracle.reporter,
        name = %oracle.name
    );
    ctx.emit(VerificationEvent::OracleAdded {
        oracle_id: id,
        reporter: oracle.reporter,
    });
    Ok(id)
}

pub(super) fn remove_oracle(
    state: &mut dyn StateAccess,
    oracle_id: u64,
    ctx: &mut TxContext,
) -> Result<bool, TransactionError> {
    let admin = load_admin(state)?;
    ensure_admin(&admin, &ctx.signer_account_id)?;
    let mut oracle = load_oracle(state, oracle_id)?.ok_or(VerificationError::OracleNotFound)?;

    oracle.active = false;
    store_oracle(state, &oracle)?;

    tracing::info!(target: "verification", event = "oracle_removed", oracle_id);
    ctx.emit(VerificationEvent::OracleRemoved { oracle_id });
    Ok(true)
}

/// Overwrites an oracle's reputation. No floor or ceiling is applied.
pub(super) fn update_reputation(
    state: &mut dyn StateAccess,
    p: UpdateReputationParams,
    ctx: &mut TxContext,
) -> Result<bool, TransactionError> {
    let admin = load_admin(state)?;
    ensure_admin(&admin, &ctx.signer_account_id)?;
    let mut oracle = load_oracle(state, p.oracle_id)?.ok_or(VerificationError::OracleNotFound)?;

    let old = oracle.reputation;
    oracle.reputation = p.reputation;
    store_oracle(state, &oracle)?;

    tracing::debug!(
        target: "verification",
        event = "reputation_updated",
        oracle_id = p.oracle_id,
        old,
        new = p.reputation
    );
    ctx.emit(VerificationEvent::ReputationUpdated {
        oracle_id: p.oracle_id,
        old,
        new: p.reputation,
    });
    Ok(true)
}
