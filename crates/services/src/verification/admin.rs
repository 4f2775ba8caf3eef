// Path: crates/services/src/verification/admin.rs
//! Owner and admin roles, and the global pause flag.

use verdant_api::state::{read_record, write_record, StateAccess};
use verdant_api::transaction::context::TxContext;
use verdant_types::app::{AccountId, AdminState, VerificationEvent};
use verdant_types::error::{TransactionError, VerificationError};
use verdant_types::keys::ADMIN_STATE_KEY;

pub(super) fn load_admin(state: &dyn StateAccess) -> Result<AdminState, TransactionError> {
    read_record(state, ADMIN_STATE_KEY)?.ok_or_else(|| {
        TransactionError::Invalid("verification admin record is missing; genesis not applied".into())
    })
}

pub(super) fn store_admin(
    state: &mut dyn StateAccess,
    admin: &AdminState,
) -> Result<(), TransactionError> {
    write_record(state, ADMIN_STATE_KEY, admin)?;
    Ok(())
}

pub(super) fn ensure_admin(admin: &AdminState, caller: &AccountId) -> Result<(), VerificationError> {
    if admin.admin != *caller {
        return Err(VerificationError::NotAuthorized);
    }
    Ok(())
}

fn ensure_owner(admin: &AdminState, caller: &AccountId) -> Result<(), VerificationError> {
    if admin.owner != *caller {
        return Err(VerificationError::NotAuthorized);
    }
    Ok(())
}

pub(super) fn ensure_not_paused(admin: &AdminState) -> Result<(), VerificationError> {
    if admin.paused {
        return Err(VerificationError::ContractPaused);
    }
    Ok(())
}

pub(super) fn transfer_admin(
    state: &mut dyn StateAccess,
    new_admin: AccountId,
    ctx: &mut TxContext,
) -> Result<(), TransactionError> {
    let mut admin = load_admin(state)?;
    ensure_admin(&admin, &ctx.signer_account_id)?;
    admin.admin = new_admin;
    store_admin(state, &admin)?;

    tracing::info!(target: "verification", event = "admin_transferred", new_admin = %new_admin);
    ctx.emit(VerificationEvent::AdminTransferred { new_admin });
    Ok(())
}

pub(super) fn transfer_ownership(
    state: &mut dyn StateAccess,
    new_owner: AccountId,
    ctx: &mut TxContext,
) -> Result<(), TransactionError> {
    let mut admin = load_admin(state)?;
    ensure_owner(&admin, &ctx.signer_account_id)?;
    admin.owner = new_owner;
    store_admin(state, &admin)?;

    tracing::info!(target: "verification", event = "ownership_transferred", new_owner = %new_owner);
    ctx.emit(VerificationEvent::OwnershipTransferred { new_owner });
    Ok(())
}

/// Sets the pause flag. Only the owner may toggle it; setting it to its
/// current value is accepted and still recorded.
pub(super) fn set_paused(
    state: &mut dyn StateAccess,
    paused: bool,
    ctx: &mut TxContext,
) -> Result<(), TransactionError> {
    let mut admin = load_admin(state)?;
    ensure_owner(&admin, &ctx.signer_account_id)?;
    admin.paused = paused;
    store_admin(state, &admin)?;

    tracing::warn!(target: "verification", event = "pause_changed", paused);
    ctx.emit(VerificationEvent::PauseChanged { paused });
    Ok(())
}
