// Path: crates/services/src/verification/mod.rs
//! The verification service: a registry of trusted oracles, a per-(subject,
//! initiative) ledger of claims, quorum-based finalization and an
//! expiry-gated read path for downstream reward distribution.
//!
//! Every call validates all of its preconditions before the first write, so a
//! rejected call leaves state untouched even without the execution layer's
//! overlay.

mod admin;
mod consensus;
mod ledger;
mod query;
mod registry;

#[cfg(test)]
mod tests;

pub use consensus::evaluate_consensus;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use verdant_api::state::{service_namespace_prefix, StateAccess};
use verdant_api::transaction::context::TxContext;
use verdant_macros::service_interface;
use verdant_types::app::{AccountId, AdminState, Oracle, Submission};
use verdant_types::codec;
use verdant_types::error::{CoreError, TransactionError};
use verdant_types::keys::ADMIN_STATE_KEY;
use verdant_types::service_configs::VerificationParams;

/// The dispatch id of the verification service.
pub const SERVICE_ID: &str = "verification";

// --- Service Method Parameter Structs (The Service's Public ABI) ---

#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AddOracleParams {
    pub reporter: AccountId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct OracleIdParams {
    pub oracle_id: u64,
}

#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateReputationParams {
    pub oracle_id: u64,
    pub reputation: u64,
}

#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReporterParams {
    pub reporter: AccountId,
}

#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferAdminParams {
    pub new_admin: AccountId,
}

#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferOwnershipParams {
    pub new_owner: AccountId,
}

#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SubmitParams {
    pub subject: AccountId,
    pub initiative_id: u64,
    pub magnitude: u64,
    #[serde(default)]
    pub metadata: String,
    pub oracle_id: u64,
}

#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AddEndorsementParams {
    pub subject: AccountId,
    pub initiative_id: u64,
    pub submission_id: u64,
    pub oracle_id: u64,
    pub agreed_magnitude: u64,
    #[serde(default)]
    pub metadata: String,
}

/// Addresses one claim in the ledger.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmissionRef {
    pub subject: AccountId,
    pub initiative_id: u64,
    pub submission_id: u64,
}

/// Addresses the whole claim sequence of a (subject, initiative) pair.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmissionPairParams {
    pub subject: AccountId,
    pub initiative_id: u64,
}

// --- Verification Service ---

#[derive(Default, Debug)]
pub struct VerificationService {
    params: VerificationParams,
}

impl VerificationService {
    pub fn new(params: VerificationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &VerificationParams {
        &self.params
    }

    /// Returns the raw, fully namespaced writes that seed the service at genesis:
    /// the administrative record with `deployer` holding both roles.
    pub fn genesis_entries(deployer: AccountId) -> Result<Vec<(Vec<u8>, Vec<u8>)>, CoreError> {
        let key = [service_namespace_prefix(SERVICE_ID).as_slice(), ADMIN_STATE_KEY].concat();
        let value = codec::to_bytes_canonical(&AdminState::genesis(deployer))
            .map_err(CoreError::Custom)?;
        Ok(vec![(key, value)])
    }
}

/// Counts the oracles that may currently submit and endorse.
///
/// `state` must be the service's own namespaced view.
pub fn active_oracle_count(state: &dyn StateAccess) -> Result<u64, TransactionError> {
    let active = registry::list_oracles(state)?
        .iter()
        .filter(|o| o.active)
        .count();
    Ok(active as u64)
}

#[service_interface(id = "verification", abi_version = 1, state_schema = "v1")]
impl VerificationService {
    // --- Oracle registry ---

    #[method]
    pub fn add_oracle(
        &self,
        state: &mut dyn StateAccess,
        params: AddOracleParams,
        ctx: &mut TxContext,
    ) -> Result<u64, TransactionError> {
        registry::add_oracle(&self.params, state, params, ctx)
    }

    #[method]
    pub fn remove_oracle(
        &self,
        state: &mut dyn StateAccess,
        params: OracleIdParams,
        ctx: &mut TxContext,
    ) -> Result<bool, TransactionError> {
        registry::remove_oracle(state, params.oracle_id, ctx)
    }

    #[method]
    pub fn update_reputation(
        &self,
        state: &mut dyn StateAccess,
        params: UpdateReputationParams,
        ctx: &mut TxContext,
    ) -> Result<bool, TransactionError> {
        registry::update_reputation(state, params, ctx)
    }

    // --- Administrative control ---

    #[method]
    pub fn transfer_admin(
        &self,
        state: &mut dyn StateAccess,
        params: TransferAdminParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        admin::transfer_admin(state, params.new_admin, ctx)
    }

    #[method]
    pub fn transfer_ownership(
        &self,
        state: &mut dyn StateAccess,
        params: TransferOwnershipParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        admin::transfer_ownership(state, params.new_owner, ctx)
    }

    #[method]
    pub fn pause(&self, state: &mut dyn StateAccess, ctx: &mut TxContext) -> Result<(), TransactionError> {
        admin::set_paused(state, true, ctx)
    }

    #[method]
    pub fn unpause(&self, state: &mut dyn StateAccess, ctx: &mut TxContext) -> Result<(), TransactionError> {
        admin::set_paused(state, false, ctx)
    }

    // --- Submission ledger ---

    /// Records a new claim and returns whether it is already finalized.
    #[method]
    pub fn submit(
        &self,
        state: &mut dyn StateAccess,
        params: SubmitParams,
        ctx: &mut TxContext,
    ) -> Result<bool, TransactionError> {
        ledger::submit(&self.params, state, params, ctx)
    }

    /// Endorses an existing claim and returns the consensus flag afterwards.
    #[method]
    pub fn add_endorsement(
        &self,
        state: &mut dyn StateAccess,
        params: AddEndorsementParams,
        ctx: &mut TxContext,
    ) -> Result<bool, TransactionError> {
        ledger::add_endorsement(&self.params, state, params, ctx)
    }

    // --- Read path ---

    #[query]
    pub fn get_oracle(
        &self,
        state: &dyn StateAccess,
        params: OracleIdParams,
        _ctx: &TxContext,
    ) -> Result<Option<Oracle>, TransactionError> {
        registry::load_oracle(state, params.oracle_id)
    }

    #[query]
    pub fn get_oracle_by_reporter(
        &self,
        state: &dyn StateAccess,
        params: ReporterParams,
        _ctx: &TxContext,
    ) -> Result<Option<Oracle>, TransactionError> {
        registry::oracle_by_reporter(state, &params.reporter)
    }

    #[query]
    pub fn list_oracles(
        &self,
        state: &dyn StateAccess,
        _ctx: &TxContext,
    ) -> Result<Vec<Oracle>, TransactionError> {
        registry::list_oracles(state)
    }

    #[query]
    pub fn get_submission(
        &self,
        state: &dyn StateAccess,
        params: SubmissionRef,
        _ctx: &TxContext,
    ) -> Result<Option<Submission>, TransactionError> {
        query::get_submission(state, &params)
    }

    #[query]
    pub fn list_submissions(
        &self,
        state: &dyn StateAccess,
        params: SubmissionPairParams,
        _ctx: &TxContext,
    ) -> Result<Vec<(u64, Submission)>, TransactionError> {
        query::list_submissions(state, &params)
    }

    #[query]
    pub fn get_submission_count(
        &self,
        state: &dyn StateAccess,
        params: SubmissionPairParams,
        _ctx: &TxContext,
    ) -> Result<u64, TransactionError> {
        query::submission_count(state, &params)
    }

    /// Returns the agreed magnitude of a finalized, unexpired claim.
    ///
    /// Fails with `InvalidData` alike for a missing, unfinalized or expired
    /// claim.
    #[query]
    pub fn get_verified_magnitude(
        &self,
        state: &dyn StateAccess,
        params: SubmissionRef,
        ctx: &TxContext,
    ) -> Result<u64, TransactionError> {
        query::verified_magnitude(state, &params, ctx.block_height)
    }

    #[query]
    pub fn is_paused(&self, state: &dyn StateAccess, _ctx: &TxContext) -> Result<bool, TransactionError> {
        Ok(admin::load_admin(state)?.paused)
    }

    #[query]
    pub fn get_admin_state(
        &self,
        state: &dyn StateAccess,
        _ctx: &TxContext,
    ) -> Result<AdminState, TransactionError> {
        admin::load_admin(state)
    }
}
