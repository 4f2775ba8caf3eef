// Path: crates/services/src/verification/ledger.rs
//! The submission ledger.
//!
//! Claims live under `submission::{subject}{initiative}{seq}` and the last
//! assigned sequence number of each pair under `counter::{subject}{initiative}`.
//! Sequence numbers start at 1 and are never reused.

use super::admin::{ensure_not_paused, load_admin};
use super::consensus::evaluate_consensus;
use super::registry::authorize_oracle;
use super::{AddEndorsementParams, SubmitParams};
use verdant_api::state::{read_record, write_record, StateAccess};
use verdant_api::transaction::context::TxContext;
use verdant_types::app::{AccountId, InitiativeBounds, Submission, VerificationEvent};
use verdant_types::error::{TransactionError, VerificationError};
use verdant_types::keys::{submission_counter_key, submission_key};
use verdant_types::service_configs::VerificationParams;

/// Looks up an initiative's bounds through whichever service exposes the
/// catalog capability. A node without a catalog knows no initiatives.
fn resolve_bounds(
    state: &dyn StateAccess,
    ctx: &TxContext,
    initiative_id: u64,
) -> Result<InitiativeBounds, TransactionError> {
    let Some(catalog) = ctx.services.initiative_catalog() else {
        tracing::warn!(target: "verification", event = "no_catalog", initiative_id);
        return Err(VerificationError::InitiativeNotFound.into());
    };
    catalog
        .resolve_initiative(state, initiative_id)?
        .ok_or_else(|| VerificationError::InitiativeNotFound.into())
}

fn check_metadata(params: &VerificationParams, metadata: &str) -> Result<(), VerificationError> {
    if metadata.len() > params.max_metadata_len as usize {
        return Err(VerificationError::InvalidMetadata);
    }
    Ok(())
}

fn finalized(
    ctx: &mut TxContext,
    subject: AccountId,
    initiative_id: u64,
    submission_id: u64,
    magnitude: u64,
) {
    tracing::info!(
        target: "verification",
        event = "consensus_reached",
        subject = %subject,
        initiative_id,
        submission_id,
        magnitude
    );
    ctx.emit(VerificationEvent::ConsensusReached {
        subject,
        initiative_id,
        submission_id,
        magnitude,
    });
}

pub(super) fn submit(
    params: &VerificationParams,
    state: &mut dyn StateAccess,
    p: SubmitParams,
    ctx: &mut TxContext,
) -> Result<bool, TransactionError> {
    ensure_not_paused(&load_admin(state)?)?;
    authorize_oracle(state, p.oracle_id, &ctx.signer_account_id)?;
    let bounds = resolve_bounds(state, ctx, p.initiative_id)?;
    if !bounds.contains(p.magnitude) {
        return Err(VerificationError::InvalidEmissionReduction.into());
    }
    check_metadata(params, &p.metadata)?;

    let counter_key = submission_counter_key(&p.subject, p.initiative_id);
    let last: u64 = read_record(&*state, &counter_key)?.unwrap_or(0);
    let submission_id = last
        .checked_add(1)
        .ok_or_else(|| TransactionError::Invalid("submission sequence exhausted".into()))?;
    let key = submission_key(&p.subject, p.initiative_id, submission_id);
    if state.get(&key)?.is_some() {
        return Err(VerificationError::DuplicateSubmission.into());
    }

    let mut submission = Submission {
        magnitude: p.magnitude,
        metadata: p.metadata,
        created_at: ctx.block_height,
        endorsers: vec![p.oracle_id],
        consensus_reached: false,
        expires_at: ctx.block_height.saturating_add(params.validity_window),
    };
    let reached = evaluate_consensus(&mut submission, params.quorum_threshold);
    write_record(state, &key, &submission)?;
    write_record(state, &counter_key, &submission_id)?;

    tracing::info!(
        target: "verification",
        event = "submission_recorded",
        subject = %p.subject,
        initiative_id = p.initiative_id,
        submission_id,
        oracle_id = p.oracle_id,
        magnitude = p.magnitude,
        expires_at = submission.expires_at
    );
    ctx.emit(VerificationEvent::SubmissionRecorded {
        subject: p.subject,
        initiative_id: p.initiative_id,
        submission_id,
        oracle_id: p.oracle_id,
        magnitude: p.magnitude,
    });
    if reached {
        finalized(ctx, p.subject, p.initiative_id, submission_id, p.magnitude);
    }
    Ok(reached)
}

/// Adds an oracle's agreement to an existing claim.
///
/// The endorsement metadata is length-checked and logged; the claim only keeps
/// the submitting oracle's metadata.
pub(super) fn add_endorsement(
    params: &VerificationParams,
    state: &mut dyn StateAccess,
    p: AddEndorsementParams,
    ctx: &mut TxContext,
) -> Result<bool, TransactionError> {
    ensure_not_paused(&load_admin(state)?)?;
    authorize_oracle(state, p.oracle_id, &ctx.signer_account_id)?;

    let key = submission_key(&p.subject, p.initiative_id, p.submission_id);
    let mut submission: Submission =
        read_record(&*state, &key)?.ok_or(VerificationError::InvalidData)?;
    if p.agreed_magnitude != submission.magnitude {
        return Err(VerificationError::InvalidData.into());
    }
    if submission.has_endorsed(p.oracle_id) {
        return Err(VerificationError::DuplicateSubmission.into());
    }
    check_metadata(params, &p.metadata)?;
    if submission.endorsers.len() >= params.max_endorsers as usize {
        return Err(VerificationError::InvalidData.into());
    }

    let was_reached = submission.consensus_reached;
    submission.endorsers.push(p.oracle_id);
    let reached = evaluate_consensus(&mut submission, params.quorum_threshold);
    write_record(state, &key, &submission)?;

    tracing::info!(
        target: "verification",
        event = "endorsement_added",
        subject = %p.subject,
        initiative_id = p.initiative_id,
        submission_id = p.submission_id,
        oracle_id = p.oracle_id,
        endorsers = submission.endorsers.len(),
        metadata = %p.metadata
    );
    ctx.emit(VerificationEvent::EndorsementAdded {
        subject: p.subject,
        initiative_id: p.initiative_id,
        submission_id: p.submission_id,
        oracle_id: p.oracle_id,
    });
    if reached && !was_reached {
        finalized(ctx, p.subject, p.initiative_id, p.submission_id, submission.magnitude);
    }
    Ok(reached)
}
