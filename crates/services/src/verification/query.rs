// Path: crates/services/src/verification/query.rs
//! Read-only views of the submission ledger.

use super::{SubmissionPairParams, SubmissionRef};
use verdant_api::state::{read_record, StateAccess};
use verdant_types::app::Submission;
use verdant_types::codec;
use verdant_types::error::{TransactionError, VerificationError};
use verdant_types::keys::{
    submission_counter_key, submission_id_from_key, submission_key, submission_prefix,
};

pub(super) fn get_submission(
    state: &dyn StateAccess,
    r: &SubmissionRef,
) -> Result<Option<Submission>, TransactionError> {
    Ok(read_record(
        state,
        &submission_key(&r.subject, r.initiative_id, r.submission_id),
    )?)
}

pub(super) fn list_submissions(
    state: &dyn StateAccess,
    pair: &SubmissionPairParams,
) -> Result<Vec<(u64, Submission)>, TransactionError> {
    state
        .prefix_scan(&submission_prefix(&pair.subject, pair.initiative_id))?
        .map(|row| {
            let (key, value) = row?;
            let id = submission_id_from_key(&key).ok_or_else(|| {
                TransactionError::Invalid("malformed submission key in ledger".into())
            })?;
            let submission = codec::from_bytes_canonical::<Submission>(&value)
                .map_err(TransactionError::Deserialization)?;
            Ok((id, submission))
        })
        .collect()
}

pub(super) fn submission_count(
    state: &dyn StateAccess,
    pair: &SubmissionPairParams,
) -> Result<u64, TransactionError> {
    let count: Option<u64> =
        read_record(state, &submission_counter_key(&pair.subject, pair.initiative_id))?;
    Ok(count.unwrap_or(0))
}

/// The gate consulted by reward distribution. Absent, unfinalized and expired
/// claims are indistinguishable to the caller.
pub(super) fn verified_magnitude(
    state: &dyn StateAccess,
    r: &SubmissionRef,
    now: u64,
) -> Result<u64, TransactionError> {
    get_submission(state, r)?
        .filter(|s| s.is_verified_at(now))
        .map(|s| s.magnitude)
        .ok_or_else(|| VerificationError::InvalidData.into())
}
