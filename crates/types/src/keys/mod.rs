// Path: crates/types/src/keys/mod.rs
//! Defines constants and builders for the verification service's state keys.
//!
//! Keys without a `system::` prefix are relative to the owning service's
//! namespace; the execution layer prepends `_service_data::{service_id}::`
//! before they reach the store. `system::` keys are shared and only reachable
//! by services whose policy allowlists them. Numeric components are big-endian
//! so that a prefix scan returns records in ascending id order.

use crate::app::AccountId;

/// The state key for the single `AdminState` record.
pub const ADMIN_STATE_KEY: &[u8] = b"admin";

/// The state key prefix for oracle records, keyed by oracle id.
pub const ORACLE_KEY_PREFIX: &[u8] = b"oracle::";
/// The state key prefix for the reporter index, keyed by account id.
/// Stores the id of the most recently registered oracle for that reporter.
pub const ORACLE_BY_REPORTER_PREFIX: &[u8] = b"oracle_by_reporter::";

/// The state key prefix for submissions, keyed by (subject, initiative, sequence).
pub const SUBMISSION_KEY_PREFIX: &[u8] = b"submission::";
/// The state key prefix for per-(subject, initiative) submission counters.
pub const SUBMISSION_COUNTER_PREFIX: &[u8] = b"counter::";

/// The shared state key prefix for initiative bounds, written at genesis and
/// read by the initiative catalog.
pub const INITIATIVE_KEY_PREFIX: &[u8] = b"system::initiatives::";

/// The raw key under which the execution layer persists the last applied
/// block height. Not reachable by any service.
pub const STATUS_KEY: &[u8] = b"system::status";

/// Builds the key of an oracle record.
pub fn oracle_key(oracle_id: u64) -> Vec<u8> {
    [ORACLE_KEY_PREFIX, &oracle_id.to_be_bytes()].concat()
}

/// Builds the reporter index key for an account.
pub fn oracle_by_reporter_key(reporter: &AccountId) -> Vec<u8> {
    [ORACLE_BY_REPORTER_PREFIX, reporter.as_ref()].concat()
}

/// Builds the scan prefix covering every submission for a (subject, initiative) pair.
pub fn submission_prefix(subject: &AccountId, initiative_id: u64) -> Vec<u8> {
    [
        SUBMISSION_KEY_PREFIX,
        subject.as_ref(),
        &initiative_id.to_be_bytes(),
    ]
    .concat()
}

/// Builds the key of a single submission.
pub fn submission_key(subject: &AccountId, initiative_id: u64, submission_id: u64) -> Vec<u8> {
    let mut key = submission_prefix(subject, initiative_id);
    key.extend_from_slice(&submission_id.to_be_bytes());
    key
}

/// Builds the submission counter key for a (subject, initiative) pair.
pub fn submission_counter_key(subject: &AccountId, initiative_id: u64) -> Vec<u8> {
    [
        SUBMISSION_COUNTER_PREFIX,
        subject.as_ref(),
        &initiative_id.to_be_bytes(),
    ]
    .concat()
}

/// Builds the key of an initiative's bounds record.
pub fn initiative_key(initiative_id: u64) -> Vec<u8> {
    [INITIATIVE_KEY_PREFIX, &initiative_id.to_be_bytes()].concat()
}

/// Extracts the trailing big-endian sequence number from a submission key.
pub fn submission_id_from_key(key: &[u8]) -> Option<u64> {
    let start = key.len().checked_sub(8)?;
    let tail: [u8; 8] = key.get(start..)?.try_into().ok()?;
    Some(u64::from_be_bytes(tail))
}
