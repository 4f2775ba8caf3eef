// Path: crates/types/src/app/events.rs

use crate::app::AccountId;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Observable state changes emitted by successful verification calls.
///
/// Events are collected on the transaction context and returned in the call
/// receipt. A failed call emits nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationEvent {
    /// A new oracle was registered.
    OracleAdded {
        /// The assigned oracle id.
        oracle_id: u64,
        /// The reporter identity bound to the oracle.
        reporter: AccountId,
    },
    /// An oracle was deactivated.
    OracleRemoved {
        /// The deactivated oracle id.
        oracle_id: u64,
    },
    /// An oracle's reputation was overwritten.
    ReputationUpdated {
        /// The affected oracle id.
        oracle_id: u64,
        /// The previous score.
        old: u64,
        /// The new score.
        new: u64,
    },
    /// The admin role moved to a new identity.
    AdminTransferred {
        /// The new admin identity.
        new_admin: AccountId,
    },
    /// The owner role moved to a new identity.
    OwnershipTransferred {
        /// The new owner identity.
        new_owner: AccountId,
    },
    /// The global pause flag changed.
    PauseChanged {
        /// The new flag value.
        paused: bool,
    },
    /// A new claim was recorded.
    SubmissionRecorded {
        /// The subject of the claim.
        subject: AccountId,
        /// The initiative the claim belongs to.
        initiative_id: u64,
        /// The assigned sequence number.
        submission_id: u64,
        /// The submitting oracle.
        oracle_id: u64,
        /// The reported magnitude.
        magnitude: u64,
    },
    /// An oracle endorsed an existing claim.
    EndorsementAdded {
        /// The subject of the claim.
        subject: AccountId,
        /// The initiative the claim belongs to.
        initiative_id: u64,
        /// The endorsed sequence number.
        submission_id: u64,
        /// The endorsing oracle.
        oracle_id: u64,
    },
    /// A claim crossed the quorum threshold.
    ConsensusReached {
        /// The subject of the claim.
        subject: AccountId,
        /// The initiative the claim belongs to.
        initiative_id: u64,
        /// The finalized sequence number.
        submission_id: u64,
        /// The agreed magnitude.
        magnitude: u64,
    },
}
