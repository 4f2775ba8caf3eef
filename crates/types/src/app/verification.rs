// Path: crates/types/src/app/verification.rs

//! Records owned by the verification service: registered oracles, submitted
//! claims, and the administrative record.

use crate::app::AccountId;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A registered, identity-bound reporter authorized to submit or endorse claims.
///
/// Oracles are never deleted. Removal only clears `active`, so the record stays
/// available for audit and ids are never reused.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Oracle {
    /// Sequentially assigned id, starting at 1.
    pub id: u64,
    /// The principal allowed to act as this oracle.
    pub reporter: AccountId,
    /// Display name.
    pub name: String,
    /// Free-form description of the reporter.
    pub description: String,
    /// Whether the oracle may currently submit and endorse.
    pub active: bool,
    /// Block height at which the oracle was registered.
    pub created_at: u64,
    /// Admin-maintained reputation score.
    pub reputation: u64,
}

/// A claim about a subject's measured magnitude for one initiative.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// The reported magnitude every endorser must agree on.
    pub magnitude: u64,
    /// Supporting metadata from the submitting oracle.
    pub metadata: String,
    /// Block height at which the claim was recorded.
    pub created_at: u64,
    /// Ids of the oracles that endorsed the claim, in endorsement order.
    pub endorsers: Vec<u64>,
    /// Set once the quorum threshold is met. Never cleared.
    pub consensus_reached: bool,
    /// First block height at which the claim is no longer valid.
    pub expires_at: u64,
}

impl Submission {
    /// Returns true if `oracle_id` has already endorsed this claim.
    pub fn has_endorsed(&self, oracle_id: u64) -> bool {
        self.endorsers.contains(&oracle_id)
    }

    /// Returns true if the claim is finalized and `height` is strictly before expiry.
    pub fn is_verified_at(&self, height: u64) -> bool {
        self.consensus_reached && height < self.expires_at
    }
}

/// Acceptance bounds for an initiative's magnitude, inclusive on both ends.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitiativeBounds {
    /// Smallest accepted magnitude.
    pub min: u64,
    /// Largest accepted magnitude.
    pub max: u64,
}

impl InitiativeBounds {
    /// Returns true if `magnitude` lies within `[min, max]`.
    pub fn contains(&self, magnitude: u64) -> bool {
        (self.min..=self.max).contains(&magnitude)
    }
}

/// The process-wide administrative record of the verification service.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AdminState {
    /// Holder of the pause authority.
    pub owner: AccountId,
    /// Holder of the registry and reputation authority.
    pub admin: AccountId,
    /// When set, `submit` and `add_endorsement` fail. Admin calls and reads are unaffected.
    pub paused: bool,
    /// The id the next registered oracle will receive.
    pub next_oracle_id: u64,
}

impl AdminState {
    /// The record written at genesis: the deployer holds both roles.
    pub fn genesis(deployer: AccountId) -> Self {
        Self {
            owner: deployer,
            admin: deployer,
            paused: false,
            next_oracle_id: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(consensus_reached: bool, expires_at: u64) -> Submission {
        Submission {
            magnitude: 500,
            metadata: String::new(),
            created_at: 0,
            endorsers: vec![3],
            consensus_reached,
            expires_at,
        }
    }

    #[test]
    fn test_verified_requires_consensus_and_strictly_before_expiry() {
        assert!(!submission(false, 100).is_verified_at(10));
        assert!(submission(true, 100).is_verified_at(99));
        assert!(!submission(true, 100).is_verified_at(100));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = InitiativeBounds { min: 100, max: 10_000 };
        assert!(bounds.contains(100));
        assert!(bounds.contains(10_000));
        assert!(!bounds.contains(99));
        assert!(!bounds.contains(10_001));
    }
}
