// Path: crates/services/src/verification/tests.rs
use super::*;
use crate::initiatives::StaticInitiativeCatalog;
use std::sync::Arc;
use verdant_api::services::access::ServiceDirectory;
use verdant_api::services::BlockchainService;
use verdant_api::state::{write_record, NamespacedStateAccess, ReadOnlyNamespacedStateAccess};
use verdant_storage::MemoryStore;
use verdant_types::app::VerificationEvent;
use verdant_types::config::{default_service_policies, InitiativeConfig, ServicePolicy};
use verdant_types::error::VerificationError;
use verdant_types::keys::submission_key;

const DEPLOYER: AccountId = AccountId([0xd0; 32]);
const ORACLE_A: AccountId = AccountId([0xa1; 32]);
const ORACLE_B: AccountId = AccountId([0xb2; 32]);
const ORACLE_C: AccountId = AccountId([0xc3; 32]);
const STRANGER: AccountId = AccountId([0xee; 32]);
const USER1: AccountId = AccountId([0x01; 32]);
const USER2: AccountId = AccountId([0x02; 32]);

type CallResult<R> = Result<R, VerificationError>;

/// Drives the service directly over a namespaced in-memory store, the same
/// way the execution layer does minus the overlay.
struct Harness {
    store: MemoryStore,
    services: ServiceDirectory,
    policy: ServicePolicy,
    height: u64,
    events: Vec<VerificationEvent>,
}

impl Harness {
    fn new() -> Self {
        Self::build(VerificationParams::default(), true)
    }

    fn with_params(params: VerificationParams) -> Self {
        Self::build(params, true)
    }

    fn build(params: VerificationParams, with_catalog: bool) -> Self {
        let mut store = MemoryStore::new();
        let mut genesis = VerificationService::genesis_entries(DEPLOYER).unwrap();
        genesis.extend(
            StaticInitiativeCatalog::genesis_entries(&[InitiativeConfig {
                id: 1,
                min: 100,
                max: 10_000,
            }])
            .unwrap(),
        );
        store.batch_apply(&genesis, &[]).unwrap();

        let mut services: Vec<Arc<dyn BlockchainService>> =
            vec![Arc::new(VerificationService::new(params))];
        if with_catalog {
            services.push(Arc::new(StaticInitiativeCatalog));
        }
        Self {
            store,
            services: ServiceDirectory::new(services),
            policy: default_service_policies().remove(SERVICE_ID).unwrap(),
            height: 1,
            events: Vec::new(),
        }
    }

    fn call<R>(
        &mut self,
        signer: AccountId,
        f: impl FnOnce(&VerificationService, &mut dyn StateAccess, &mut TxContext) -> Result<R, TransactionError>,
    ) -> CallResult<R> {
        let service = self.services.get::<VerificationService>().unwrap();
        let mut ctx = TxContext::new(self.height, signer, &self.services);
        let mut state = NamespacedStateAccess::new(&mut self.store, SERVICE_ID, &self.policy);
        match f(service, &mut state, &mut ctx) {
            Ok(v) => {
                self.events.extend(ctx.events);
                Ok(v)
            }
            Err(e) => {
                assert!(ctx.events.is_empty(), "rejected call emitted events");
                Err(e
                    .as_verification()
                    .unwrap_or_else(|| panic!("unexpected error: {e}")))
            }
        }
    }

    fn query<R>(
        &self,
        f: impl FnOnce(&VerificationService, &dyn StateAccess, &TxContext) -> Result<R, TransactionError>,
    ) -> CallResult<R> {
        let service = self.services.get::<VerificationService>().unwrap();
        let ctx = TxContext::for_query(self.height, &self.services);
        let view = ReadOnlyNamespacedStateAccess::new(&self.store, SERVICE_ID, &self.policy);
        f(service, &view, &ctx).map_err(|e| e.as_verification().unwrap())
    }

    fn dump(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.store
            .prefix_scan(b"")
            .unwrap()
            .map(|row| {
                let (k, v) = row.unwrap();
                (k.to_vec(), v.to_vec())
            })
            .collect()
    }

    fn add_oracle(&mut self, reporter: AccountId, name: &str) -> CallResult<u64> {
        let params = AddOracleParams {
            reporter,
            name: name.to_string(),
            description: format!("{name} field auditor"),
        };
        self.call(DEPLOYER, |s, st, ctx| s.add_oracle(st, params, ctx))
    }

    fn submit(&mut self, signer: AccountId, oracle_id: u64, magnitude: u64) -> CallResult<bool> {
        self.submit_with(
            signer,
            SubmitParams {
                subject: USER1,
                initiative_id: 1,
                magnitude,
                metadata: "meter export 2026-Q3".into(),
                oracle_id,
            },
        )
    }

    fn submit_with(&mut self, signer: AccountId, params: SubmitParams) -> CallResult<bool> {
        self.call(signer, |s, st, ctx| s.submit(st, params, ctx))
    }

    fn endorse(
        &mut self,
        signer: AccountId,
        oracle_id: u64,
        submission_id: u64,
        agreed_magnitude: u64,
    ) -> CallResult<bool> {
        self.endorse_with(
            signer,
            AddEndorsementParams {
                subject: USER1,
                initiative_id: 1,
                submission_id,
                oracle_id,
                agreed_magnitude,
                metadata: String::new(),
            },
        )
    }

    fn endorse_with(&mut self, signer: AccountId, params: AddEndorsementParams) -> CallResult<bool> {
        self.call(signer, |s, st, ctx| s.add_endorsement(st, params, ctx))
    }

    fn submission(&self, submission_id: u64) -> Option<Submission> {
        let r = SubmissionRef {
            subject: USER1,
            initiative_id: 1,
            submission_id,
        };
        self.query(|s, st, ctx| s.get_submission(st, r, ctx)).unwrap()
    }

    fn verified(&self, submission_id: u64) -> CallResult<u64> {
        let r = SubmissionRef {
            subject: USER1,
            initiative_id: 1,
            submission_id,
        };
        self.query(|s, st, ctx| s.get_verified_magnitude(st, r, ctx))
    }

    fn pause(&mut self, signer: AccountId) -> CallResult<()> {
        self.call(signer, |s, st, ctx| s.pause(st, ctx))
    }

    fn unpause(&mut self, signer: AccountId) -> CallResult<()> {
        self.call(signer, |s, st, ctx| s.unpause(st, ctx))
    }
}

/// A harness with oracles A (id 1) and B (id 2) registered.
fn with_two_oracles() -> Harness {
    let mut h = Harness::new();
    assert_eq!(h.add_oracle(ORACLE_A, "A"), Ok(1));
    assert_eq!(h.add_oracle(ORACLE_B, "B"), Ok(2));
    h
}

// --- Scenarios ---

#[test]
fn test_submit_endorse_verify_then_expire() {
    let mut h = Harness::new();
    assert_eq!(h.add_oracle(ORACLE_A, "A"), Ok(1));

    assert_eq!(h.submit(ORACLE_A, 1, 500), Ok(false));
    let row = h.submission(1).unwrap();
    assert_eq!(row.endorsers, vec![1]);
    assert!(!row.consensus_reached);
    assert_eq!(h.verified(1), Err(VerificationError::InvalidData));

    assert_eq!(h.add_oracle(ORACLE_B, "B"), Ok(2));
    assert_eq!(h.endorse(ORACLE_B, 2, 1, 500), Ok(true));
    assert_eq!(h.verified(1), Ok(500));

    let expires_at = h.submission(1).unwrap().expires_at;
    assert_eq!(expires_at, 1 + 1440);
    h.height = expires_at - 1;
    assert_eq!(h.verified(1), Ok(500));
    h.height = expires_at;
    assert_eq!(h.verified(1), Err(VerificationError::InvalidData));
}

#[test]
fn test_endorsement_with_different_magnitude_is_rejected() {
    let mut h = with_two_oracles();
    h.submit(ORACLE_A, 1, 500).unwrap();
    let before = h.dump();

    assert_eq!(h.endorse(ORACLE_B, 2, 1, 600), Err(VerificationError::InvalidData));
    assert_eq!(h.submission(1).unwrap().endorsers, vec![1]);
    assert_eq!(h.dump(), before);
}

// --- Oracle registry ---

#[test]
fn test_oracle_ids_are_sequential_and_never_reused() {
    let mut h = with_two_oracles();
    assert_eq!(
        h.call(DEPLOYER, |s, st, ctx| s.remove_oracle(st, OracleIdParams { oracle_id: 1 }, ctx)),
        Ok(true)
    );
    assert_eq!(h.add_oracle(ORACLE_C, "C"), Ok(3));

    let removed = h
        .query(|s, st, ctx| s.get_oracle(st, OracleIdParams { oracle_id: 1 }, ctx))
        .unwrap()
        .unwrap();
    assert!(!removed.active);
    assert_eq!(removed.reporter, ORACLE_A);

    let admin = h.query(|s, st, ctx| s.get_admin_state(st, ctx)).unwrap();
    assert_eq!(admin.next_oracle_id, 4);
}

#[test]
fn test_new_oracle_has_default_reputation_and_creation_height() {
    let mut h = Harness::new();
    h.height = 42;
    let id = h.add_oracle(ORACLE_A, "A").unwrap();
    let oracle = h
        .query(|s, st, ctx| s.get_oracle(st, OracleIdParams { oracle_id: id }, ctx))
        .unwrap()
        .unwrap();
    assert!(oracle.active);
    assert_eq!(oracle.reputation, 100);
    assert_eq!(oracle.created_at, 42);
    assert_eq!(oracle.name, "A");
}

#[test]
fn test_active_reporter_cannot_be_registered_twice() {
    let mut h = with_two_oracles();
    let before = h.dump();
    assert_eq!(
        h.add_oracle(ORACLE_A, "A again"),
        Err(VerificationError::OracleAlreadyExists)
    );
    assert_eq!(h.dump(), before);
}

#[test]
fn test_reporter_can_be_registered_again_after_removal() {
    let mut h = with_two_oracles();
    h.call(DEPLOYER, |s, st, ctx| s.remove_oracle(st, OracleIdParams { oracle_id: 1 }, ctx))
        .unwrap();
    assert_eq!(h.add_oracle(ORACLE_A, "A v2"), Ok(3));

    let latest = h
        .query(|s, st, ctx| s.get_oracle_by_reporter(st, ReporterParams { reporter: ORACLE_A }, ctx))
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, 3);
    assert!(latest.active);

    // The old entry is retained and still cannot be used.
    assert_eq!(h.submit(ORACLE_A, 1, 500), Err(VerificationError::NotAuthorized));
    assert_eq!(h.submit(ORACLE_A, 3, 500), Ok(false));
}

#[test]
fn test_list_oracles_is_ordered_by_id() {
    let mut h = with_two_oracles();
    h.add_oracle(ORACLE_C, "C").unwrap();
    let ids: Vec<u64> = h
        .query(|s, st, ctx| s.list_oracles(st, ctx))
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_active_oracle_count_skips_removed_oracles() {
    let mut h = with_two_oracles();
    assert_eq!(h.query(|_, st, _| active_oracle_count(st)), Ok(2));
    h.call(DEPLOYER, |s, st, ctx| s.remove_oracle(st, OracleIdParams { oracle_id: 1 }, ctx))
        .unwrap();
    assert_eq!(h.query(|_, st, _| active_oracle_count(st)), Ok(1));
}

#[test]
fn test_registry_mutations_require_admin() {
    let mut h = with_two_oracles();
    let before = h.dump();

    let params = AddOracleParams {
        reporter: ORACLE_C,
        name: "C".into(),
        description: String::new(),
    };
    assert_eq!(
        h.call(STRANGER, |s, st, ctx| s.add_oracle(st, params, ctx)),
        Err(VerificationError::NotAuthorized)
    );
    assert_eq!(
        h.call(STRANGER, |s, st, ctx| s.remove_oracle(st, OracleIdParams { oracle_id: 1 }, ctx)),
        Err(VerificationError::NotAuthorized)
    );
    let rep = UpdateReputationParams {
        oracle_id: 1,
        reputation: 5,
    };
    assert_eq!(
        h.call(ORACLE_A, |s, st, ctx| s.update_reputation(st, rep, ctx)),
        Err(VerificationError::NotAuthorized)
    );
    assert_eq!(h.dump(), before);
}

#[test]
fn test_unknown_oracle_is_reported_to_admin() {
    let mut h = Harness::new();
    assert_eq!(
        h.call(DEPLOYER, |s, st, ctx| s.remove_oracle(st, OracleIdParams { oracle_id: 9 }, ctx)),
        Err(VerificationError::OracleNotFound)
    );
    let rep = UpdateReputationParams {
        oracle_id: 9,
        reputation: 1,
    };
    assert_eq!(
        h.call(DEPLOYER, |s, st, ctx| s.update_reputation(st, rep, ctx)),
        Err(VerificationError::OracleNotFound)
    );
}

#[test]
fn test_reputation_is_overwritten_without_bounds() {
    let mut h = with_two_oracles();
    for reputation in [u64::MAX, 0, 250] {
        let params = UpdateReputationParams {
            oracle_id: 2,
            reputation,
        };
        assert_eq!(
            h.call(DEPLOYER, |s, st, ctx| s.update_reputation(st, params, ctx)),
            Ok(true)
        );
        let oracle = h
            .query(|s, st, ctx| s.get_oracle(st, OracleIdParams { oracle_id: 2 }, ctx))
            .unwrap()
            .unwrap();
        assert_eq!(oracle.reputation, reputation);
    }
}

// --- Submission preconditions ---

#[test]
fn test_submit_checks_pause_before_oracle() {
    let mut h = Harness::new();
    h.pause(DEPLOYER).unwrap();
    assert_eq!(h.submit(ORACLE_A, 99, 5), Err(VerificationError::ContractPaused));
}

#[test]
fn test_submit_checks_oracle_before_initiative() {
    let mut h = with_two_oracles();
    let params = SubmitParams {
        subject: USER1,
        initiative_id: 77,
        magnitude: 5,
        metadata: "x".repeat(1000),
        oracle_id: 99,
    };
    assert_eq!(
        h.submit_with(ORACLE_A, params.clone()),
        Err(VerificationError::OracleNotFound)
    );
    // Oracle 1 belongs to A, not B.
    assert_eq!(
        h.submit_with(ORACLE_B, SubmitParams { oracle_id: 1, ..params.clone() }),
        Err(VerificationError::NotAuthorized)
    );
    assert_eq!(
        h.submit_with(ORACLE_A, SubmitParams { oracle_id: 1, ..params }),
        Err(VerificationError::InitiativeNotFound)
    );
}

#[test]
fn test_inactive_oracle_cannot_submit() {
    let mut h = with_two_oracles();
    h.call(DEPLOYER, |s, st, ctx| s.remove_oracle(st, OracleIdParams { oracle_id: 2 }, ctx))
        .unwrap();
    assert_eq!(h.submit(ORACLE_B, 2, 500), Err(VerificationError::NotAuthorized));
}

#[test]
fn test_magnitude_bounds_are_inclusive() {
    let mut h = with_two_oracles();
    let before = h.dump();
    assert_eq!(
        h.submit(ORACLE_A, 1, 99),
        Err(VerificationError::InvalidEmissionReduction)
    );
    assert_eq!(
        h.submit(ORACLE_A, 1, 10_001),
        Err(VerificationError::InvalidEmissionReduction)
    );
    assert_eq!(h.dump(), before);

    assert_eq!(h.submit(ORACLE_A, 1, 100), Ok(false));
    assert_eq!(h.submit(ORACLE_A, 1, 10_000), Ok(false));
}

#[test]
fn test_bounds_are_checked_before_metadata() {
    let mut h = with_two_oracles();
    let params = SubmitParams {
        subject: USER1,
        initiative_id: 1,
        magnitude: 1,
        metadata: "x".repeat(257),
        oracle_id: 1,
    };
    assert_eq!(
        h.submit_with(ORACLE_A, params.clone()),
        Err(VerificationError::InvalidEmissionReduction)
    );
    assert_eq!(
        h.submit_with(ORACLE_A, SubmitParams { magnitude: 500, ..params.clone() }),
        Err(VerificationError::InvalidMetadata)
    );
    assert_eq!(
        h.submit_with(
            ORACLE_A,
            SubmitParams {
                magnitude: 500,
                metadata: "x".repeat(256),
                ..params
            }
        ),
        Ok(false)
    );
}

#[test]
fn test_missing_catalog_means_unknown_initiative() {
    let mut h = Harness::build(VerificationParams::default(), false);
    h.add_oracle(ORACLE_A, "A").unwrap();
    assert_eq!(
        h.submit(ORACLE_A, 1, 500),
        Err(VerificationError::InitiativeNotFound)
    );
}

// --- Ledger sequencing ---

#[test]
fn test_sequence_numbers_start_at_one_per_pair() {
    let mut h = with_two_oracles();
    for _ in 0..3 {
        h.submit(ORACLE_A, 1, 500).unwrap();
    }
    h.submit_with(
        ORACLE_B,
        SubmitParams {
            subject: USER2,
            initiative_id: 1,
            magnitude: 700,
            metadata: String::new(),
            oracle_id: 2,
        },
    )
    .unwrap();

    let pair = |subject| SubmissionPairParams {
        subject,
        initiative_id: 1,
    };
    assert_eq!(
        h.query(|s, st, ctx| s.get_submission_count(st, pair(USER1), ctx)),
        Ok(3)
    );
    assert_eq!(
        h.query(|s, st, ctx| s.get_submission_count(st, pair(USER2), ctx)),
        Ok(1)
    );
    let ids: Vec<u64> = h
        .query(|s, st, ctx| s.list_submissions(st, pair(USER1), ctx))
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let other = SubmissionPairParams {
        subject: USER1,
        initiative_id: 2,
    };
    assert_eq!(
        h.query(|s, st, ctx| s.get_submission_count(st, other, ctx)),
        Ok(0)
    );
}

#[test]
fn test_duplicate_slot_is_rejected() {
    let mut h = with_two_oracles();
    // Occupy slot 1 behind the counter's back.
    let row = Submission {
        magnitude: 1,
        metadata: String::new(),
        created_at: 0,
        endorsers: vec![2],
        consensus_reached: false,
        expires_at: 10,
    };
    {
        let mut state = NamespacedStateAccess::new(&mut h.store, SERVICE_ID, &h.policy);
        write_record(&mut state, &submission_key(&USER1, 1, 1), &row).unwrap();
    }
    assert_eq!(
        h.submit(ORACLE_A, 1, 500),
        Err(VerificationError::DuplicateSubmission)
    );
    assert_eq!(h.submission(1), Some(row));
}

// --- Endorsements ---

#[test]
fn test_oracle_cannot_endorse_twice() {
    let mut h = with_two_oracles();
    h.submit(ORACLE_A, 1, 500).unwrap();

    assert_eq!(
        h.endorse(ORACLE_A, 1, 1, 500),
        Err(VerificationError::DuplicateSubmission)
    );
    assert_eq!(h.endorse(ORACLE_B, 2, 1, 500), Ok(true));
    assert_eq!(
        h.endorse(ORACLE_B, 2, 1, 500),
        Err(VerificationError::DuplicateSubmission)
    );
    assert_eq!(h.submission(1).unwrap().endorsers, vec![1, 2]);
}

#[test]
fn test_endorsing_missing_row_is_invalid_data() {
    let mut h = with_two_oracles();
    assert_eq!(h.endorse(ORACLE_B, 2, 1, 500), Err(VerificationError::InvalidData));
}

#[test]
fn test_endorsement_requires_active_matching_oracle() {
    let mut h = with_two_oracles();
    h.add_oracle(ORACLE_C, "C").unwrap();
    h.submit(ORACLE_A, 1, 500).unwrap();
    h.call(DEPLOYER, |s, st, ctx| s.remove_oracle(st, OracleIdParams { oracle_id: 3 }, ctx))
        .unwrap();
    let before = h.dump();

    assert_eq!(h.endorse(ORACLE_B, 9, 1, 500), Err(VerificationError::OracleNotFound));
    // Oracle A acting as oracle 2.
    assert_eq!(h.endorse(ORACLE_A, 2, 1, 500), Err(VerificationError::NotAuthorized));
    assert_eq!(h.endorse(STRANGER, 2, 1, 500), Err(VerificationError::NotAuthorized));
    assert_eq!(h.endorse(ORACLE_C, 3, 1, 500), Err(VerificationError::NotAuthorized));

    assert_eq!(h.dump(), before);
    assert_eq!(h.submission(1).unwrap().endorsers, vec![1]);
}

#[test]
fn test_endorsement_checks_duplicate_before_metadata() {
    let mut h = with_two_oracles();
    h.submit(ORACLE_A, 1, 500).unwrap();
    let params = AddEndorsementParams {
        subject: USER1,
        initiative_id: 1,
        submission_id: 1,
        oracle_id: 1,
        agreed_magnitude: 500,
        metadata: "y".repeat(300),
    };
    assert_eq!(
        h.endorse_with(ORACLE_A, params.clone()),
        Err(VerificationError::DuplicateSubmission)
    );
    assert_eq!(
        h.endorse_with(ORACLE_B, AddEndorsementParams { oracle_id: 2, ..params }),
        Err(VerificationError::InvalidMetadata)
    );
}

#[test]
fn test_full_endorser_list_is_rejected() {
    let mut h = Harness::with_params(VerificationParams {
        max_endorsers: 2,
        ..Default::default()
    });
    h.add_oracle(ORACLE_A, "A").unwrap();
    h.add_oracle(ORACLE_B, "B").unwrap();
    h.add_oracle(ORACLE_C, "C").unwrap();
    h.submit(ORACLE_A, 1, 500).unwrap();
    h.endorse(ORACLE_B, 2, 1, 500).unwrap();

    assert_eq!(h.endorse(ORACLE_C, 3, 1, 500), Err(VerificationError::InvalidData));
    assert_eq!(h.submission(1).unwrap().endorsers, vec![1, 2]);
}

#[test]
fn test_consensus_flips_once_and_stays() {
    let mut h = with_two_oracles();
    h.add_oracle(ORACLE_C, "C").unwrap();
    h.submit(ORACLE_A, 1, 500).unwrap();
    assert_eq!(h.endorse(ORACLE_B, 2, 1, 500), Ok(true));
    assert_eq!(h.endorse(ORACLE_C, 3, 1, 500), Ok(true));
    assert!(h.submission(1).unwrap().consensus_reached);

    let flips = h
        .events
        .iter()
        .filter(|e| matches!(e, VerificationEvent::ConsensusReached { .. }))
        .count();
    assert_eq!(flips, 1);
}

#[test]
fn test_single_oracle_quorum_finalizes_on_submit() {
    let mut h = Harness::with_params(VerificationParams {
        quorum_threshold: 1,
        ..Default::default()
    });
    h.add_oracle(ORACLE_A, "A").unwrap();
    assert_eq!(h.submit(ORACLE_A, 1, 500), Ok(true));
    assert_eq!(h.verified(1), Ok(500));
}

// --- Administrative control ---

#[test]
fn test_pause_blocks_mutators_but_not_reads() {
    let mut h = with_two_oracles();
    h.submit(ORACLE_A, 1, 500).unwrap();
    h.endorse(ORACLE_B, 2, 1, 500).unwrap();

    h.pause(DEPLOYER).unwrap();
    assert_eq!(h.query(|s, st, ctx| s.is_paused(st, ctx)), Ok(true));
    assert_eq!(h.submit(ORACLE_A, 1, 500), Err(VerificationError::ContractPaused));
    assert_eq!(h.endorse(ORACLE_A, 1, 1, 500), Err(VerificationError::ContractPaused));
    assert_eq!(h.endorse(ORACLE_B, 2, 9, 1), Err(VerificationError::ContractPaused));

    assert_eq!(h.verified(1), Ok(500));
    assert!(h.submission(1).is_some());

    h.unpause(DEPLOYER).unwrap();
    assert_eq!(h.submit(ORACLE_A, 1, 500), Ok(false));
}

#[test]
fn test_admin_calls_stay_available_while_paused() {
    let mut h = with_two_oracles();
    h.pause(DEPLOYER).unwrap();

    assert_eq!(h.add_oracle(ORACLE_C, "C"), Ok(3));
    assert_eq!(
        h.call(DEPLOYER, |s, st, ctx| s.remove_oracle(st, OracleIdParams { oracle_id: 3 }, ctx)),
        Ok(true)
    );
    assert_eq!(
        h.call(DEPLOYER, |s, st, ctx| s.update_reputation(
            st,
            UpdateReputationParams {
                oracle_id: 1,
                reputation: 7
            },
            ctx
        )),
        Ok(true)
    );
    assert_eq!(h.query(|s, st, ctx| s.is_paused(st, ctx)), Ok(true));
}

#[test]
fn test_roles_are_separate_after_transfer() {
    let mut h = Harness::new();
    let new_admin = AccountId([0x0a; 32]);
    let new_owner = AccountId([0x0b; 32]);

    h.call(DEPLOYER, |s, st, ctx| s.transfer_admin(st, TransferAdminParams { new_admin }, ctx))
        .unwrap();
    assert_eq!(h.add_oracle(ORACLE_A, "A"), Err(VerificationError::NotAuthorized));
    let params = AddOracleParams {
        reporter: ORACLE_A,
        name: "A".into(),
        description: String::new(),
    };
    assert_eq!(h.call(new_admin, |s, st, ctx| s.add_oracle(st, params, ctx)), Ok(1));

    // Pausing stays with the owner.
    assert_eq!(h.pause(new_admin), Err(VerificationError::NotAuthorized));
    h.call(DEPLOYER, |s, st, ctx| {
        s.transfer_ownership(st, TransferOwnershipParams { new_owner }, ctx)
    })
    .unwrap();
    assert_eq!(h.pause(DEPLOYER), Err(VerificationError::NotAuthorized));
    assert_eq!(h.pause(new_owner), Ok(()));

    let admin = h.query(|s, st, ctx| s.get_admin_state(st, ctx)).unwrap();
    assert_eq!(admin.owner, new_owner);
    assert_eq!(admin.admin, new_admin);
    assert!(admin.paused);
}

// --- Events and dispatch ---

#[test]
fn test_successful_calls_emit_events_in_order() {
    let mut h = with_two_oracles();
    h.events.clear();
    h.submit(ORACLE_A, 1, 500).unwrap();
    h.endorse(ORACLE_B, 2, 1, 500).unwrap();

    assert_eq!(
        h.events,
        vec![
            VerificationEvent::SubmissionRecorded {
                subject: USER1,
                initiative_id: 1,
                submission_id: 1,
                oracle_id: 1,
                magnitude: 500,
            },
            VerificationEvent::EndorsementAdded {
                subject: USER1,
                initiative_id: 1,
                submission_id: 1,
                oracle_id: 2,
            },
            VerificationEvent::ConsensusReached {
                subject: USER1,
                initiative_id: 1,
                submission_id: 1,
                magnitude: 500,
            },
        ]
    );
}

#[tokio::test]
async fn test_dispatch_decodes_params_and_encodes_result() {
    let mut h = with_two_oracles();
    let service = h.services.get::<VerificationService>().unwrap();
    let mut ctx = TxContext::new(h.height, ORACLE_A, &h.services);
    let mut state = NamespacedStateAccess::new(&mut h.store, SERVICE_ID, &h.policy);

    let params = codec::to_bytes_canonical(&SubmitParams {
        subject: USER1,
        initiative_id: 1,
        magnitude: 500,
        metadata: String::new(),
        oracle_id: 1,
    })
    .unwrap();
    let out = service
        .handle_service_call(&mut state, "submit@v1", &params, &mut ctx)
        .await
        .unwrap();
    let reached: bool = codec::from_bytes_canonical(&out).unwrap();
    assert!(!reached);

    let err = service
        .handle_service_call(&mut state, "submit@v1", &[0xff], &mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, TransactionError::Deserialization(_)));

    let err = service
        .handle_service_call(&mut state, "mint@v1", &[], &mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, TransactionError::Unsupported(_)));
}

#[test]
fn test_queries_cannot_write() {
    let h = with_two_oracles();
    let policy = h.policy.clone();
    let mut view = ReadOnlyNamespacedStateAccess::new(&h.store, SERVICE_ID, &policy);
    assert!(view.insert(b"admin", b"x").is_err());
}
