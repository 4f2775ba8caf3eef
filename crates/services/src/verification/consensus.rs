// Path: crates/services/src/verification/consensus.rs
use verdant_types::app::Submission;

/// Re-evaluates quorum for a claim and returns the resulting consensus flag.
///
/// Quorum holds once the claim has at least `quorum_threshold` distinct
/// endorsers. The flag is only ever set here, never cleared, so a claim
/// finalized under a lower threshold stays finalized if the threshold is later
/// raised.
pub fn evaluate_consensus(submission: &mut Submission, quorum_threshold: u32) -> bool {
    if !submission.consensus_reached && submission.endorsers.len() >= quorum_threshold as usize {
        submission.consensus_reached = true;
    }
    submission.consensus_reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn claim(endorsers: Vec<u64>) -> Submission {
        Submission {
            magnitude: 500,
            metadata: String::new(),
            created_at: 1,
            endorsers,
            consensus_reached: false,
            expires_at: 1441,
        }
    }

    #[test]
    fn test_quorum_is_reached_at_threshold() {
        let mut s = claim(vec![1]);
        assert!(!evaluate_consensus(&mut s, 2));
        s.endorsers.push(2);
        assert!(evaluate_consensus(&mut s, 2));
        assert!(s.consensus_reached);
    }

    #[test]
    fn test_raising_threshold_does_not_unfinalize() {
        let mut s = claim(vec![1, 2]);
        assert!(evaluate_consensus(&mut s, 2));
        assert!(evaluate_consensus(&mut s, 5));
    }

    proptest! {
        #[test]
        fn prop_flag_flips_once_and_never_reverts(
            threshold in 1u32..6,
            later_thresholds in proptest::collection::vec(1u32..12, 1..10),
        ) {
            let mut s = claim(vec![1]);
            let mut flips = 0;
            let mut previous = evaluate_consensus(&mut s, threshold);
            if previous {
                flips += 1;
            }
            for (i, t) in later_thresholds.into_iter().enumerate() {
                s.endorsers.push(i as u64 + 2);
                let now = evaluate_consensus(&mut s, t);
                prop_assert!(!previous || now, "consensus reverted");
                if now && !previous {
                    flips += 1;
                    prop_assert!(s.endorsers.len() >= t as usize);
                }
                previous = now;
            }
            prop_assert!(flips <= 1);
        }
    }
}
