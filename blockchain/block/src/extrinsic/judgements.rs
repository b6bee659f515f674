/*
    The judgements extrinsic carries validator votes on the validity of
    previously guaranteed work reports. A positive supermajority admits the
    report hash to the allow set; a negative supermajority admits it to the
    ban set, evicts any matching report still parked on a core and punishes
    the guarantors who backed it. Anything in between is disputed and is
    surfaced through the judgements marker without touching state.
*/

use crypto::verify_ed25519;
use jam_types::{
    AvailabilityAssignments, Judgement, JudgementRecords, ValidatorKey, Vote, WorkReportHash,
};

/// Apply the block's judgements. Votes with malformed or invalid Ed25519
/// signatures are discarded before counting. Returns the disputed report
/// hashes for the header's judgements marker.
pub fn process(
    judgements: &[Judgement],
    records: &mut JudgementRecords,
    availability: &mut AvailabilityAssignments,
    curr_validators: &[ValidatorKey],
) -> Vec<WorkReportHash> {
    let mut disputed = Vec::new();

    for judgement in judgements {
        let votes: Vec<&Vote> = judgement
            .votes
            .iter()
            .filter(|vote| vote_is_valid(vote, &judgement.target, curr_validators))
            .collect();

        let total = votes.len();
        let positive = votes.iter().filter(|vote| vote.valid).count();

        if total > 0 && positive * 3 > total * 2 {
            // The allow and ban sets stay disjoint
            if !records.ban.contains(&judgement.target) {
                records.allow.insert(judgement.target);
            }
        } else if positive * 3 < total {
            if !records.allow.contains(&judgement.target) {
                records.ban.insert(judgement.target);
            }
            evict_report(&judgement.target, records, availability);
        } else {
            log::debug!("report {} is disputed", utils::print_hash!(judgement.target));
            disputed.push(judgement.target);
        }
    }

    disputed
}

fn vote_is_valid(vote: &Vote, target: &WorkReportHash, curr_validators: &[ValidatorKey]) -> bool {
    let Some(validator) = curr_validators.get(vote.index as usize) else {
        log::debug!("discarding vote with bad validator index {}", vote.index);
        return false;
    };

    let mut message = Vec::from(if vote.valid {
        &b"jam_valid"[..]
    } else {
        &b"jam_invalid"[..]
    });
    message.extend_from_slice(target);

    if !verify_ed25519(&vote.signature, &message, &validator.ed25519) {
        log::debug!("discarding vote with bad signature from validator {}", vote.index);
        return false;
    }

    true
}

// Clear every core slot holding the banned report and credit its guarantors
// to the punish set.
fn evict_report(
    target: &WorkReportHash,
    records: &mut JudgementRecords,
    availability: &mut AvailabilityAssignments,
) {
    for slot in availability.iter_mut() {
        let matches = slot
            .as_ref()
            .map(|assignment| assignment.report.authorizer_hash == *target)
            .unwrap_or(false);
        if matches {
            let assignment = slot.take().unwrap();
            log::debug!(
                "evicting banned report {} and punishing {} guarantors",
                utils::print_hash!(target),
                assignment.guarantors.len()
            );
            records.punish.extend(assignment.guarantors);
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use jam_types::{Assignment, AvailabilitySpec, RefineContext, WorkReport};
    use sp_core::{ed25519, Pair};

    fn validators(pairs: &[ed25519::Pair]) -> Vec<ValidatorKey> {
        pairs
            .iter()
            .map(|pair| ValidatorKey { ed25519: pair.public().0, ..Default::default() })
            .collect()
    }

    fn keyring(count: usize) -> Vec<ed25519::Pair> {
        (0..count)
            .map(|i| ed25519::Pair::from_seed(&[i as u8 + 1; 32]))
            .collect()
    }

    fn signed_vote(pair: &ed25519::Pair, index: u32, valid: bool, target: &[u8; 32]) -> Vote {
        let mut message = Vec::from(if valid { &b"jam_valid"[..] } else { &b"jam_invalid"[..] });
        message.extend_from_slice(target);
        Vote {
            valid,
            index,
            signature: pair.sign(&message).0.to_vec(),
        }
    }

    fn parked_report(authorizer_hash: [u8; 32]) -> Assignment {
        Assignment {
            report: WorkReport {
                authorizer_hash,
                output: Vec::new(),
                context: RefineContext {
                    anchor: [0u8; 32],
                    state_root: [0u8; 32],
                    beefy_root: [0u8; 32],
                    lookup_anchor: [0u8; 32],
                    lookup_anchor_slot: 0,
                    prerequisite: None,
                },
                package_spec: AvailabilitySpec {
                    hash: [0u8; 32],
                    length: 0,
                    erasure_root: [0u8; 32],
                    exports_root: [0u8; 32],
                },
                results: Vec::new(),
            },
            guarantors: vec![[0xAA; 32], [0xBB; 32]],
            timestamp: 0,
        }
    }

    #[test]
    fn positive_supermajority_allows() {
        let pairs = keyring(9);
        let validators = validators(&pairs);
        let target = [0x11; 32];

        // 7 of 9 valid votes
        let votes: Vec<Vote> = pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| signed_vote(pair, i as u32, i < 7, &target))
            .collect();

        let mut records = JudgementRecords::default();
        let mut availability: AvailabilityAssignments = vec![None];
        let disputed = process(
            &[Judgement { target, votes }],
            &mut records,
            &mut availability,
            &validators,
        );

        assert!(records.allow.contains(&target));
        assert!(!records.ban.contains(&target));
        assert!(disputed.is_empty());
    }

    #[test]
    fn negative_supermajority_bans_and_evicts() {
        let pairs = keyring(9);
        let validators = validators(&pairs);
        let target = [0x22; 32];

        // 2 of 9 valid votes
        let votes: Vec<Vote> = pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| signed_vote(pair, i as u32, i < 2, &target))
            .collect();

        let mut records = JudgementRecords::default();
        let mut availability: AvailabilityAssignments = vec![Some(parked_report(target)), None];
        process(
            &[Judgement { target, votes }],
            &mut records,
            &mut availability,
            &validators,
        );

        assert!(records.ban.contains(&target));
        assert!(!records.allow.contains(&target));
        assert!(availability[0].is_none());
        assert!(records.punish.contains(&[0xAA; 32]));
        assert!(records.punish.contains(&[0xBB; 32]));
    }

    #[test]
    fn split_vote_is_disputed() {
        let pairs = keyring(9);
        let validators = validators(&pairs);
        let target = [0x33; 32];

        // 5 of 9: neither supermajority
        let votes: Vec<Vote> = pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| signed_vote(pair, i as u32, i < 5, &target))
            .collect();

        let mut records = JudgementRecords::default();
        let mut availability: AvailabilityAssignments = vec![None];
        let disputed = process(
            &[Judgement { target, votes }],
            &mut records,
            &mut availability,
            &validators,
        );

        assert_eq!(disputed, vec![target]);
        assert!(records.allow.is_empty());
        assert!(records.ban.is_empty());
    }

    #[test]
    fn forged_votes_are_discarded_before_counting() {
        let pairs = keyring(3);
        let validators = validators(&pairs);
        let target = [0x44; 32];

        // One genuine positive vote plus two forgeries: alone it is a
        // unanimous positive verdict.
        let votes = vec![
            signed_vote(&pairs[0], 0, true, &target),
            Vote { valid: true, index: 1, signature: vec![0u8; 64] },
            Vote { valid: true, index: 99, signature: vec![0u8; 64] },
        ];

        let mut records = JudgementRecords::default();
        let mut availability: AvailabilityAssignments = vec![None];
        process(
            &[Judgement { target, votes }],
            &mut records,
            &mut availability,
            &validators,
        );

        assert!(records.allow.contains(&target));
    }

    #[test]
    fn all_votes_invalid_is_disputed() {
        let validators = validators(&keyring(3));
        let target = [0x55; 32];
        let votes = vec![Vote { valid: true, index: 0, signature: vec![0u8; 64] }];

        let mut records = JudgementRecords::default();
        let mut availability: AvailabilityAssignments = vec![None];
        let disputed = process(
            &[Judgement { target, votes }],
            &mut records,
            &mut availability,
            &validators,
        );

        assert_eq!(disputed, vec![target]);
        assert!(records.ban.is_empty());
    }
}
