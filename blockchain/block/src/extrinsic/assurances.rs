/*
    The assurances extrinsic is a sequence of assurance values, at most one
    per validator. Each assurance carries a flag per core; a set flag states
    that the validator holds the data backing the report currently parked on
    that core. A report whose core collects flags from a clear supermajority
    of validators becomes available: it leaves its slot and is queued for
    accumulation.
*/

use codec::Encode;
use crypto::SignatureVerifier;
use jam_types::{Assurance, AvailabilityAssignments, CoreIndex, ValidatorKey, WorkReport};

/// Count the block's assurance votes and promote every report backed by more
/// than two thirds of the validator set. Invalid assurances are silently
/// dropped. Returns the newly available reports in core order, each paired
/// with the core it was promoted from.
pub fn process(
    assurances: &[Assurance],
    availability: &mut AvailabilityAssignments,
    curr_validators: &[ValidatorKey],
    verifier: &dyn SignatureVerifier,
) -> Vec<(CoreIndex, WorkReport)> {
    let mut votes = vec![0usize; availability.len()];

    for assurance in assurances {
        let Some(validator) = curr_validators.get(assurance.validator_index as usize) else {
            log::debug!("dropping assurance with bad validator index {}", assurance.validator_index);
            continue;
        };

        // The signed message is the anchor followed by the flag bitstring
        let mut message = Vec::with_capacity(32 + assurance.flags.len());
        assurance.anchor.encode_to(&mut message);
        for flag in &assurance.flags {
            flag.encode_to(&mut message);
        }

        if !verifier.vrf_verify(&validator.bandersnatch, &message, &assurance.signature) {
            log::debug!("dropping assurance with bad signature from validator {}", assurance.validator_index);
            continue;
        }

        for (core, flag) in assurance.flags.iter().enumerate().take(availability.len()) {
            if !flag {
                continue;
            }
            let engaged = availability[core]
                .as_ref()
                .map(|assignment| assignment.report.authorizer_hash == assurance.anchor)
                .unwrap_or(false);
            if engaged {
                votes[core] += 1;
            }
        }
    }

    let mut available = Vec::new();
    for (core, count) in votes.iter().enumerate() {
        if count * 3 > curr_validators.len() * 2 {
            if let Some(assignment) = availability[core].take() {
                log::debug!(
                    "report {} on core {} is now available ({} votes)",
                    utils::print_hash!(assignment.report.authorizer_hash),
                    core,
                    count
                );
                available.push((core as CoreIndex, assignment.report));
            }
        }
    }

    available
}
