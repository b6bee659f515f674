/*
    The guarantees extrinsic is a series of guarantees, each a tuple of a work
    report, a core index, a timeslot and up to three validator attestations.
    A guarantee installs its report into the core's slot provided at least
    two attestations verify and the slot is empty or its present occupant has
    aged past the staleness window. A conflicting guarantee against a live
    slot is dropped.
*/

use codec::Encode;
use constants::node::MIN_GUARANTEE_CREDENTIALS;
use constants::Config;
use crypto::SignatureVerifier;
use jam_types::{
    Assignment, AvailabilityAssignments, Ed25519Public, Guarantee, TimeSlot, ValidatorKey,
};

/// Write the block's guaranteed reports into their per-core slots. Invalid
/// items (bad core index, too few valid attestations, conflict with a live
/// slot) are silently dropped.
pub fn process(
    guarantees: &[Guarantee],
    availability: &mut AvailabilityAssignments,
    tau: TimeSlot,
    curr_validators: &[ValidatorKey],
    config: &Config,
    verifier: &dyn SignatureVerifier,
) {
    for guarantee in guarantees {
        let core = guarantee.core_index as usize;
        if core >= availability.len() {
            log::debug!(
                "dropping guarantee: {}",
                jam_types::ProcessError::CoreIndexOutOfRange(guarantee.core_index)
            );
            continue;
        }

        // Attestations sign the report's serialization followed by the core index
        let mut message = guarantee.report.encode();
        guarantee.core_index.encode_to(&mut message);

        let guarantors = valid_attesters(guarantee, &message, curr_validators, verifier);
        if guarantors.len() < MIN_GUARANTEE_CREDENTIALS {
            log::debug!(
                "dropping guarantee for core {} with {} valid attestations",
                guarantee.core_index,
                guarantors.len()
            );
            continue;
        }

        let slot = &mut availability[core];
        let stale = match slot {
            None => true,
            Some(assignment) => tau >= assignment.timestamp + config.report_staleness,
        };
        if !stale {
            log::debug!("core {} is engaged, dropping conflicting guarantee", guarantee.core_index);
            continue;
        }

        log::debug!(
            "installing report {} on core {}",
            utils::print_hash!(guarantee.report.authorizer_hash),
            guarantee.core_index
        );
        *slot = Some(Assignment {
            report: guarantee.report.clone(),
            guarantors,
            timestamp: guarantee.slot,
        });
    }
}

fn valid_attesters(
    guarantee: &Guarantee,
    message: &[u8],
    curr_validators: &[ValidatorKey],
    verifier: &dyn SignatureVerifier,
) -> Vec<Ed25519Public> {
    let mut guarantors = Vec::new();

    for attestation in guarantee.attestations.iter().flatten() {
        let Some(validator) = curr_validators.get(attestation.validator_index as usize) else {
            continue;
        };
        if verifier.vrf_verify(&validator.bandersnatch, message, &attestation.signature) {
            guarantors.push(validator.ed25519);
        }
    }

    guarantors
}
