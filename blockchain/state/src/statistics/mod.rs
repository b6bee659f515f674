/*
    Per-validator activity counters, tracked on a per-epoch basis: one record
    accumulates the present epoch, one retains the completed previous epoch.
    Block production, ticket and preimage introduction are credited to the
    block author; guarantees and assurances to the validators who signed them.
*/

use constants::Config;
use jam_types::{ActivityRecord, Extrinsic, Statistics, TimeSlot, ValidatorIndex};

pub fn process(
    statistics: &mut Statistics,
    extrinsic: &Extrinsic,
    author_index: ValidatorIndex,
    tau: TimeSlot,
    post_tau: TimeSlot,
    config: &Config,
) {
    if post_tau / config.epoch_length != tau / config.epoch_length {
        statistics.prev = std::mem::replace(
            &mut statistics.curr,
            vec![ActivityRecord::default(); config.validators_count as usize],
        );
    }

    if let Some(record) = statistics.curr.get_mut(author_index as usize) {
        record.blocks += 1;
        record.tickets += extrinsic.tickets.len() as u32;
        for preimage in &extrinsic.preimages {
            record.preimages += 1;
            record.preimages_size += preimage.blob.len() as u32;
        }
    }

    for guarantee in &extrinsic.guarantees {
        for attestation in guarantee.attestations.iter().flatten() {
            if let Some(record) = statistics.curr.get_mut(attestation.validator_index as usize) {
                record.guarantees += 1;
            }
        }
    }

    for assurance in &extrinsic.assurances {
        if let Some(record) = statistics.curr.get_mut(assurance.validator_index as usize) {
            record.assurances += 1;
        }
    }
}
