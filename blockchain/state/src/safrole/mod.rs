/*
    Safrole limits the possible author of any block within a timeslot to a
    single key-holder from a prespecified validator set, with a high degree of
    anonymity for future slots. Once per epoch it fixes a sequence of sealing
    keys, one per slot: tickets submitted through the epochal contest become
    anonymous sealing pseudonyms, and when the contest is undersubscribed the
    sequence is padded with fallback keys drawn from the active set using
    on-chain entropy.
*/

use constants::Config;
use crypto::{blake2b, SignatureVerifier};
use jam_types::{
    BandersnatchPublic, EpochMark, Header, OpaqueHash, ProcessError, SafroleInput, SafroleOutput,
    SafroleState, Ticket, TicketsMark, TimeSlot, ValidatorKey,
};

use crate::entropy;

/// One Safrole transition: advance the timeslot, accumulate entropy, fold in
/// the ticket extrinsics, and on an epoch boundary rotate the validator sets
/// and fix the next sealing-key sequence.
pub fn process(
    input: &SafroleInput,
    state: &mut SafroleState,
    config: &Config,
    verifier: &dyn SignatureVerifier,
) -> SafroleOutput {
    state.timeslot = input.slot;

    let mut pool = jam_types::EntropyPool { buf: state.entropy };
    entropy::rotate(&mut pool, input.entropy);
    state.entropy = pool.buf;

    // Verify each ticket against the active ring; invalid proofs carry no
    // further consequence.
    let ring: Vec<BandersnatchPublic> =
        state.curr_validators.iter().map(|v| v.bandersnatch).collect();
    for ticket in &input.extrinsics {
        match verifier.ring_vrf_verify(&ring, &state.entropy[2], &ticket.proof) {
            Some(output) => state.tickets_accumulator.push(Ticket {
                entry_index: ticket.entry_index,
                proof: output.to_vec(),
            }),
            None => log::debug!("dropping invalid ticket with entry index {}", ticket.entry_index),
        }
    }

    if input.slot % config.epoch_length != 0 {
        return SafroleOutput { epoch_mark: None, tickets_mark: None };
    }

    log::info!("epoch boundary at slot {}", input.slot);

    state.prev_validators = std::mem::replace(
        &mut state.curr_validators,
        std::mem::replace(&mut state.next_validators, state.designed_validators.clone()),
    );

    let contest = std::mem::take(&mut state.tickets_accumulator);
    let sealers = derive_sealers(&contest, &state.curr_validators, &state.entropy[2], config.epoch_length);
    state.tickets_or_keys.keys = sealer_keys(&sealers);

    SafroleOutput {
        epoch_mark: Some(EpochMark {
            epoch_randomness: state.entropy[1],
            validators: state.curr_validators.iter().map(|v| v.bandersnatch).collect(),
        }),
        tickets_mark: Some(TicketsMark { tickets: sealers }),
    }
}

/// The sealing sequence for an epoch: the best (lowest-scoring) tickets of
/// the closed contest in ascending VRF-output order, padded to the epoch
/// length with fallback keys.
pub fn derive_sealers(
    contest: &[Ticket],
    curr_validators: &[ValidatorKey],
    entropy: &OpaqueHash,
    epoch_length: u32,
) -> Vec<Ticket> {
    let mut sealers: Vec<Ticket> = contest.to_vec();
    sealers.sort_by(|a, b| a.proof.cmp(&b.proof));
    sealers.truncate(epoch_length as usize);

    if sealers.len() < epoch_length as usize {
        let fallback = fallback_keys(curr_validators, entropy, epoch_length);
        for i in sealers.len()..epoch_length as usize {
            sealers.push(Ticket { entry_index: i as u32, proof: fallback[i].to_vec() });
        }
    }

    sealers
}

/// Select an epoch's worth of Bandersnatch keys from the active set using the
/// entropy collected on-chain.
pub fn fallback_keys(
    curr_validators: &[ValidatorKey],
    entropy: &OpaqueHash,
    epoch_length: u32,
) -> Vec<BandersnatchPublic> {
    (0..epoch_length)
        .map(|i| {
            if curr_validators.is_empty() {
                return [0u8; 32];
            }
            let hash = blake2b(&[&entropy[..], &i.to_le_bytes()[..]].concat());
            let index = u32::from_le_bytes([hash[0], hash[1], hash[2], hash[3]])
                % curr_validators.len() as u32;
            curr_validators[index as usize].bandersnatch
        })
        .collect()
}

/// A sealing ticket as a key: accumulated tickets already carry a 32-octet
/// VRF output, which acts as the sealing pseudonym.
pub fn ticket_key(ticket: &Ticket) -> BandersnatchPublic {
    match ticket.proof.as_slice().try_into() {
        Ok(key) => key,
        Err(_) => blake2b(&ticket.proof),
    }
}

pub fn sealer_keys(sealers: &[Ticket]) -> Vec<BandersnatchPublic> {
    sealers.iter().map(ticket_key).collect()
}

/// The seal key of a slot is the sequence entry at the slot's position within
/// its epoch.
pub fn seal_key(
    keys: &[BandersnatchPublic],
    slot: TimeSlot,
    epoch_length: u32,
) -> Option<BandersnatchPublic> {
    if epoch_length == 0 {
        return None;
    }
    keys.get((slot % epoch_length) as usize).copied()
}

/// Verify a header's seal against the slot's sealing key: the Bandersnatch
/// signature over the unsealed header serialization.
pub fn verify_block_seal(
    header: &Header,
    state: &SafroleState,
    config: &Config,
    verifier: &dyn SignatureVerifier,
) -> Result<(), ProcessError> {
    let Some(key) = seal_key(
        &state.tickets_or_keys.keys,
        header.unsigned.slot,
        config.epoch_length,
    ) else {
        log::error!("no sealing key fixed for slot {}", header.unsigned.slot);
        return Err(ProcessError::InvalidSignature);
    };

    if !block::header::seal_verify(header, &key, verifier) {
        log::error!("invalid seal at slot {}", header.unsigned.slot);
        return Err(ProcessError::InvalidSignature);
    }

    Ok(())
}
