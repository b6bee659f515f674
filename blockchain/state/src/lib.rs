/*
    The block state-transition function. One block applies atomically: either
    the returned state is the fully updated post-state or an error is
    surfaced and the caller must treat the result as undefined.

    Per block: the header is validated against its parent and the current
    time, the five extrinsic kinds are applied in their fixed order, promoted
    reports are accumulated into service state, and finally the header-derived
    components (tau, beta, eta, the validator sets and the authorizer pools)
    are advanced.
*/

pub mod accumulation;
pub mod authorization;
pub mod entropy;
pub mod recent_history;
pub mod safrole;
pub mod services;
pub mod statistics;

use block::{extrinsic, header};
use codec::Encode;
use constants::Config;
use crypto::{blake2b, SignatureVerifier};
use jam_types::{
    Block, BlockInfo, CoreIndex, GlobalState, Header, HeaderError, OpaqueHash, ProcessError,
    TimeSlot, WorkReport,
};

pub fn process_block(
    block: &Block,
    parent: Option<&Header>,
    current_slot: TimeSlot,
    mut state: GlobalState,
    config: &Config,
    verifier: &dyn SignatureVerifier,
) -> Result<GlobalState, ProcessError> {
    header::validate_block(block, parent, current_slot, config)?;

    let unsigned = &block.header.unsigned;
    if unsigned.slot <= state.time {
        log::error!("block slot {} does not advance tau {}", unsigned.slot, state.time);
        return Err(HeaderError::BadSlot.into());
    }

    log::debug!("processing block at slot {}", unsigned.slot);

    // Fixed extrinsic order: tickets, judgements, preimages, assurances,
    // guarantees.
    extrinsic::tickets::process(
        &block.extrinsic.tickets,
        &mut state.safrole,
        &state.entropy,
        &state.curr_validators,
        config,
        verifier,
    );

    let disputed = extrinsic::judgements::process(
        &block.extrinsic.judgements,
        &mut state.judgements,
        &mut state.availability,
        &state.curr_validators,
    );
    if disputed != unsigned.judgements_mark {
        log::warn!(
            "header judgements marker carries {} entries, judgement processing produced {}",
            unsigned.judgements_mark.len(),
            disputed.len()
        );
    }

    extrinsic::preimages::process(
        &block.extrinsic.preimages,
        &mut state.service_accounts,
        state.time,
    )?;

    let available = extrinsic::assurances::process(
        &block.extrinsic.assurances,
        &mut state.availability,
        &state.curr_validators,
        verifier,
    );

    extrinsic::guarantees::process(
        &block.extrinsic.guarantees,
        &mut state.availability,
        state.time,
        &state.curr_validators,
        config,
        verifier,
    );

    statistics::process(
        &mut state.statistics,
        &block.extrinsic,
        unsigned.author_index,
        state.time,
        unsigned.slot,
        config,
    );

    let mut state = accumulation::process(&available, state);

    apply_header(&block.header, &available, &mut state, config);

    Ok(state)
}

/// Advance the header-derived components: tau, the recent-history window,
/// the entropy pool, the validator sets and epoch state on an epoch marker,
/// and the authorizer pools. Accumulated reports arrive with the core they
/// were promoted from.
pub fn apply_header(
    header: &Header,
    accumulated: &[(CoreIndex, WorkReport)],
    state: &mut GlobalState,
    config: &Config,
) {
    let unsigned = &header.unsigned;

    state.time = unsigned.slot;

    let report_hashes: Vec<OpaqueHash> = accumulated
        .iter()
        .map(|(_, report)| blake2b(&report.encode()))
        .collect();
    let accumulate_root = if report_hashes.is_empty() {
        [0u8; 32]
    } else {
        blake2b(&report_hashes.concat())
    };
    recent_history::push(
        &mut state.recent_history,
        BlockInfo {
            header_hash: header::sealed_hash(header),
            accumulate_root,
            state_root: unsigned.state_root,
            reported: report_hashes,
        },
        config.history_window,
    );

    entropy::mix(&mut state.entropy, &unsigned.entropy_source);

    if let Some(epoch_mark) = &unsigned.epoch_mark {
        log::info!("epoch marker at slot {}: rotating validator sets", unsigned.slot);
        // lambda takes the retiring kappa, kappa is promoted from iota with
        // its full key records, iota takes the keys pending in gamma. The
        // marker's Bandersnatch keys only cross-check the incoming set.
        let new_active = std::mem::replace(
            &mut state.next_validators,
            state.safrole.pending_validators.clone(),
        );
        for (validator, key) in new_active.iter().zip(&epoch_mark.validators) {
            if validator.bandersnatch != *key {
                log::warn!(
                    "epoch mark key {} does not match the incoming active set",
                    utils::print_hash!(*key)
                );
            }
        }
        state.prev_validators = std::mem::replace(&mut state.curr_validators, new_active);
        state.safrole.epoch_root = epoch_mark.epoch_randomness;
        state.safrole.ticket_accumulator.clear();
    }

    if let Some(tickets_mark) = &unsigned.tickets_mark {
        state.safrole.slot_sealers = tickets_mark.tickets.clone();
    }

    authorization::update_pools(&mut state.auth_pools, &mut state.auth_queues, accumulated);
}
