// The header comprises a parent hash and prior state root, an extrinsic hash,
// a time-slot index, the optional epoch and winning-tickets markers, the
// judgements marker, the author index and two Bandersnatch signatures: the
// entropy-yielding vrf signature and the block seal.
//
// The seal signs the serialization of the header without the seal itself, and
// parent references carry the hash of that unsealed serialization. Storage
// and transport always use the sealed form.

use codec::Encode;
use constants::Config;
use crypto::{blake2b, SignatureVerifier};
use jam_types::{
    BandersnatchPublic, BandersnatchVrfSignature, Block, Extrinsic, Header, HeaderError,
    OpaqueHash, ProcessError, TimeSlot,
};

/// Hash of the unsealed serialization; the form referenced by child blocks.
pub fn unsealed_hash(header: &Header) -> OpaqueHash {
    blake2b(&header.unsigned.encode())
}

/// Hash of the sealed serialization; the form recorded in recent history.
pub fn sealed_hash(header: &Header) -> OpaqueHash {
    blake2b(&header.encode())
}

pub fn extrinsic_hash(extrinsic: &Extrinsic) -> OpaqueHash {
    blake2b(&extrinsic.encode())
}

/// Structural and consensus-local header checks. All rules are conjunctive;
/// cryptographic seal verification is delegated to the Bandersnatch backend.
pub fn validate(
    header: &Header,
    parent: Option<&Header>,
    current_slot: TimeSlot,
    config: &Config,
) -> Result<(), ProcessError> {
    let unsigned = &header.unsigned;

    // No blocks from the future
    if unsigned.slot > current_slot {
        log::error!("block slot {} is ahead of current slot {}", unsigned.slot, current_slot);
        return Err(HeaderError::FutureSlot.into());
    }

    if let Some(parent) = parent {
        // The slot index is strictly monotonic along the chain
        if unsigned.slot <= parent.unsigned.slot {
            log::error!(
                "block slot {} does not advance parent slot {}",
                unsigned.slot,
                parent.unsigned.slot
            );
            return Err(HeaderError::BadSlot.into());
        }

        let expected_parent = unsealed_hash(parent);
        if unsigned.parent != expected_parent {
            log::error!(
                "parent hash {} != expected {}",
                utils::print_hash!(unsigned.parent),
                utils::print_hash!(expected_parent)
            );
            return Err(HeaderError::BadParentHash.into());
        }
    }

    if let Some(epoch_mark) = &unsigned.epoch_mark {
        if epoch_mark.validators.len() != config.validators_count as usize {
            log::error!(
                "epoch mark carries {} validator keys, config says {}",
                epoch_mark.validators.len(),
                config.validators_count
            );
            return Err(HeaderError::BadEpochMark.into());
        }
    }

    if let Some(tickets_mark) = &unsigned.tickets_mark {
        if tickets_mark.tickets.len() != config.epoch_length as usize {
            log::error!(
                "winning tickets mark carries {} tickets, epoch length is {}",
                tickets_mark.tickets.len(),
                config.epoch_length
            );
            return Err(HeaderError::BadTicketsMark.into());
        }
    }

    if unsigned.author_index >= config.validators_count {
        log::error!(
            "author index {} out of range, {} validators",
            unsigned.author_index,
            config.validators_count
        );
        return Err(HeaderError::BadAuthorIndex.into());
    }

    Ok(())
}

/// Header checks plus the extrinsic commitment: with the whole block in hand
/// the extrinsic hash must match the extrinsic's serialization.
pub fn validate_block(
    block: &Block,
    parent: Option<&Header>,
    current_slot: TimeSlot,
    config: &Config,
) -> Result<(), ProcessError> {
    validate(&block.header, parent, current_slot, config)?;

    let expected = extrinsic_hash(&block.extrinsic);
    if block.header.unsigned.extrinsic_hash != expected {
        log::error!(
            "extrinsic hash {} != calculated {}",
            utils::print_hash!(block.header.unsigned.extrinsic_hash),
            utils::print_hash!(expected)
        );
        return Err(HeaderError::BadExtrinsicHash.into());
    }

    Ok(())
}

/// Verify the block seal: a Bandersnatch signature by the slot's seal key
/// over the unsealed header serialization.
pub fn seal_verify(
    header: &Header,
    seal_key: &BandersnatchPublic,
    verifier: &dyn SignatureVerifier,
) -> bool {
    let unsealed = header.unsigned.encode();
    let seal: &BandersnatchVrfSignature = &header.seal;
    verifier.vrf_verify(seal_key, &unsealed, seal)
}
