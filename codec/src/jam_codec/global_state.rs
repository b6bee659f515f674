use std::collections::{BTreeSet, VecDeque};

use jam_types::{
    ActivityRecord, Assignment, BlockHistory, BlockInfo, EntropyPool, GlobalState,
    JudgementRecords, OpaqueHash, Privileges, ReadError, Safrole, Statistics, Ticket,
    ValidatorKey,
};

use crate::generic_codec::{decode_compact, decode_var_octets, encode_compact, encode_var_octets};
use crate::jam_codec::services::{decode_service_accounts, encode_service_accounts};
use crate::jam_codec::{decode_hash_seq, decode_hash_seq_seq, encode_hash_seq, encode_hash_seq_seq};
use crate::{BytesReader, Decode, DecodeLen, Encode, EncodeLen};

impl Encode for BlockInfo {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.header_hash.encode_to(into);
        self.accumulate_root.encode_to(into);
        self.state_root.encode_to(into);
        encode_hash_seq(&self.reported, into);
    }
}

impl Decode for BlockInfo {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(BlockInfo {
            header_hash: <OpaqueHash>::decode(reader)?,
            accumulate_root: <OpaqueHash>::decode(reader)?,
            state_root: <OpaqueHash>::decode(reader)?,
            reported: decode_hash_seq(reader)?,
        })
    }
}

// Beta is wrapped in a single var-octet sequence; entries decode until the
// wrapper is exhausted.
impl Encode for BlockHistory {
    fn encode_to(&self, into: &mut Vec<u8>) {
        let mut entries = Vec::new();
        for block in &self.blocks {
            block.encode_to(&mut entries);
        }
        encode_var_octets(&entries, into);
    }
}

impl Decode for BlockHistory {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let entries = decode_var_octets(reader)?;
        let mut entry_reader = BytesReader::new(&entries);
        let mut blocks = VecDeque::new();
        while !entry_reader.is_exhausted() {
            blocks.push_back(BlockInfo::decode(&mut entry_reader)?);
        }
        Ok(BlockHistory { blocks })
    }
}

impl Encode for Safrole {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.pending_validators.encode_len_to(into);
        self.epoch_root.encode_to(into);
        self.slot_sealers.encode_len_to(into);
        self.ticket_accumulator.encode_len_to(into);
    }
}

impl Decode for Safrole {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Safrole {
            pending_validators: Vec::<ValidatorKey>::decode_len(reader)?,
            epoch_root: <OpaqueHash>::decode(reader)?,
            slot_sealers: Vec::<Ticket>::decode_len(reader)?,
            ticket_accumulator: Vec::<Ticket>::decode_len(reader)?,
        })
    }
}

impl Encode for EntropyPool {
    fn encode_to(&self, into: &mut Vec<u8>) {
        for entropy in &self.buf {
            entropy.encode_to(into);
        }
    }
}

impl Decode for EntropyPool {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let mut buf = [[0u8; 32]; 4];
        for entropy in buf.iter_mut() {
            *entropy = <OpaqueHash>::decode(reader)?;
        }
        Ok(EntropyPool { buf })
    }
}

fn encode_hash_set(set: &BTreeSet<OpaqueHash>, into: &mut Vec<u8>) {
    into.extend_from_slice(&encode_compact(set.len() as u64));
    for hash in set {
        hash.encode_to(into);
    }
}

fn decode_hash_set(reader: &mut BytesReader) -> Result<BTreeSet<OpaqueHash>, ReadError> {
    let count = decode_compact(reader)? as usize;
    let mut set = BTreeSet::new();
    for _ in 0..count {
        set.insert(<OpaqueHash>::decode(reader)?);
    }
    Ok(set)
}

impl Encode for JudgementRecords {
    fn encode_to(&self, into: &mut Vec<u8>) {
        encode_hash_set(&self.allow, into);
        encode_hash_set(&self.ban, into);
        encode_hash_set(&self.punish, into);
    }
}

impl Decode for JudgementRecords {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(JudgementRecords {
            allow: decode_hash_set(reader)?,
            ban: decode_hash_set(reader)?,
            punish: decode_hash_set(reader)?,
        })
    }
}

impl Encode for Privileges {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.manager.encode_to(into);
        self.authorizer.encode_to(into);
        self.validator.encode_to(into);
    }
}

impl Decode for Privileges {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Privileges {
            manager: u32::decode(reader)?,
            authorizer: u32::decode(reader)?,
            validator: u32::decode(reader)?,
        })
    }
}

impl Encode for ActivityRecord {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.blocks.encode_to(into);
        self.tickets.encode_to(into);
        self.preimages.encode_to(into);
        self.preimages_size.encode_to(into);
        self.guarantees.encode_to(into);
        self.assurances.encode_to(into);
    }
}

impl Decode for ActivityRecord {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(ActivityRecord {
            blocks: u32::decode(reader)?,
            tickets: u32::decode(reader)?,
            preimages: u32::decode(reader)?,
            preimages_size: u32::decode(reader)?,
            guarantees: u32::decode(reader)?,
            assurances: u32::decode(reader)?,
        })
    }
}

impl Encode for Statistics {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.curr.encode_len_to(into);
        self.prev.encode_len_to(into);
    }
}

impl Decode for Statistics {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Statistics {
            curr: Vec::<ActivityRecord>::decode_len(reader)?,
            prev: Vec::<ActivityRecord>::decode_len(reader)?,
        })
    }
}

/// The persisted state layout: every component concatenated in the fixed
/// order alpha, beta, gamma, delta, eta, iota, kappa, lambda, rho, tau, phi,
/// chi, psi, pi.
impl Encode for GlobalState {
    fn encode_to(&self, into: &mut Vec<u8>) {
        encode_hash_seq_seq(self.auth_pools.iter().map(|pool| pool.iter().copied()), into);
        self.recent_history.encode_to(into);
        self.safrole.encode_to(into);
        encode_service_accounts(&self.service_accounts, into);
        self.entropy.encode_to(into);
        self.next_validators.encode_len_to(into);
        self.curr_validators.encode_len_to(into);
        self.prev_validators.encode_len_to(into);
        self.availability.encode_len_to(into);
        self.time.encode_to(into);
        encode_hash_seq_seq(self.auth_queues.iter().map(|queue| queue.iter().copied()), into);
        self.privileges.encode_to(into);
        self.judgements.encode_to(into);
        self.statistics.encode_to(into);
    }
}

impl Decode for GlobalState {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(GlobalState {
            auth_pools: decode_hash_seq_seq(reader)?,
            recent_history: BlockHistory::decode(reader)?,
            safrole: Safrole::decode(reader)?,
            service_accounts: decode_service_accounts(reader)?,
            entropy: EntropyPool::decode(reader)?,
            next_validators: Vec::<ValidatorKey>::decode_len(reader)?,
            curr_validators: Vec::<ValidatorKey>::decode_len(reader)?,
            prev_validators: Vec::<ValidatorKey>::decode_len(reader)?,
            availability: Vec::<Option<Assignment>>::decode_len(reader)?,
            time: u32::decode(reader)?,
            auth_queues: decode_hash_seq_seq(reader)?
                .into_iter()
                .map(VecDeque::from)
                .collect(),
            privileges: Privileges::decode(reader)?,
            judgements: JudgementRecords::decode(reader)?,
            statistics: Statistics::decode(reader)?,
        })
    }
}
