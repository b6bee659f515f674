use constants::Config;

use crate::{
    EntropyPool, Extrinsic, GlobalState, Header, Safrole, SafroleState, Statistics, TicketsOrKeys,
    UnsignedHeader, ValidatorKey,
};

impl Default for ValidatorKey {
    fn default() -> Self {
        ValidatorKey {
            bandersnatch: [0u8; 32],
            ed25519: [0u8; 32],
            bls: [0u8; 144],
            metadata: [0u8; 128],
        }
    }
}

impl Default for UnsignedHeader {
    fn default() -> Self {
        UnsignedHeader {
            parent: [0u8; 32],
            state_root: [0u8; 32],
            extrinsic_hash: [0u8; 32],
            slot: 0,
            epoch_mark: None,
            tickets_mark: None,
            judgements_mark: Vec::new(),
            author_index: 0,
            entropy_source: [0u8; 96],
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Header {
            unsigned: UnsignedHeader::default(),
            seal: [0u8; 96],
        }
    }
}

impl Default for Extrinsic {
    fn default() -> Self {
        Extrinsic {
            tickets: Vec::new(),
            judgements: Vec::new(),
            preimages: Vec::new(),
            assurances: Vec::new(),
            guarantees: Vec::new(),
        }
    }
}

impl Default for Safrole {
    fn default() -> Self {
        Safrole {
            pending_validators: Vec::new(),
            epoch_root: [0u8; 32],
            slot_sealers: Vec::new(),
            ticket_accumulator: Vec::new(),
        }
    }
}

impl Default for EntropyPool {
    fn default() -> Self {
        EntropyPool {
            buf: Default::default(),
        }
    }
}

impl Default for TicketsOrKeys {
    fn default() -> Self {
        TicketsOrKeys { keys: Vec::new() }
    }
}

impl Default for SafroleState {
    fn default() -> Self {
        SafroleState {
            timeslot: 0,
            entropy: Default::default(),
            prev_validators: Vec::new(),
            curr_validators: Vec::new(),
            next_validators: Vec::new(),
            designed_validators: Vec::new(),
            tickets_accumulator: Vec::new(),
            tickets_or_keys: TicketsOrKeys::default(),
            tickets_verifier_key: [0u8; 384],
        }
    }
}

impl Statistics {
    /// Zeroed accumulator and previous-epoch records, one entry per validator.
    pub fn new(validators: usize) -> Self {
        Statistics {
            curr: vec![Default::default(); validators],
            prev: vec![Default::default(); validators],
        }
    }
}

impl GlobalState {
    /// The all-zero state sized for the given configuration: every per-core
    /// and per-validator sequence is present and empty or zeroed.
    pub fn new(config: &Config) -> Self {
        let cores = config.cores_count as usize;
        let validators = config.validators_count as usize;

        GlobalState {
            auth_pools: vec![Vec::new(); cores],
            recent_history: Default::default(),
            safrole: Safrole {
                pending_validators: vec![ValidatorKey::default(); validators],
                ..Default::default()
            },
            service_accounts: Default::default(),
            entropy: EntropyPool::default(),
            next_validators: vec![ValidatorKey::default(); validators],
            curr_validators: vec![ValidatorKey::default(); validators],
            prev_validators: vec![ValidatorKey::default(); validators],
            availability: vec![None; cores],
            time: 0,
            auth_queues: vec![Default::default(); cores],
            privileges: Default::default(),
            judgements: Default::default(),
            statistics: Statistics::new(validators),
        }
    }
}
