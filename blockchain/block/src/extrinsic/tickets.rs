/*
    The tickets extrinsic is a sequence of proofs of valid tickets; a ticket
    implies an entry in the epochal contest which decides the validators
    privileged to author a block in each timeslot of the following epoch. The
    proof implies a ticket identifier, a high-entropy unbiasable 32-octet
    sequence used as the score in that contest.
*/

use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;

use constants::Config;
use crypto::SignatureVerifier;
use jam_types::{BandersnatchPublic, EntropyPool, OpaqueHash, Safrole, Ticket, ValidatorKey};

/// Fold the block's tickets into the contest accumulator. Each proof is
/// Ring-VRF-verified against the active validator ring under the eta-2
/// context; invalid proofs and duplicate entry indices are silently dropped.
/// The accumulator is kept sorted by VRF output and bounded by the epoch
/// length.
pub fn process(
    tickets: &[Ticket],
    safrole: &mut Safrole,
    entropy: &EntropyPool,
    curr_validators: &[ValidatorKey],
    config: &Config,
    verifier: &dyn SignatureVerifier,
) {
    if tickets.is_empty() {
        return;
    }

    let ring: Vec<BandersnatchPublic> =
        curr_validators.iter().map(|v| v.bandersnatch).collect();
    let context = entropy.buf[2];

    // Proofs are independent; verify them concurrently and re-establish the
    // extrinsic order before touching state.
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        for (i, ticket) in tickets.iter().enumerate() {
            let tx = tx.clone();
            let ring = &ring;
            s.spawn(move || {
                let result = verifier.ring_vrf_verify(ring, &context, &ticket.proof);
                let _ = tx.send((i, result));
            });
        }
    });
    drop(tx);

    let mut verified: Vec<(usize, OpaqueHash)> = rx
        .into_iter()
        .filter_map(|(i, result)| result.map(|output| (i, output)))
        .collect();
    verified.sort_by_key(|(i, _)| *i);

    let mut entry_indices: HashSet<u32> = HashSet::new();
    for (i, output) in verified {
        let ticket = &tickets[i];
        if !entry_indices.insert(ticket.entry_index) {
            log::debug!("dropping duplicate ticket entry index {}", ticket.entry_index);
            continue;
        }
        safrole.ticket_accumulator.push(Ticket {
            entry_index: ticket.entry_index,
            proof: output.to_vec(),
        });
    }

    // Best (lowest) scores first; trim the overflow
    safrole.ticket_accumulator.sort_by(|a, b| a.proof.cmp(&b.proof));
    safrole.ticket_accumulator.truncate(config.epoch_length as usize);
}

#[cfg(test)]
mod tests {

    use super::*;
    use crypto::Verifier;
    use jam_types::{BandersnatchPublic, OpaqueHash};

    struct DenyAll;

    impl SignatureVerifier for DenyAll {
        fn ring_vrf_verify(
            &self,
            _ring: &[BandersnatchPublic],
            _context: &[u8],
            _proof: &[u8],
        ) -> Option<OpaqueHash> {
            None
        }

        fn vrf_verify(&self, _key: &BandersnatchPublic, _msg: &[u8], _sig: &[u8]) -> bool {
            false
        }
    }

    fn setup() -> (Safrole, EntropyPool, Vec<ValidatorKey>, Config) {
        (
            Safrole::default(),
            EntropyPool::default(),
            vec![ValidatorKey::default(); 3],
            Config::new(3, 12, 1),
        )
    }

    #[test]
    fn verified_ticket_enters_accumulator() {
        let (mut safrole, entropy, validators, config) = setup();
        let tickets = vec![Ticket { entry_index: 2, proof: vec![1, 2, 3] }];

        process(&tickets, &mut safrole, &entropy, &validators, &config, &Verifier);

        assert_eq!(safrole.ticket_accumulator.len(), 1);
        assert_eq!(safrole.ticket_accumulator[0].entry_index, 2);
        // Accumulated tickets carry the 32-octet VRF output, not the proof
        assert_eq!(safrole.ticket_accumulator[0].proof.len(), 32);
    }

    #[test]
    fn invalid_tickets_are_dropped_silently() {
        let (mut safrole, entropy, validators, config) = setup();
        let tickets = vec![Ticket { entry_index: 0, proof: vec![1] }];

        process(&tickets, &mut safrole, &entropy, &validators, &config, &DenyAll);

        assert!(safrole.ticket_accumulator.is_empty());
    }

    #[test]
    fn duplicate_entry_index_is_rejected() {
        let (mut safrole, entropy, validators, config) = setup();
        let tickets = vec![
            Ticket { entry_index: 1, proof: vec![1] },
            Ticket { entry_index: 1, proof: vec![2] },
        ];

        process(&tickets, &mut safrole, &entropy, &validators, &config, &Verifier);

        assert_eq!(safrole.ticket_accumulator.len(), 1);
    }

    #[test]
    fn accumulator_is_sorted_and_bounded() {
        let (mut safrole, entropy, validators, mut config) = setup();
        config.epoch_length = 2;

        let tickets: Vec<Ticket> = (0..4)
            .map(|i| Ticket { entry_index: i, proof: vec![i as u8 + 1; 8] })
            .collect();
        process(&tickets, &mut safrole, &entropy, &validators, &config, &Verifier);

        assert_eq!(safrole.ticket_accumulator.len(), 2);
        assert!(safrole.ticket_accumulator[0].proof <= safrole.ticket_accumulator[1].proof);
    }
}
