// Service-account queries: preimage resolution as of a given timeslot and
// the storage-footprint accounting behind the minimum-balance rule.

use constants::node::{MIN_BALANCE, MIN_BALANCE_PER_ITEM, MIN_BALANCE_PER_OCTET};
use jam_types::{Balance, OpaqueHash, PreimageKey, ServiceAccount, TimeSlot};

/// Resolve a preimage as it was available at `slot`. The availability record
/// for the pair (hash, length) is scanned newest-first; the preimage resolves
/// if any recorded transition is at or before the requested slot.
pub fn historical_lookup(
    account: &ServiceAccount,
    slot: TimeSlot,
    hash: &OpaqueHash,
) -> Option<Vec<u8>> {
    let preimage = account.preimages.get(hash)?;
    let key = PreimageKey { hash: *hash, length: preimage.len() as u32 };
    let record = account.lookup.get(&key)?;

    for recorded in record.iter().rev() {
        if *recorded <= slot {
            return Some(preimage.clone());
        }
    }

    None
}

/// Number of items and octets of elective state held by the account.
pub fn account_footprint(account: &ServiceAccount) -> (u32, u64) {
    let items =
        (account.storage.len() + account.preimages.len() + account.lookup.len()) as u32;

    let mut octets = 0u64;
    for value in account.storage.values() {
        octets += value.len() as u64;
    }
    for value in account.preimages.values() {
        octets += value.len() as u64;
    }
    for record in account.lookup.values() {
        // key hash + length field + one slot per transition
        octets += 32 + 4 + record.len() as u64 * 4;
    }

    (items, octets)
}

/// The minimum balance the account must hold for its current footprint.
pub fn threshold_balance(account: &ServiceAccount) -> Balance {
    let (items, octets) = account_footprint(account);
    MIN_BALANCE + items as Balance * MIN_BALANCE_PER_ITEM + octets * MIN_BALANCE_PER_OCTET
}

#[cfg(test)]
mod tests {

    use super::*;
    use crypto::blake2b;

    fn account_with_preimage(blob: &[u8], slots: &[TimeSlot]) -> (ServiceAccount, OpaqueHash) {
        let hash = blake2b(blob);
        let mut account = ServiceAccount::default();
        account.preimages.insert(hash, blob.to_vec());
        account.lookup.insert(
            PreimageKey { hash, length: blob.len() as u32 },
            slots.to_vec(),
        );
        (account, hash)
    }

    #[test]
    fn lookup_honours_the_introduction_slot() {
        let (account, hash) = account_with_preimage(&[1, 2, 3], &[10]);

        assert_eq!(historical_lookup(&account, 9, &hash), None);
        assert_eq!(historical_lookup(&account, 10, &hash), Some(vec![1, 2, 3]));
        assert_eq!(historical_lookup(&account, 99, &hash), Some(vec![1, 2, 3]));
    }

    #[test]
    fn lookup_keys_on_the_preimage_length() {
        let (mut account, hash) = account_with_preimage(&[1, 2, 3], &[10]);
        // Record stored under a different length does not resolve
        let record = account.lookup.remove(&PreimageKey { hash, length: 3 }).unwrap();
        account.lookup.insert(PreimageKey { hash, length: 0 }, record);

        assert_eq!(historical_lookup(&account, 10, &hash), None);
    }

    #[test]
    fn lookup_scans_newest_first() {
        let (account, hash) = account_with_preimage(&[7u8; 4], &[5, 20]);
        assert_eq!(historical_lookup(&account, 6, &hash), Some(vec![7u8; 4]));
        assert_eq!(historical_lookup(&account, 4, &hash), None);
    }

    #[test]
    fn unknown_hash_misses() {
        let (account, _) = account_with_preimage(&[1], &[0]);
        assert_eq!(historical_lookup(&account, 10, &[0xEE; 32]), None);
    }

    #[test]
    fn threshold_tracks_the_footprint() {
        let empty = ServiceAccount::default();
        assert_eq!(threshold_balance(&empty), MIN_BALANCE);

        let (account, _) = account_with_preimage(&[1, 2, 3], &[10]);
        let (items, octets) = account_footprint(&account);
        assert_eq!(items, 2);
        assert_eq!(octets, 3 + 32 + 4 + 4);
        assert!(threshold_balance(&account) > MIN_BALANCE);
    }
}
