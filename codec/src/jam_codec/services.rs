use std::collections::BTreeMap;

use jam_types::{OpaqueHash, PreimageKey, ReadError, ServiceAccount, ServiceAccounts, TimeSlot};

use crate::generic_codec::{decode_compact, decode_var_octets, encode_compact, encode_var_octets};
use crate::{BytesReader, Decode, Encode};

// A service account serializes its scalar fields followed by its three
// dictionaries in ascending key order. The code blob itself is not part of
// the encoding; it is resolved through the preimage store.
impl Encode for ServiceAccount {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.code_hash.encode_to(into);
        self.balance.encode_to(into);
        self.acc_gas_limit.encode_to(into);
        self.xfer_gas_limit.encode_to(into);

        (self.storage.len() as u32).encode_to(into);
        for (key, value) in &self.storage {
            key.encode_to(into);
            encode_var_octets(value, into);
        }

        into.extend_from_slice(&encode_compact(self.preimages.len() as u64));
        for (key, value) in &self.preimages {
            key.encode_to(into);
            encode_var_octets(value, into);
        }

        into.extend_from_slice(&encode_compact(self.lookup.len() as u64));
        for (key, slots) in &self.lookup {
            key.hash.encode_to(into);
            key.length.encode_to(into);
            let mut slot_bytes = Vec::with_capacity(slots.len() * 4);
            for slot in slots {
                slot.encode_to(&mut slot_bytes);
            }
            encode_var_octets(&slot_bytes, into);
        }
    }
}

impl Decode for ServiceAccount {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let code_hash = <OpaqueHash>::decode(reader)?;
        let balance = u64::decode(reader)?;
        let acc_gas_limit = i64::decode(reader)?;
        let xfer_gas_limit = i64::decode(reader)?;

        let storage_count = u32::decode(reader)? as usize;
        let mut storage = BTreeMap::new();
        for _ in 0..storage_count {
            let key = <OpaqueHash>::decode(reader)?;
            storage.insert(key, decode_var_octets(reader)?);
        }

        let preimage_count = decode_compact(reader)? as usize;
        let mut preimages = BTreeMap::new();
        for _ in 0..preimage_count {
            let key = <OpaqueHash>::decode(reader)?;
            preimages.insert(key, decode_var_octets(reader)?);
        }

        let lookup_count = decode_compact(reader)? as usize;
        let mut lookup = BTreeMap::new();
        for _ in 0..lookup_count {
            let hash = <OpaqueHash>::decode(reader)?;
            let length = u32::decode(reader)?;
            let slot_bytes = decode_var_octets(reader)?;
            if slot_bytes.len() % 4 != 0 {
                return Err(ReadError::InvalidEncoding);
            }
            let mut slots: Vec<TimeSlot> = Vec::with_capacity(slot_bytes.len() / 4);
            let mut slot_reader = BytesReader::new(&slot_bytes);
            while !slot_reader.is_exhausted() {
                slots.push(u32::decode(&mut slot_reader)?);
            }
            lookup.insert(PreimageKey { hash, length }, slots);
        }

        Ok(ServiceAccount {
            storage,
            preimages,
            lookup,
            code_hash,
            balance,
            acc_gas_limit,
            xfer_gas_limit,
            code: Vec::new(),
        })
    }
}

pub fn encode_service_accounts(accounts: &ServiceAccounts, into: &mut Vec<u8>) {
    into.extend_from_slice(&encode_compact(accounts.len() as u64));
    for (service, account) in accounts {
        service.encode_to(into);
        account.encode_to(into);
    }
}

pub fn decode_service_accounts(reader: &mut BytesReader) -> Result<ServiceAccounts, ReadError> {
    let count = decode_compact(reader)? as usize;
    let mut accounts = ServiceAccounts::new();
    for _ in 0..count {
        let service = u32::decode(reader)?;
        accounts.insert(service, ServiceAccount::decode(reader)?);
    }
    Ok(accounts)
}

#[cfg(test)]
mod tests {

    use super::*;

    fn sample_account() -> ServiceAccount {
        let mut account = ServiceAccount {
            code_hash: [1u8; 32],
            balance: 1_000,
            acc_gas_limit: 10_000,
            xfer_gas_limit: 1_000,
            ..Default::default()
        };
        account.storage.insert([2u8; 32], vec![1, 2, 3]);
        account.storage.insert([0u8; 32], vec![9]);
        account.preimages.insert([3u8; 32], vec![4, 5, 6]);
        account
            .lookup
            .insert(PreimageKey { hash: [3u8; 32], length: 3 }, vec![11, 42]);
        account
    }

    #[test]
    fn service_account_round_trip() {
        let account = sample_account();
        let encoded = account.encode();
        let mut reader = BytesReader::new(&encoded);
        assert_eq!(ServiceAccount::decode(&mut reader).unwrap(), account);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn delta_round_trip_is_key_ordered() {
        let mut accounts = ServiceAccounts::new();
        accounts.insert(7, sample_account());
        accounts.insert(1, ServiceAccount::default());

        let mut encoded = Vec::new();
        encode_service_accounts(&accounts, &mut encoded);
        // count, then the lowest service id first
        assert_eq!(&encoded[1..5], &1u32.to_be_bytes());

        let mut reader = BytesReader::new(&encoded);
        assert_eq!(decode_service_accounts(&mut reader).unwrap(), accounts);
    }

    #[test]
    fn storage_keys_encode_in_ascending_order() {
        let account = sample_account();
        let encoded = account.encode();
        // scalar prefix: 32 + 8 + 8 + 8, then the u32 storage count
        let first_key_offset = 56 + 4;
        assert_eq!(&encoded[first_key_offset..first_key_offset + 32], &[0u8; 32]);
    }
}
