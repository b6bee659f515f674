// Per-entity wire encodings. Fixed-width integers inside records are
// big-endian; sequence counts use the compact integer except where the block
// format carries a u32 count (judgements, preimages, assurances, guarantees
// and the variable-length signature fields).

pub mod assurances;
pub mod block;
pub mod global_state;
pub mod guarantees;
pub mod header;
pub mod judgements;
pub mod preimages;
pub mod reports;
pub mod services;
pub mod tickets;
pub mod validators;

use jam_types::{OpaqueHash, ReadError};

use crate::{BytesReader, Decode, DecodeLen, Encode, EncodeLen};
use crate::generic_codec::{decode_compact, encode_compact};

/// u32-big-endian count followed by the items.
pub fn encode_seq<T: Encode>(items: &[T], into: &mut Vec<u8>) {
    (items.len() as u32).encode_to(into);
    for item in items {
        item.encode_to(into);
    }
}

pub fn decode_seq<T: Decode>(reader: &mut BytesReader) -> Result<Vec<T>, ReadError> {
    let count = u32::decode(reader)? as usize;
    let mut out = Vec::new();
    for _ in 0..count {
        out.push(T::decode(reader)?);
    }
    Ok(out)
}

/// u32-big-endian length followed by the raw bytes. Used for the
/// variable-length signature and blob fields of the block format.
pub fn encode_sized_bytes(data: &[u8], into: &mut Vec<u8>) {
    (data.len() as u32).encode_to(into);
    into.extend_from_slice(data);
}

pub fn decode_sized_bytes(reader: &mut BytesReader) -> Result<Vec<u8>, ReadError> {
    let length = u32::decode(reader)? as usize;
    Ok(reader.read_bytes(length)?.to_vec())
}

/// Compact count followed by 32-byte hashes.
pub fn encode_hash_seq(hashes: &[OpaqueHash], into: &mut Vec<u8>) {
    hashes.encode_len_to(into);
}

pub fn decode_hash_seq(reader: &mut BytesReader) -> Result<Vec<OpaqueHash>, ReadError> {
    let count = decode_compact(reader)? as usize;
    let mut out = Vec::new();
    for _ in 0..count {
        out.push(<OpaqueHash>::decode(reader)?);
    }
    Ok(out)
}

/// Compact count followed by per-core compact hash sequences (the alpha and
/// phi shapes).
pub fn encode_hash_seq_seq<I, S>(cores: I, into: &mut Vec<u8>)
where
    I: ExactSizeIterator<Item = S>,
    S: IntoIterator<Item = OpaqueHash>,
{
    into.extend_from_slice(&encode_compact(cores.len() as u64));
    for core in cores {
        let hashes: Vec<OpaqueHash> = core.into_iter().collect();
        encode_hash_seq(&hashes, into);
    }
}

pub fn decode_hash_seq_seq(reader: &mut BytesReader) -> Result<Vec<Vec<OpaqueHash>>, ReadError> {
    Vec::<Vec<OpaqueHash>>::decode_len(reader)
}

impl Decode for Vec<OpaqueHash> {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        decode_hash_seq(reader)
    }
}
