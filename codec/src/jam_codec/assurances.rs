use jam_types::{Assurance, OpaqueHash, ReadError};

use crate::jam_codec::{decode_sized_bytes, encode_sized_bytes};
use crate::{BytesReader, Decode, Encode};

impl Encode for Assurance {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.anchor.encode_to(into);
        (self.flags.len() as u32).encode_to(into);
        for flag in &self.flags {
            flag.encode_to(into);
        }
        self.validator_index.encode_to(into);
        encode_sized_bytes(&self.signature, into);
    }
}

impl Decode for Assurance {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let anchor = <OpaqueHash>::decode(reader)?;
        let flag_count = u32::decode(reader)? as usize;
        let mut flags = Vec::new();
        for _ in 0..flag_count {
            flags.push(reader.read_byte()? == 1);
        }
        Ok(Assurance {
            anchor,
            flags,
            validator_index: u32::decode(reader)?,
            signature: decode_sized_bytes(reader)?,
        })
    }
}
