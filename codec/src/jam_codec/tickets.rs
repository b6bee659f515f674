use jam_types::{ReadError, Ticket};

use crate::generic_codec::{decode_var_octets, encode_var_octets};
use crate::{BytesReader, Decode, Encode};

impl Encode for Ticket {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.entry_index.encode_to(into);
        encode_var_octets(&self.proof, into);
    }
}

impl Decode for Ticket {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Ticket {
            entry_index: u32::decode(reader)?,
            proof: decode_var_octets(reader)?,
        })
    }
}
