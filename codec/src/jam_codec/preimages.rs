use jam_types::{Preimage, ReadError};

use crate::jam_codec::{decode_sized_bytes, encode_sized_bytes};
use crate::{BytesReader, Decode, Encode};

impl Encode for Preimage {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.requester.encode_to(into);
        encode_sized_bytes(&self.blob, into);
    }
}

impl Decode for Preimage {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Preimage {
            requester: u32::decode(reader)?,
            blob: decode_sized_bytes(reader)?,
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn preimage_round_trip() {
        let preimage = Preimage { requester: 42, blob: vec![1, 2, 3, 4, 5] };
        let encoded = preimage.encode();
        assert_eq!(encoded.len(), 4 + 4 + 5);
        let mut reader = BytesReader::new(&encoded);
        assert_eq!(Preimage::decode(&mut reader).unwrap(), preimage);
    }
}
