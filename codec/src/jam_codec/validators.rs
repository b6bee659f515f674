use jam_types::{BlsPublic, Ed25519Public, Metadata, ReadError, ValidatorKey};

use crate::{BytesReader, Decode, Encode};

impl Encode for ValidatorKey {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.bandersnatch.encode_to(into);
        self.ed25519.encode_to(into);
        self.bls.encode_to(into);
        self.metadata.encode_to(into);
    }
}

impl Decode for ValidatorKey {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(ValidatorKey {
            bandersnatch: <[u8; 32]>::decode(reader)?,
            ed25519: <Ed25519Public>::decode(reader)?,
            bls: <BlsPublic>::decode(reader)?,
            metadata: <Metadata>::decode(reader)?,
        })
    }
}
