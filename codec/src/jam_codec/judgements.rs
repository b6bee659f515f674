use jam_types::{Judgement, ReadError, Vote, WorkReportHash};

use crate::jam_codec::{decode_seq, decode_sized_bytes, encode_seq, encode_sized_bytes};
use crate::{BytesReader, Decode, Encode};

impl Encode for Vote {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.valid.encode_to(into);
        self.index.encode_to(into);
        encode_sized_bytes(&self.signature, into);
    }
}

impl Decode for Vote {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Vote {
            valid: reader.read_byte()? == 1,
            index: u32::decode(reader)?,
            signature: decode_sized_bytes(reader)?,
        })
    }
}

impl Encode for Judgement {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.target.encode_to(into);
        encode_seq(&self.votes, into);
    }
}

impl Decode for Judgement {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Judgement {
            target: <WorkReportHash>::decode(reader)?,
            votes: decode_seq(reader)?,
        })
    }
}
