use jam_types::{Block, Extrinsic, Header, ReadError, Ticket};

use crate::jam_codec::{decode_seq, encode_seq};
use crate::{BytesReader, Decode, DecodeLen, Encode, EncodeLen};

// The extrinsic bundle in its fixed processing order: tickets, judgements,
// preimages, assurances, guarantees. Tickets carry a compact count; the other
// four kinds carry u32 counts.
impl Encode for Extrinsic {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.tickets.encode_len_to(into);
        encode_seq(&self.judgements, into);
        encode_seq(&self.preimages, into);
        encode_seq(&self.assurances, into);
        encode_seq(&self.guarantees, into);
    }
}

impl Decode for Extrinsic {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Extrinsic {
            tickets: Vec::<Ticket>::decode_len(reader)?,
            judgements: decode_seq(reader)?,
            preimages: decode_seq(reader)?,
            assurances: decode_seq(reader)?,
            guarantees: decode_seq(reader)?,
        })
    }
}

// Block transport format: u32 header length, the sealed header, then the
// extrinsic bundle.
impl Encode for Block {
    fn encode_to(&self, into: &mut Vec<u8>) {
        let header_blob = self.header.encode();
        (header_blob.len() as u32).encode_to(into);
        into.extend_from_slice(&header_blob);
        self.extrinsic.encode_to(into);
    }
}

impl Decode for Block {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let header_length = u32::decode(reader)? as usize;
        let header_blob = reader.read_bytes(header_length)?;

        let mut header_reader = BytesReader::new(header_blob);
        let header = Header::decode(&mut header_reader)?;
        if !header_reader.is_exhausted() {
            return Err(ReadError::InvalidEncoding);
        }

        Ok(Block {
            header,
            extrinsic: Extrinsic::decode(reader)?,
        })
    }
}
