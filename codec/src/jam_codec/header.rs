use jam_types::{
    BandersnatchPublic, BandersnatchVrfSignature, EpochMark, Header, OpaqueHash, ReadError,
    Ticket, TicketsMark, UnsignedHeader,
};

use crate::jam_codec::{decode_seq, encode_seq};
use crate::{BytesReader, Decode, Encode};

impl Encode for EpochMark {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.epoch_randomness.encode_to(into);
        (self.validators.len() as u32).encode_to(into);
        for key in &self.validators {
            key.encode_to(into);
        }
    }
}

impl Decode for EpochMark {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let epoch_randomness = <OpaqueHash>::decode(reader)?;
        let count = u32::decode(reader)? as usize;
        let mut validators = Vec::new();
        for _ in 0..count {
            validators.push(<BandersnatchPublic>::decode(reader)?);
        }
        Ok(EpochMark { epoch_randomness, validators })
    }
}

impl Encode for TicketsMark {
    fn encode_to(&self, into: &mut Vec<u8>) {
        encode_seq(&self.tickets, into);
    }
}

impl Decode for TicketsMark {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(TicketsMark { tickets: decode_seq::<Ticket>(reader)? })
    }
}

impl Encode for UnsignedHeader {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.parent.encode_to(into);
        self.state_root.encode_to(into);
        self.extrinsic_hash.encode_to(into);
        self.slot.encode_to(into);
        self.epoch_mark.encode_to(into);
        self.tickets_mark.encode_to(into);
        (self.judgements_mark.len() as u32).encode_to(into);
        for hash in &self.judgements_mark {
            hash.encode_to(into);
        }
        self.author_index.encode_to(into);
        self.entropy_source.encode_to(into);
    }
}

impl Decode for UnsignedHeader {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let parent = <OpaqueHash>::decode(reader)?;
        let state_root = <OpaqueHash>::decode(reader)?;
        let extrinsic_hash = <OpaqueHash>::decode(reader)?;
        let slot = u32::decode(reader)?;
        let epoch_mark = Option::<EpochMark>::decode(reader)?;
        let tickets_mark = Option::<TicketsMark>::decode(reader)?;

        let judgement_count = u32::decode(reader)? as usize;
        let mut judgements_mark = Vec::new();
        for _ in 0..judgement_count {
            judgements_mark.push(<OpaqueHash>::decode(reader)?);
        }

        Ok(UnsignedHeader {
            parent,
            state_root,
            extrinsic_hash,
            slot,
            epoch_mark,
            tickets_mark,
            judgements_mark,
            author_index: u32::decode(reader)?,
            entropy_source: <BandersnatchVrfSignature>::decode(reader)?,
        })
    }
}

// The sealed form: the unsigned header followed by the seal. Hashing for
// parent references uses the unsigned form alone.
impl Encode for Header {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.unsigned.encode_to(into);
        self.seal.encode_to(into);
    }
}

impl Decode for Header {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Header {
            unsigned: UnsignedHeader::decode(reader)?,
            seal: <BandersnatchVrfSignature>::decode(reader)?,
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn sample_header() -> Header {
        Header {
            unsigned: UnsignedHeader {
                parent: [1u8; 32],
                state_root: [2u8; 32],
                extrinsic_hash: [3u8; 32],
                slot: 601,
                epoch_mark: Some(EpochMark {
                    epoch_randomness: [4u8; 32],
                    validators: vec![[5u8; 32], [6u8; 32]],
                }),
                tickets_mark: Some(TicketsMark {
                    tickets: vec![Ticket { entry_index: 1, proof: vec![7u8; 32] }],
                }),
                judgements_mark: vec![[8u8; 32]],
                author_index: 1,
                entropy_source: [9u8; 96],
            },
            seal: [10u8; 96],
        }
    }

    #[test]
    fn header_round_trip() {
        let header = sample_header();
        let encoded = header.encode();
        let mut reader = BytesReader::new(&encoded);
        assert_eq!(Header::decode(&mut reader).unwrap(), header);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn sealed_form_extends_unsigned_form() {
        let header = sample_header();
        let unsigned = header.unsigned.encode();
        let sealed = header.encode();
        assert_eq!(&sealed[..unsigned.len()], &unsigned[..]);
        assert_eq!(sealed.len(), unsigned.len() + 96);
    }

    #[test]
    fn absent_marks_round_trip() {
        let mut header = sample_header();
        header.unsigned.epoch_mark = None;
        header.unsigned.tickets_mark = None;
        let encoded = header.encode();
        let mut reader = BytesReader::new(&encoded);
        let decoded = Header::decode(&mut reader).unwrap();
        assert_eq!(decoded.unsigned.epoch_mark, None);
        assert_eq!(decoded.unsigned.tickets_mark, None);
    }
}
