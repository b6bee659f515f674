use jam_types::{Attestation, Guarantee, ReadError, WorkReport};

use crate::jam_codec::{decode_sized_bytes, encode_sized_bytes};
use crate::{BytesReader, Decode, Encode};

impl Encode for Attestation {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.validator_index.encode_to(into);
        encode_sized_bytes(&self.signature, into);
    }
}

impl Decode for Attestation {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Attestation {
            validator_index: u32::decode(reader)?,
            signature: decode_sized_bytes(reader)?,
        })
    }
}

impl Encode for Guarantee {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.core_index.encode_to(into);
        encode_sized_bytes(&self.report.encode(), into);
        self.slot.encode_to(into);
        for attestation in &self.attestations {
            attestation.encode_to(into);
        }
    }
}

impl Decode for Guarantee {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let core_index = u32::decode(reader)?;

        let report_blob = decode_sized_bytes(reader)?;
        let mut report_reader = BytesReader::new(&report_blob);
        let report = WorkReport::decode(&mut report_reader)?;
        if !report_reader.is_exhausted() {
            return Err(ReadError::InvalidEncoding);
        }

        let slot = u32::decode(reader)?;
        let attestations = [
            Option::<Attestation>::decode(reader)?,
            Option::<Attestation>::decode(reader)?,
            Option::<Attestation>::decode(reader)?,
        ];

        Ok(Guarantee { core_index, report, slot, attestations })
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use jam_types::{AvailabilitySpec, RefineContext};

    fn sample_report() -> WorkReport {
        WorkReport {
            authorizer_hash: [1u8; 32],
            output: vec![0xFF],
            context: RefineContext {
                anchor: [2u8; 32],
                state_root: [3u8; 32],
                beefy_root: [4u8; 32],
                lookup_anchor: [5u8; 32],
                lookup_anchor_slot: 11,
                prerequisite: None,
            },
            package_spec: AvailabilitySpec {
                hash: [6u8; 32],
                length: 100,
                erasure_root: [7u8; 32],
                exports_root: [8u8; 32],
            },
            results: Vec::new(),
        }
    }

    #[test]
    fn guarantee_round_trip() {
        let guarantee = Guarantee {
            core_index: 1,
            report: sample_report(),
            slot: 99,
            attestations: [
                Some(Attestation { validator_index: 0, signature: vec![0xAA; 96] }),
                None,
                Some(Attestation { validator_index: 2, signature: vec![0xBB; 96] }),
            ],
        };
        let encoded = guarantee.encode();
        let mut reader = BytesReader::new(&encoded);
        assert_eq!(Guarantee::decode(&mut reader).unwrap(), guarantee);
        assert!(reader.is_exhausted());
    }
}
