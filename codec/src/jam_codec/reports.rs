use jam_types::{
    Assignment, AvailabilitySpec, OpaqueHash, ReadError, RefineContext, WorkExecError,
    WorkExecResult, WorkReport, WorkResult,
};

use crate::generic_codec::{decode_compact, decode_var_octets, encode_compact, encode_var_octets};
use crate::jam_codec::{decode_hash_seq, encode_hash_seq};
use crate::{BytesReader, Decode, Encode};

impl Encode for RefineContext {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.anchor.encode_to(into);
        self.state_root.encode_to(into);
        self.beefy_root.encode_to(into);
        self.lookup_anchor.encode_to(into);
        self.lookup_anchor_slot.encode_to(into);
        self.prerequisite.encode_to(into);
    }
}

impl Decode for RefineContext {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(RefineContext {
            anchor: <OpaqueHash>::decode(reader)?,
            state_root: <OpaqueHash>::decode(reader)?,
            beefy_root: <OpaqueHash>::decode(reader)?,
            lookup_anchor: <OpaqueHash>::decode(reader)?,
            lookup_anchor_slot: u32::decode(reader)?,
            prerequisite: Option::<OpaqueHash>::decode(reader)?,
        })
    }
}

impl Encode for AvailabilitySpec {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.hash.encode_to(into);
        self.length.encode_to(into);
        self.erasure_root.encode_to(into);
        self.exports_root.encode_to(into);
    }
}

impl Decode for AvailabilitySpec {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(AvailabilitySpec {
            hash: <OpaqueHash>::decode(reader)?,
            length: u32::decode(reader)?,
            erasure_root: <OpaqueHash>::decode(reader)?,
            exports_root: <OpaqueHash>::decode(reader)?,
        })
    }
}

// A work output is a tagged union: discriminant 0 is success followed by a
// var-octet blob, discriminants 1 through 4 are error codes followed by the
// same code as a u32.
impl Encode for WorkExecResult {
    fn encode_to(&self, into: &mut Vec<u8>) {
        match self {
            WorkExecResult::Ok(blob) => {
                into.push(0);
                encode_var_octets(blob, into);
            }
            WorkExecResult::Error(error) => {
                let code = *error as u32;
                into.push(code as u8);
                code.encode_to(into);
            }
        }
    }
}

impl Decode for WorkExecResult {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let discriminant = reader.read_byte()?;
        match discriminant {
            0 => Ok(WorkExecResult::Ok(decode_var_octets(reader)?)),
            1..=4 => {
                let code = u32::decode(reader)?;
                if code != discriminant as u32 {
                    return Err(ReadError::InvalidEncoding);
                }
                WorkExecError::from_code(code)
                    .map(WorkExecResult::Error)
                    .ok_or(ReadError::InvalidEncoding)
            }
            _ => Err(ReadError::InvalidEncoding),
        }
    }
}

impl Encode for WorkResult {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.service.encode_to(into);
        self.code_hash.encode_to(into);
        self.payload_hash.encode_to(into);
        self.gas.encode_to(into);
        self.result.encode_to(into);
    }
}

impl Decode for WorkResult {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(WorkResult {
            service: u32::decode(reader)?,
            code_hash: <OpaqueHash>::decode(reader)?,
            payload_hash: <OpaqueHash>::decode(reader)?,
            gas: i64::decode(reader)?,
            result: WorkExecResult::decode(reader)?,
        })
    }
}

impl Encode for WorkReport {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.authorizer_hash.encode_to(into);
        encode_var_octets(&self.output, into);
        self.context.encode_to(into);
        self.package_spec.encode_to(into);
        into.extend_from_slice(&encode_compact(self.results.len() as u64));
        for result in &self.results {
            result.encode_to(into);
        }
    }
}

impl Decode for WorkReport {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let authorizer_hash = <OpaqueHash>::decode(reader)?;
        let output = decode_var_octets(reader)?;
        let context = RefineContext::decode(reader)?;
        let package_spec = AvailabilitySpec::decode(reader)?;

        let result_count = decode_compact(reader)? as usize;
        let mut results = Vec::new();
        for _ in 0..result_count {
            results.push(WorkResult::decode(reader)?);
        }

        Ok(WorkReport { authorizer_hash, output, context, package_spec, results })
    }
}

impl Encode for Assignment {
    fn encode_to(&self, into: &mut Vec<u8>) {
        self.report.encode_to(into);
        encode_hash_seq(&self.guarantors, into);
        self.timestamp.encode_to(into);
    }
}

impl Decode for Assignment {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        Ok(Assignment {
            report: WorkReport::decode(reader)?,
            guarantors: decode_hash_seq(reader)?,
            timestamp: u32::decode(reader)?,
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn sample_report() -> WorkReport {
        WorkReport {
            authorizer_hash: [0xAA; 32],
            output: vec![1, 2, 3],
            context: RefineContext {
                anchor: [1u8; 32],
                state_root: [2u8; 32],
                beefy_root: [3u8; 32],
                lookup_anchor: [4u8; 32],
                lookup_anchor_slot: 7,
                prerequisite: Some([5u8; 32]),
            },
            package_spec: AvailabilitySpec {
                hash: [6u8; 32],
                length: 1024,
                erasure_root: [7u8; 32],
                exports_root: [8u8; 32],
            },
            results: vec![
                WorkResult {
                    service: 1,
                    code_hash: [9u8; 32],
                    payload_hash: [10u8; 32],
                    gas: 500,
                    result: WorkExecResult::Ok(vec![0xDE, 0xAD]),
                },
                WorkResult {
                    service: 2,
                    code_hash: [11u8; 32],
                    payload_hash: [12u8; 32],
                    gas: 600,
                    result: WorkExecResult::Error(WorkExecError::OutOfGas),
                },
            ],
        }
    }

    #[test]
    fn work_report_round_trip() {
        let report = sample_report();
        let encoded = report.encode();
        let mut reader = BytesReader::new(&encoded);
        assert_eq!(WorkReport::decode(&mut reader).unwrap(), report);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn work_output_success_discriminant() {
        let output = WorkExecResult::Ok(vec![0x01]);
        let encoded = output.encode();
        assert_eq!(encoded[0], 0);
    }

    #[test]
    fn work_output_error_codes() {
        for (error, code) in [
            (WorkExecError::OutOfGas, 1u8),
            (WorkExecError::Panic, 2),
            (WorkExecError::BadExports, 3),
            (WorkExecError::BadCode, 4),
        ] {
            let encoded = WorkExecResult::Error(error).encode();
            assert_eq!(encoded[0], code);
            assert_eq!(encoded.len(), 5);
            let mut reader = BytesReader::new(&encoded);
            assert_eq!(
                WorkExecResult::decode(&mut reader).unwrap(),
                WorkExecResult::Error(error)
            );
        }
    }

    #[test]
    fn work_output_rejects_unknown_discriminant() {
        let blob = [5u8, 0, 0, 0, 5];
        let mut reader = BytesReader::new(&blob);
        assert_eq!(
            WorkExecResult::decode(&mut reader),
            Err(ReadError::InvalidEncoding)
        );
    }

    #[test]
    fn assignment_round_trip() {
        let assignment = Assignment {
            report: sample_report(),
            guarantors: vec![[1u8; 32], [2u8; 32]],
            timestamp: 33,
        };
        let encoded = assignment.encode();
        let mut reader = BytesReader::new(&encoded);
        assert_eq!(Assignment::decode(&mut reader).unwrap(), assignment);
    }
}
