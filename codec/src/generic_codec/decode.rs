use jam_types::ReadError;

use crate::{BytesReader, Decode, DecodeLen};

/// Inverse of `encode_compact`. The wide form must carry between four and
/// eight payload bytes; anything else is rejected.
pub fn decode_compact(reader: &mut BytesReader) -> Result<u64, ReadError> {
    let first = reader.read_byte()?;

    match first & 0b11 {
        0b00 => Ok((first >> 2) as u64),
        0b01 => {
            let second = reader.read_byte()?;
            Ok((((first & 0b1111_1100) as u64) | ((second as u64) << 8)) >> 2)
        }
        0b10 => {
            let rest = reader.read_bytes(3)?;
            let word = u32::from_le_bytes([first, rest[0], rest[1], rest[2]]);
            Ok((word >> 2) as u64)
        }
        _ => {
            let k = ((first >> 2) as usize) + 4;
            if k > 8 {
                return Err(ReadError::InvalidEncoding);
            }
            let bytes = reader.read_bytes(k)?;
            let mut buf = [0u8; 8];
            buf[..k].copy_from_slice(bytes);
            Ok(u64::from_le_bytes(buf))
        }
    }
}

/// Inverse of `encode_var_octets`.
pub fn decode_var_octets(reader: &mut BytesReader) -> Result<Vec<u8>, ReadError> {
    let length = decode_compact(reader)? as usize;
    Ok(reader.read_bytes(length)?.to_vec())
}

impl Decode for u8 {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        reader.read_byte()
    }
}

impl Decode for u16 {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let bytes = reader.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }
}

impl Decode for u32 {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let bytes = reader.read_bytes(4)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        Ok(u32::from_be_bytes(buf))
    }
}

impl Decode for u64 {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let bytes = reader.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(buf))
    }
}

impl Decode for i64 {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let bytes = reader.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(i64::from_be_bytes(buf))
    }
}

impl Decode for bool {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReadError::InvalidEncoding),
        }
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let bytes = reader.read_bytes(N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        Ok(buf)
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError> {
        match reader.read_byte()? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(reader)?)),
            _ => Err(ReadError::InvalidEncoding),
        }
    }
}

impl<T: Decode> DecodeLen for Vec<T> {
    fn decode_len(reader: &mut BytesReader) -> Result<Self, ReadError> {
        let count = decode_compact(reader)? as usize;
        let mut out = Vec::new();
        for _ in 0..count {
            out.push(T::decode(reader)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::generic_codec::encode_compact;

    #[test]
    fn compact_round_trip_boundaries() {
        for value in [
            0u64,
            1,
            63,
            64,
            16_383,
            16_384,
            (1 << 30) - 1,
            1 << 30,
            1 << 42,
            u64::MAX,
        ] {
            let encoded = encode_compact(value);
            let mut reader = BytesReader::new(&encoded);
            assert_eq!(decode_compact(&mut reader).unwrap(), value);
            assert!(reader.is_exhausted());
        }
    }

    #[test]
    fn compact_rejects_oversized_width() {
        // (k - 4) = 5 in the header claims nine payload bytes
        let blob = [0b0001_0111u8, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut reader = BytesReader::new(&blob);
        assert_eq!(
            decode_compact(&mut reader),
            Err(ReadError::InvalidEncoding)
        );
    }

    #[test]
    fn compact_truncated_input() {
        let blob = [0b0000_0011u8, 0x01];
        let mut reader = BytesReader::new(&blob);
        assert_eq!(
            decode_compact(&mut reader),
            Err(ReadError::InsufficientData)
        );
    }

    #[test]
    fn decode_is_a_prefix_read() {
        // Canonical form: decoding consumes exactly the encoded bytes even
        // with trailing data present.
        let mut blob = encode_compact(16_384);
        blob.extend_from_slice(&[0xDE, 0xAD]);
        let mut reader = BytesReader::new(&blob);
        assert_eq!(decode_compact(&mut reader).unwrap(), 16_384);
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn bool_rejects_junk() {
        let mut reader = BytesReader::new(&[2u8]);
        assert_eq!(bool::decode(&mut reader), Err(ReadError::InvalidEncoding));
    }
}
