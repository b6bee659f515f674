use jam_types::ReadError;

pub mod generic_codec;
pub mod jam_codec;

pub trait Encode {
    fn encode_to(&self, into: &mut Vec<u8>);

    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_to(&mut out);
        out
    }
}

/// Length-prefixed form of a sequence: a compact-integer count followed by the
/// items. `Encode` on sequences writes the items alone; containers whose
/// length is not implied by context go through this trait.
pub trait EncodeLen {
    fn encode_len_to(&self, into: &mut Vec<u8>);

    fn encode_len(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_len_to(&mut out);
        out
    }
}

pub trait Decode: Sized {
    fn decode(reader: &mut BytesReader) -> Result<Self, ReadError>;
}

pub trait DecodeLen: Sized {
    fn decode_len(reader: &mut BytesReader) -> Result<Self, ReadError>;
}

pub struct BytesReader<'a> {
    pub data: &'a [u8],
    pub position: usize,
}

impl<'a> BytesReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BytesReader { data, position: 0 }
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8], ReadError> {
        if self.position + length > self.data.len() {
            log::trace!(
                "not enough data at position {}, wanted {} bytes",
                self.position,
                length
            );
            return Err(ReadError::InsufficientData);
        }

        let bytes = &self.data[self.position..self.position + length];
        self.position += length;

        Ok(bytes)
    }

    pub fn read_byte(&mut self) -> Result<u8, ReadError> {
        if self.position >= self.data.len() {
            log::trace!("not enough data at position {}", self.position);
            return Err(ReadError::InsufficientData);
        }

        let byte = self.data[self.position];
        self.position += 1;

        Ok(byte)
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position == self.data.len()
    }
}
