// Helpers for the 0x-prefixed hex strings of the JSON conformance vectors.

pub fn decode_bytes(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(input.strip_prefix("0x").unwrap_or(input))
}

pub fn decode_array<const N: usize>(input: &str) -> Result<[u8; N], String> {
    let bytes = decode_bytes(input).map_err(|e| e.to_string())?;
    let mut out = [0u8; N];
    if bytes.len() > N {
        return Err(format!("expected at most {N} octets, got {}", bytes.len()));
    }
    out[..bytes.len()].copy_from_slice(&bytes);
    Ok(out)
}

pub fn encode(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}
