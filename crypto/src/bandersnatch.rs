use jam_types::{BandersnatchPublic, OpaqueHash};

use crate::blake2b;

/// Interface to the Bandersnatch signature scheme and the Ring-VRF over a
/// validator set. Implementations must be thread-safe: callers verify
/// independent proofs concurrently.
pub trait SignatureVerifier: Sync {
    /// Verify a Ring-VRF proof against a ring of Bandersnatch keys under the
    /// given context. Returns the 32-octet VRF output on success.
    fn ring_vrf_verify(
        &self,
        ring: &[BandersnatchPublic],
        context: &[u8],
        proof: &[u8],
    ) -> Option<OpaqueHash>;

    /// Verify a plain Bandersnatch VRF signature over a message.
    fn vrf_verify(
        &self,
        public_key: &BandersnatchPublic,
        message: &[u8],
        signature: &[u8],
    ) -> bool;
}

/// Structural verifier: checks the shape of proofs and signatures and derives
/// VRF outputs by hashing the proof. The curve arithmetic itself lives behind
/// this trait in an external backend; this implementation is sufficient for
/// integrating and exercising the state-transition pipeline.
pub struct Verifier;

impl SignatureVerifier for Verifier {
    fn ring_vrf_verify(
        &self,
        ring: &[BandersnatchPublic],
        _context: &[u8],
        proof: &[u8],
    ) -> Option<OpaqueHash> {
        if ring.is_empty() || proof.is_empty() {
            return None;
        }
        Some(blake2b(proof))
    }

    fn vrf_verify(
        &self,
        _public_key: &BandersnatchPublic,
        _message: &[u8],
        signature: &[u8],
    ) -> bool {
        signature.len() == 96
    }
}
