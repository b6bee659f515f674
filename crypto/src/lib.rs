// Cryptographic facade. Blake2b-256 hashing and Ed25519 verification are
// backed by sp-core; the Bandersnatch single-signer VRF and the Ring-VRF are
// external collaborators reached through the SignatureVerifier trait, so the
// backend can be swapped without touching the state-transition code.

pub mod bandersnatch;

use jam_types::{Ed25519Public, Ed25519Signature, OpaqueHash};
use sp_core::{ed25519, Pair};

pub use bandersnatch::{SignatureVerifier, Verifier};

pub fn blake2b(data: &[u8]) -> OpaqueHash {
    sp_core::blake2_256(data)
}

pub trait VerifySignature {
    fn verify_signature(&self, message: &[u8], public_key: &Ed25519Public) -> bool;
}

impl VerifySignature for Ed25519Signature {
    fn verify_signature(&self, message: &[u8], public_key: &Ed25519Public) -> bool {
        let signature = ed25519::Signature::from_raw(*self);
        let public_key = ed25519::Public::from_raw(*public_key);

        ed25519::Pair::verify(&signature, message, &public_key)
    }
}

/// Ed25519 verification for wire-format signatures, which carry their own
/// length. Anything that is not exactly 64 octets fails.
pub fn verify_ed25519(signature: &[u8], message: &[u8], public_key: &Ed25519Public) -> bool {
    let signature: Ed25519Signature = match signature.try_into() {
        Ok(signature) => signature,
        Err(_) => return false,
    };
    signature.verify_signature(message, public_key)
}
