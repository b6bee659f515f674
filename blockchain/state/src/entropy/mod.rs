// The entropy pool is a ring of four hashes: the current accumulator and
// three progressively older values shifted out at each update.

use crypto::blake2b;
use jam_types::{EntropyPool, OpaqueHash};

/// Shift the pool one place towards the old end and install the incoming
/// value as the current entropy.
pub fn rotate(pool: &mut EntropyPool, incoming: OpaqueHash) {
    pool.buf[3] = pool.buf[2];
    pool.buf[2] = pool.buf[1];
    pool.buf[1] = pool.buf[0];
    pool.buf[0] = incoming;
}

/// Fold a block's vrf signature into the pool: the new current entropy is
/// the digest of the old current entropy and the signature.
pub fn mix(pool: &mut EntropyPool, vrf_signature: &[u8]) {
    let mixed = blake2b(&[&pool.buf[0][..], vrf_signature].concat());
    rotate(pool, mixed);
}
