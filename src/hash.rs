use sha3::{Digest, Sha3_256};

/// A 256-bit hash function, abstracted so `merkle` and `fiat_shamir` don't
/// hardcode a specific digest implementation.
pub trait Hasher {
    fn hash(data: &[u8]) -> [u8; 32];

    fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(left);
        buf.extend_from_slice(right);
        Self::hash(&buf)
    }
}

/// The hash this crate fixes on: `sha3::Sha3_256`, the same digest the
/// teacher's crypto crate uses.
pub struct Sha3Hasher;

impl Hasher for Sha3Hasher {
    fn hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(data);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(Sha3Hasher::hash(b"abc"), Sha3Hasher::hash(b"abc"));
    }

    #[test]
    fn different_inputs_hash_differently() {
        assert_ne!(Sha3Hasher::hash(b"abc"), Sha3Hasher::hash(b"abd"));
    }
}
