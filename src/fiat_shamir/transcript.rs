use crate::error::{FriError, FriResult};
use crate::hash::{Hasher, Sha3Hasher};

/// One entry in a [`Transcript`]'s append-only object log. The tag a given
/// variant serializes to is pinned (see [`TranscriptItem::tag`]) so
/// `serialize` is both deterministic and injective across variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptItem {
    FieldElement(u128),
    FieldElements(Vec<u128>),
    MerkleRoot([u8; 32]),
    Bytes(Vec<u8>),
    Indices(Vec<u64>),
    /// A Merkle authentication path: a sequence of sibling digests.
    Path(Vec<[u8; 32]>),
}

impl TranscriptItem {
    fn tag(&self) -> u8 {
        match self {
            TranscriptItem::FieldElement(_) => 0,
            TranscriptItem::FieldElements(_) => 1,
            TranscriptItem::MerkleRoot(_) => 2,
            TranscriptItem::Bytes(_) => 3,
            TranscriptItem::Indices(_) => 4,
            TranscriptItem::Path(_) => 5,
        }
    }

    fn write_payload(&self, out: &mut Vec<u8>) {
        match self {
            TranscriptItem::FieldElement(v) => out.extend_from_slice(&v.to_be_bytes()),
            TranscriptItem::FieldElements(values) => {
                out.extend_from_slice(&(values.len() as u32).to_be_bytes());
                for v in values {
                    out.extend_from_slice(&v.to_be_bytes());
                }
            }
            TranscriptItem::MerkleRoot(root) => out.extend_from_slice(root),
            TranscriptItem::Bytes(bytes) => out.extend_from_slice(bytes),
            TranscriptItem::Indices(indices) => {
                out.extend_from_slice(&(indices.len() as u32).to_be_bytes());
                for i in indices {
                    out.extend_from_slice(&i.to_be_bytes());
                }
            }
            TranscriptItem::Path(path) => {
                out.extend_from_slice(&(path.len() as u32).to_be_bytes());
                for digest in path {
                    out.extend_from_slice(digest);
                }
            }
        }
    }

    /// Appends this item's canonical tag-length-value encoding to `out`.
    fn serialize_into(&self, out: &mut Vec<u8>) {
        let mut payload = Vec::new();
        self.write_payload(&mut payload);
        out.push(self.tag());
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(&payload);
    }
}

/// An append-only Fiat-Shamir transcript: a log of pushed objects plus a
/// read cursor. The prover only ever pushes and reads the full log; the
/// verifier pushes what it reconstructs and reads in lockstep, so
/// `verifier_challenge` — which only hashes the prefix read so far — always
/// agrees with what the prover derived at the same point in the protocol.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    objects: Vec<TranscriptItem>,
    read_index: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript { objects: Vec::new(), read_index: 0 }
    }

    pub fn push(&mut self, item: TranscriptItem) {
        self.objects.push(item);
    }

    pub fn pull(&mut self) -> FriResult<TranscriptItem> {
        let item = self
            .objects
            .get(self.read_index)
            .cloned()
            .ok_or(FriError::TranscriptExhausted)?;
        self.read_index += 1;
        Ok(item)
    }

    fn serialize_range(&self, end: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for item in &self.objects[..end] {
            item.serialize_into(&mut out);
        }
        out
    }

    /// Returns the first `k` bytes of `H(serialized)`, expanding past one
    /// digest's worth of output (32 bytes) by hashing `serialized` together
    /// with a block counter, the way a fixed-output hash is usually
    /// stretched into an arbitrary-length keystream.
    fn challenge_hash(&self, end: usize, k: usize) -> Vec<u8> {
        let serialized = self.serialize_range(end);
        let mut out = Vec::with_capacity(k);
        let mut block: u64 = 0;
        while out.len() < k {
            let mut input = serialized.clone();
            input.extend_from_slice(&block.to_be_bytes());
            out.extend_from_slice(&Sha3Hasher::hash(&input));
            block += 1;
        }
        out.truncate(k);
        out
    }

    /// Derives the first `k` bytes of `H(...)` over the full object log
    /// pushed so far.
    pub fn prover_challenge(&self, k: usize) -> Vec<u8> {
        self.challenge_hash(self.objects.len(), k)
    }

    /// Derives the first `k` bytes of `H(...)` over only the prefix of the
    /// log read so far — this is what lets a verifier, who reconstructs the
    /// log by pulling, reproduce the exact same challenge the prover
    /// derived at that point.
    pub fn verifier_challenge(&self, k: usize) -> Vec<u8> {
        self.challenge_hash(self.read_index, k)
    }

    pub fn objects_len(&self) -> usize {
        self.objects.len()
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pull_round_trips() {
        let mut t = Transcript::new();
        t.push(TranscriptItem::FieldElement(42));
        t.push(TranscriptItem::MerkleRoot([7u8; 32]));
        assert_eq!(t.pull().unwrap(), TranscriptItem::FieldElement(42));
        assert_eq!(t.pull().unwrap(), TranscriptItem::MerkleRoot([7u8; 32]));
    }

    #[test]
    fn pulling_past_the_end_errors() {
        let mut t = Transcript::new();
        assert!(matches!(t.pull(), Err(FriError::TranscriptExhausted)));
    }

    #[test]
    fn prover_and_verifier_challenges_agree_in_lockstep() {
        let mut prover = Transcript::new();
        prover.push(TranscriptItem::MerkleRoot([1u8; 32]));
        let challenge = prover.prover_challenge(32);

        let mut verifier = Transcript::new();
        verifier.push(TranscriptItem::MerkleRoot([1u8; 32]));
        let _ = verifier.pull().unwrap();
        let reproduced = verifier.verifier_challenge(32);

        assert_eq!(challenge, reproduced);
    }

    #[test]
    fn verifier_challenge_before_reading_ignores_unread_suffix() {
        let mut t = Transcript::new();
        t.push(TranscriptItem::MerkleRoot([1u8; 32]));
        let before = t.verifier_challenge(32);
        t.push(TranscriptItem::MerkleRoot([2u8; 32]));
        let still = t.verifier_challenge(32);
        assert_eq!(before, still);
    }

    #[test]
    fn challenge_returns_exactly_k_bytes() {
        let mut t = Transcript::new();
        t.push(TranscriptItem::MerkleRoot([3u8; 32]));
        assert_eq!(t.prover_challenge(16).len(), 16);
        assert_eq!(t.prover_challenge(64).len(), 64);
    }

    #[test]
    fn k_bytes_are_a_prefix_of_more_bytes() {
        let mut t = Transcript::new();
        t.push(TranscriptItem::MerkleRoot([3u8; 32]));
        let short = t.prover_challenge(16);
        let long = t.prover_challenge(64);
        assert_eq!(short, long[..16]);
    }
}
