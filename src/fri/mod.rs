use crate::error::{FriError, FriResult};
use crate::fiat_shamir::{Transcript, TranscriptItem};
use crate::field::Fp;
use crate::hash::{Hasher, Sha3Hasher};
use crate::merkle;
use crate::polynomial::Polynomial;

fn field_elements_to_leaves(codeword: &[Fp]) -> Vec<Vec<u8>> {
    codeword.iter().map(|c| c.representative().to_be_bytes().to_vec()).collect()
}

fn sample_index(bytes: &[u8], size: usize) -> usize {
    let mut acc: u64 = 0;
    for &b in bytes {
        acc = (acc << 8) ^ (b as u64);
    }
    (acc as usize) % size
}

fn pull_path(transcript: &mut Transcript) -> FriResult<Vec<[u8; 32]>> {
    match transcript.pull()? {
        TranscriptItem::Path(path) => Ok(path),
        _ => Err(FriError::MalformedTranscriptItem),
    }
}

fn pull_triplet(transcript: &mut Transcript) -> FriResult<(Fp, Fp, Fp)> {
    match transcript.pull()? {
        TranscriptItem::FieldElements(values) if values.len() == 3 => Ok((
            Fp::from_u128(values[0]),
            Fp::from_u128(values[1]),
            Fp::from_u128(values[2]),
        )),
        _ => Err(FriError::MalformedTranscriptItem),
    }
}

/// Parameters for one FRI proximity-proof instance, run over the one
/// canonical prime field this crate fixes. Entirely the caller's
/// responsibility to construct — there is no configuration surface beyond
/// these fields.
#[derive(Debug, Clone, Copy)]
pub struct Fri {
    pub offset: Fp,
    pub omega: Fp,
    pub domain_length: usize,
    pub expansion_factor: usize,
    pub num_colinearity_tests: usize,
}

impl Fri {
    pub fn new(
        offset: Fp,
        omega: Fp,
        domain_length: usize,
        expansion_factor: usize,
        num_colinearity_tests: usize,
    ) -> FriResult<Self> {
        if !domain_length.is_power_of_two() {
            return Err(FriError::BadParameter("domain_length must be a power of two".into()));
        }
        Ok(Fri { offset, omega, domain_length, expansion_factor, num_colinearity_tests })
    }

    /// How many times the codeword gets folded before it's small enough to
    /// reveal outright.
    pub fn num_rounds(&self) -> usize {
        let mut codeword_length = self.domain_length;
        let mut rounds = 0;
        while codeword_length > self.expansion_factor && 4 * self.num_colinearity_tests < codeword_length {
            codeword_length /= 2;
            rounds += 1;
        }
        rounds
    }

    pub fn eval_domain(&self) -> Vec<Fp> {
        (0..self.domain_length)
            .map(|i| self.offset * self.omega.pow(i as u128))
            .collect()
    }

    fn commit_phase(&self, initial_codeword: Vec<Fp>, transcript: &mut Transcript) -> FriResult<Vec<Vec<Fp>>> {
        let rounds = self.num_rounds();
        let mut omega = self.omega;
        let mut offset = self.offset;
        let mut codewords: Vec<Vec<Fp>> = Vec::with_capacity(rounds);
        let mut current = initial_codeword;
        let two_inv = Fp::from_u128(2).inv()?;

        for r in 0..rounds.max(1) {
            let root = merkle::commit::<Sha3Hasher>(&field_elements_to_leaves(&current))?;
            transcript.push(TranscriptItem::MerkleRoot(root));

            if r == rounds.saturating_sub(1) {
                break;
            }

            let seed = transcript.prover_challenge(32);
            let alpha = Fp::sample(&seed);

            codewords.push(current.clone());

            let half = current.len() / 2;
            let mut folded = Vec::with_capacity(half);
            for i in 0..half {
                let x = offset * omega.pow(i as u128);
                let ratio = alpha * x.inv()?;
                let term_a = (Fp::one() + ratio) * current[i];
                let term_b = (Fp::one() - ratio) * current[half + i];
                folded.push(two_inv * (term_a + term_b));
            }
            current = folded;
            omega = omega * omega;
            offset = offset * offset;
        }

        transcript.push(TranscriptItem::FieldElements(
            current.iter().map(|c| c.representative()).collect(),
        ));
        codewords.push(current);

        Ok(codewords)
    }

    fn sample_indices(&self, seed: &[u8], size: usize, reduced_size: usize, number: usize) -> FriResult<Vec<usize>> {
        if number > reduced_size {
            return Err(FriError::BadParameter(format!(
                "cannot sample {number} indices from a reduced domain of size {reduced_size}"
            )));
        }
        let mut indices = Vec::with_capacity(number);
        let mut reduced_indices = Vec::with_capacity(number);
        let mut counter: u64 = 0;
        while indices.len() < number {
            let mut input = seed.to_vec();
            input.extend_from_slice(&counter.to_be_bytes());
            let digest = Sha3Hasher::hash(&input);
            let index = sample_index(&digest, size);
            let reduced_index = index % reduced_size;
            counter += 1;
            if !reduced_indices.contains(&reduced_index) {
                indices.push(index);
                reduced_indices.push(reduced_index);
            }
        }
        Ok(indices)
    }

    fn query_phase(
        &self,
        current: &[Fp],
        next: &[Fp],
        c_indices: &[usize],
        transcript: &mut Transcript,
    ) -> FriResult<()> {
        let half = current.len() / 2;
        let a_indices = c_indices.to_vec();
        let b_indices: Vec<usize> = c_indices.iter().map(|i| i + half).collect();
        let current_leaves = field_elements_to_leaves(current);
        let next_leaves = field_elements_to_leaves(next);

        for s in 0..self.num_colinearity_tests {
            transcript.push(TranscriptItem::FieldElements(vec![
                current[a_indices[s]].representative(),
                current[b_indices[s]].representative(),
                next[c_indices[s]].representative(),
            ]));
        }
        for s in 0..self.num_colinearity_tests {
            transcript.push(TranscriptItem::Path(merkle::open::<Sha3Hasher>(a_indices[s], &current_leaves)?));
            transcript.push(TranscriptItem::Path(merkle::open::<Sha3Hasher>(b_indices[s], &current_leaves)?));
            transcript.push(TranscriptItem::Path(merkle::open::<Sha3Hasher>(c_indices[s], &next_leaves)?));
        }
        Ok(())
    }

    /// Commits to `codeword` and derives the query indices, pushing every
    /// round's Merkle root, folding challenge and query response into
    /// `transcript`. Returns the indices sampled against the initial
    /// (unfolded) domain, which a caller might want for its own bookkeeping.
    pub fn prove(&self, codeword: Vec<Fp>, transcript: &mut Transcript) -> FriResult<Vec<usize>> {
        if codeword.len() != self.domain_length {
            return Err(FriError::BadParameter(
                "initial codeword length does not match the configured domain length".into(),
            ));
        }

        let codewords = self.commit_phase(codeword, transcript)?;

        let seed = transcript.prover_challenge(32);
        let size = codewords.get(1).map(|c| c.len()).unwrap_or_else(|| codewords[0].len());
        let reduced_size = codewords.last().expect("commit_phase always returns at least one codeword").len();
        let top_level_indices = self.sample_indices(&seed, size, reduced_size, self.num_colinearity_tests)?;
        let mut indices = top_level_indices.clone();

        for i in 0..codewords.len().saturating_sub(1) {
            let half = codewords[i].len() / 2;
            indices = indices.iter().map(|idx| idx % half).collect();
            self.query_phase(&codewords[i], &codewords[i + 1], &indices, transcript)?;
        }

        Ok(top_level_indices)
    }

    /// Replays the protocol against `transcript`, reconstructing what the
    /// prover must have committed to and rejecting on the first
    /// inconsistency. Returns `false` (with a logged diagnostic) rather
    /// than an error: an accept/reject verdict, not a propagated failure.
    pub fn verify(&self, transcript: &mut Transcript) -> bool {
        let rounds = self.num_rounds();
        let mut omega = self.omega;
        let mut offset = self.offset;
        let mut roots = Vec::with_capacity(rounds.max(1));
        let mut alphas = Vec::with_capacity(rounds.saturating_sub(1));

        for r in 0..rounds.max(1) {
            let root = match transcript.pull() {
                Ok(TranscriptItem::MerkleRoot(root)) => root,
                _ => {
                    log::error!("fri verification failed: expected a merkle root at round {r}");
                    return false;
                }
            };
            roots.push(root);

            if r != rounds.saturating_sub(1) {
                let seed = transcript.verifier_challenge(32);
                alphas.push(Fp::sample(&seed));
                omega = omega * omega;
                offset = offset * offset;
            }
        }

        let last_codeword: Vec<Fp> = match transcript.pull() {
            Ok(TranscriptItem::FieldElements(values)) => values.into_iter().map(Fp::from_u128).collect(),
            _ => {
                log::error!("fri verification failed: expected the final codeword");
                return false;
            }
        };

        let last_root = match merkle::commit::<Sha3Hasher>(&field_elements_to_leaves(&last_codeword)) {
            Ok(root) => root,
            Err(_) => {
                log::error!("fri verification failed: final codeword has a bad shape");
                return false;
            }
        };
        if roots.last() != Some(&last_root) {
            log::error!("fri verification failed: final codeword does not match its committed root");
            return false;
        }

        if self.expansion_factor != 0 {
            let max_degree = (last_codeword.len() / self.expansion_factor).saturating_sub(1) as i64;
            let last_domain: Vec<Fp> = (0..last_codeword.len())
                .map(|i| offset * omega.pow(i as u128))
                .collect();
            let poly = match Polynomial::interpolate_domain(&last_domain, &last_codeword) {
                Ok(p) => p,
                Err(_) => {
                    log::error!("fri verification failed: could not interpolate the final codeword");
                    return false;
                }
            };
            if poly.degree() > max_degree {
                log::error!("fri verification failed: final codeword exceeds the expected low-degree bound");
                return false;
            }
        }

        let seed = transcript.verifier_challenge(32);
        let size = if rounds >= 1 { self.domain_length >> 1 } else { self.domain_length };
        let reduced_size = last_codeword.len();
        let top_level_indices = match self.sample_indices(&seed, size, reduced_size, self.num_colinearity_tests) {
            Ok(indices) => indices,
            Err(_) => {
                log::error!("fri verification failed: could not derive query indices");
                return false;
            }
        };

        let mut indices = top_level_indices;
        let mut current_omega = self.omega;
        let mut current_offset = self.offset;
        let mut current_length = self.domain_length;

        for r in 0..rounds.saturating_sub(1) {
            let half = current_length / 2;
            indices = indices.iter().map(|i| i % half).collect();

            let mut triplets = Vec::with_capacity(self.num_colinearity_tests);
            for _ in 0..self.num_colinearity_tests {
                match pull_triplet(transcript) {
                    Ok(t) => triplets.push(t),
                    Err(_) => {
                        log::error!("fri verification failed: expected a query triplet at round {r}");
                        return false;
                    }
                }
            }

            let mut a_paths = Vec::with_capacity(self.num_colinearity_tests);
            let mut b_paths = Vec::with_capacity(self.num_colinearity_tests);
            let mut c_paths = Vec::with_capacity(self.num_colinearity_tests);
            for group in [&mut a_paths, &mut b_paths, &mut c_paths] {
                for _ in 0..self.num_colinearity_tests {
                    match pull_path(transcript) {
                        Ok(path) => group.push(path),
                        Err(_) => {
                            log::error!("fri verification failed: expected an authentication path at round {r}");
                            return false;
                        }
                    }
                }
            }

            for s in 0..self.num_colinearity_tests {
                let a_index = indices[s];
                let b_index = a_index + half;
                let c_index = indices[s];
                let (a_value, b_value, c_value) = triplets[s];

                let ax = current_offset * current_omega.pow(a_index as u128);
                let bx = current_offset * current_omega.pow(b_index as u128);
                let cx = alphas[r];
                let points = [(ax, a_value), (bx, b_value), (cx, c_value)];
                match Polynomial::test_colinearity(&points) {
                    Ok(true) => {}
                    _ => {
                        log::error!("fri verification failed: colinearity check failed at round {r}, test {s}");
                        return false;
                    }
                }

                let a_leaf = a_value.representative().to_be_bytes().to_vec();
                let b_leaf = b_value.representative().to_be_bytes().to_vec();
                let c_leaf = c_value.representative().to_be_bytes().to_vec();

                if !merkle::verify::<Sha3Hasher>(&roots[r], a_index, &a_paths[s], &a_leaf) {
                    return false;
                }
                if !merkle::verify::<Sha3Hasher>(&roots[r], b_index, &b_paths[s], &b_leaf) {
                    return false;
                }
                if !merkle::verify::<Sha3Hasher>(&roots[r + 1], c_index, &c_paths[s], &c_leaf) {
                    return false;
                }
            }

            current_omega = current_omega * current_omega;
            current_offset = current_offset * current_offset;
            current_length = half;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Polynomial;

    fn honest_setup(degree: usize) -> (Fri, Vec<Fp>) {
        let domain_length = 64usize;
        let expansion_factor = 4usize;
        let num_colinearity_tests = 4usize;
        let offset = Fp::generator();
        let omega = Fp::primitive_nth_root(domain_length as u128).unwrap();
        let fri = Fri::new(offset, omega, domain_length, expansion_factor, num_colinearity_tests).unwrap();

        let coefficients: Vec<Fp> = (0..=degree).map(|i| Fp::from_u128((i as u128) + 1)).collect();
        let poly = Polynomial::new(coefficients);
        let codeword = poly.evaluate_domain(&fri.eval_domain());
        (fri, codeword)
    }

    #[test]
    fn honest_proof_is_accepted() {
        let (fri, codeword) = honest_setup(15);
        // `prove` only ever pushes, so the same transcript's read cursor is
        // still at zero and can be handed straight to `verify`.
        let mut transcript = Transcript::new();
        fri.prove(codeword, &mut transcript).unwrap();

        assert!(fri.verify(&mut transcript));
    }

    #[test]
    fn corrupted_codeword_value_is_rejected() {
        let (fri, mut codeword) = honest_setup(15);
        codeword[3] = codeword[3] + Fp::one();
        let mut transcript = Transcript::new();
        fri.prove(codeword, &mut transcript).unwrap();

        assert!(!fri.verify(&mut transcript));
    }

    #[test]
    fn truncated_transcript_is_rejected() {
        let (fri, codeword) = honest_setup(15);
        let mut prover_transcript = Transcript::new();
        fri.prove(codeword, &mut prover_transcript).unwrap();

        // A transcript with nothing pushed can't even produce a first root.
        let mut empty = Transcript::new();
        assert!(!fri.verify(&mut empty));
    }
}
