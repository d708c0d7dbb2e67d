use crate::error::{FriError, FriResult};
use crate::hash::Hasher;

/// A recursive, power-of-two binary Merkle tree over a generic [`Hasher`].
/// Modeled as free functions rather than an owning tree type: no instance
/// state is needed beyond the leaves passed in at call time.
fn commit_leaves<H: Hasher>(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.len() == 1 {
        return leaves[0];
    }
    let half = leaves.len() / 2;
    let left = commit_leaves::<H>(&leaves[..half]);
    let right = commit_leaves::<H>(&leaves[half..]);
    H::hash_pair(&left, &right)
}

fn open_leaves<H: Hasher>(index: usize, leaves: &[[u8; 32]]) -> Vec<[u8; 32]> {
    if leaves.len() == 2 {
        return vec![leaves[1 - index]];
    }
    let half = leaves.len() / 2;
    if index < half {
        let mut path = open_leaves::<H>(index, &leaves[..half]);
        path.push(commit_leaves::<H>(&leaves[half..]));
        path
    } else {
        let mut path = open_leaves::<H>(index - half, &leaves[half..]);
        path.push(commit_leaves::<H>(&leaves[..half]));
        path
    }
}

fn verify_leaf<H: Hasher>(root: &[u8; 32], index: usize, path: &[[u8; 32]], leaf: &[u8; 32]) -> bool {
    if path.len() == 1 {
        return if index % 2 == 0 {
            *root == H::hash_pair(leaf, &path[0])
        } else {
            *root == H::hash_pair(&path[0], leaf)
        };
    }
    let (sibling, rest) = path.split_last().expect("path is non-empty");
    if index % 2 == 0 {
        let combined = H::hash_pair(leaf, sibling);
        verify_leaf::<H>(root, index / 2, rest, &combined)
    } else {
        let combined = H::hash_pair(sibling, leaf);
        verify_leaf::<H>(root, index / 2, rest, &combined)
    }
}

fn check_shape(len: usize) -> FriResult<()> {
    if len == 0 || (len & (len - 1)) != 0 {
        return Err(FriError::BadLeafCount);
    }
    Ok(())
}

/// Hashes each element of `data` and commits to the resulting leaves.
pub fn commit<H: Hasher>(data: &[Vec<u8>]) -> FriResult<[u8; 32]> {
    check_shape(data.len())?;
    let leaves: Vec<[u8; 32]> = data.iter().map(|d| H::hash(d)).collect();
    Ok(commit_leaves::<H>(&leaves))
}

/// Produces the authentication path for `data[index]`.
pub fn open<H: Hasher>(index: usize, data: &[Vec<u8>]) -> FriResult<Vec<[u8; 32]>> {
    check_shape(data.len())?;
    if index >= data.len() {
        return Err(FriError::BadParameter(format!(
            "index {index} out of range for {} leaves",
            data.len()
        )));
    }
    let leaves: Vec<[u8; 32]> = data.iter().map(|d| H::hash(d)).collect();
    Ok(open_leaves::<H>(index, &leaves))
}

/// Verifies that `data_element` is leaf `index` under `root`, given an
/// authentication `path` produced by [`open`].
pub fn verify<H: Hasher>(root: &[u8; 32], index: usize, path: &[[u8; 32]], data_element: &[u8]) -> bool {
    if path.is_empty() {
        log::error!("merkle verification failed: empty authentication path");
        return false;
    }
    let leaf = H::hash(data_element);
    let ok = verify_leaf::<H>(root, index, path, &leaf);
    if !ok {
        log::error!("merkle verification failed: path did not reproduce the root");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha3Hasher;

    fn leaves(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| vec![i as u8]).collect()
    }

    #[test]
    fn open_and_verify_round_trip_for_every_leaf() {
        let data = leaves(16);
        let root = commit::<Sha3Hasher>(&data).unwrap();
        for i in 0..data.len() {
            let path = open::<Sha3Hasher>(i, &data).unwrap();
            assert!(verify::<Sha3Hasher>(&root, i, &path, &data[i]));
        }
    }

    #[test]
    fn tampered_leaf_is_rejected() {
        let data = leaves(8);
        let root = commit::<Sha3Hasher>(&data).unwrap();
        let path = open::<Sha3Hasher>(3, &data).unwrap();
        assert!(!verify::<Sha3Hasher>(&root, 3, &path, &[99u8]));
    }

    #[test]
    fn non_power_of_two_leaf_count_is_rejected() {
        let data = leaves(5);
        assert!(matches!(commit::<Sha3Hasher>(&data), Err(FriError::BadLeafCount)));
    }
}
