use crate::error::StarkError;
use crate::field::FieldElement;
use sha2::{Digest, Sha256};

pub type Hash = [u8; 32];

/// Complete binary hash tree over a sequence of field elements.
///
/// Leaves are padded with zero elements up to the next power of two, so
/// every level has an even node count and an authentication path is just
/// the sibling at each level, ordered leaf to root.
#[derive(Debug)]
pub struct MerkleTree {
    pub num_leaves: usize,
    pub levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    pub fn new(values: &[FieldElement]) -> Result<Self, StarkError> {
        if values.is_empty() {
            return Err(StarkError::EmptyLeaves);
        }

        let num_leaves = values.len().next_power_of_two();
        let mut current_level: Vec<Hash> = values.iter().map(hash_leaf).collect();
        current_level.resize(num_leaves, hash_leaf(&FieldElement::zero()));

        let mut levels = vec![current_level.clone()];
        while current_level.len() > 1 {
            let mut next_level = Vec::with_capacity(current_level.len() / 2);
            for pair in current_level.chunks(2) {
                next_level.push(hash_nodes(&pair[0], &pair[1]));
            }
            current_level = next_level;
            levels.push(current_level.clone());
        }

        Ok(Self { num_leaves, levels })
    }

    pub fn root(&self) -> Hash {
        self.levels[self.levels.len() - 1][0]
    }

    /// Sibling hashes from the leaf level up to (but excluding) the root.
    pub fn authentication_path(&self, index: usize) -> Result<Vec<Hash>, StarkError> {
        if index >= self.num_leaves {
            return Err(StarkError::IndexOutOfRange {
                index,
                len: self.num_leaves,
            });
        }

        let mut path = Vec::with_capacity(self.levels.len() - 1);
        let mut current_index = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_index = current_index ^ 1;
            path.push(level[sibling_index]);
            current_index /= 2;
        }

        Ok(path)
    }
}

/// Recomputes the root from a claimed leaf value and its authentication
/// path, choosing left/right concatenation by index parity at each level.
/// Works without a tree instance, which is what the verifier needs.
pub fn verify_decommitment(
    index: usize,
    value: FieldElement,
    path: &[Hash],
    root: &Hash,
) -> bool {
    if path.len() < usize::BITS as usize && index >= 1usize << path.len() {
        return false;
    }

    let mut current_hash = hash_leaf(&value);
    let mut current_index = index;
    for sibling in path {
        current_hash = if current_index % 2 == 0 {
            hash_nodes(&current_hash, sibling)
        } else {
            hash_nodes(sibling, &current_hash)
        };
        current_index /= 2;
    }

    current_hash == *root
}

fn hash_leaf(value: &FieldElement) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(value.to_bytes());
    hasher.finalize().into()
}

fn hash_nodes(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
