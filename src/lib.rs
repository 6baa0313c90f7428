//! Toy STARK proof engine over the prime field p = 3·2^30 + 1.
//!
//! The prover shows that a secret execution trace, derived from a caller
//! seed, satisfies the squares recurrence t[n] = t[n-2]² + t[n-1]², using
//! FRI as the low-degree commitment scheme. All protocol randomness
//! (composition factors, folding coefficients, query indices) is supplied
//! by the caller; there is no Fiat-Shamir transcript inside the core.

use sha2::{Digest, Sha256};

pub mod error;
pub mod field;
pub mod math;
pub mod merkle;
pub mod params;
pub mod proof;
pub mod prover;
pub mod trace;
pub mod verifier;

pub use error::StarkError;
pub use proof::Proof;
pub use prover::generate_proof;
pub use verifier::{verify_proof, verify_proof_json};

/// Seed-hashing capability, kept separate from the Merkle commitment
/// hashing even though both are SHA-256.
pub fn digest_sha2(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
