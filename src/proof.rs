//! Wire format of the proof object and the caller-supplied randomness.
//!
//! Field names mirror the JSON contract exactly: field-element values
//! travel as decimal strings, digests as lowercase hex, and the
//! caller-supplied randomness (composition factors, folding coefficients,
//! query indices) is echoed back as plain integers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Self-contained proof record. The verifier needs nothing beyond this:
/// no trace, no polynomials, no full evaluation vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "mod")]
    pub modulus: u64,
    pub dom_size: usize,
    pub interp_domain_size: usize,
    pub target: String,
    pub domain_gen: String,
    pub mul_field_gen: String,
    pub interp_poly_root: String,
    pub compos_poly_root: String,
    pub compos_factors: CompositionFactors,
    pub fri_commitment: FriCommitment,
    pub fri_decommitments: FriDecommitments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionFactors {
    pub alpha_0: u64,
    pub alpha_1: u64,
    pub alpha_2: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriCommitment {
    /// Root of every FRI layer, index 0 = the composition polynomial.
    pub layer_roots: Vec<String>,
    /// The folding coefficients actually consumed, one per fold.
    pub folding_poly_coeffs: Vec<u64>,
    /// The constant the final layer collapsed to, as a decimal string.
    pub final_constant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriDecommitments {
    pub query_num: usize,
    pub queries: Vec<QueryDecommitment>,
    pub fri_last_val: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDecommitment {
    pub idx: usize,
    /// Trace-polynomial openings at x, g·x and g²·x.
    pub f_x: Opening,
    pub f_gx: Opening,
    pub f_ggx: Opening,
    /// Per-layer openings keyed `layer_0`, `layer_1`, ... excluding the
    /// final constant layer.
    pub fri_layers: BTreeMap<String, LayerOpening>,
    pub last_val: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub val: String,
    pub auth_path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerOpening {
    pub idx: usize,
    pub val: String,
    pub auth_path: Vec<String>,
    pub sib_val: String,
    pub sib_auth_path: Vec<String>,
}

/// Externally supplied verifier randomness; no Fiat-Shamir derivation
/// happens inside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierRandomness {
    /// alpha_0, alpha_1, alpha_2 for the composition polynomial.
    pub poly_coeffs: Vec<u64>,
    /// One beta per FRI folding layer.
    pub folding_coeffs: Vec<u64>,
    /// Query indices into the evaluation domain.
    pub challenges: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_randomness_json_shape() {
        let json = r#"{
            "poly_coeffs": [1, 2, 3],
            "folding_coeffs": [10, 11, 12, 13],
            "challenges": [5, 80, 300]
        }"#;
        let randomness: VerifierRandomness = serde_json::from_str(json).unwrap();
        assert_eq!(randomness.poly_coeffs, vec![1, 2, 3]);
        assert_eq!(randomness.challenges, vec![5, 80, 300]);
    }

    #[test]
    fn test_modulus_serializes_as_mod() {
        let factors = CompositionFactors {
            alpha_0: 1,
            alpha_1: 2,
            alpha_2: 3,
        };
        let commitment = FriCommitment {
            layer_roots: vec!["00".into()],
            folding_poly_coeffs: vec![7],
            final_constant: "42".into(),
        };
        let decommitments = FriDecommitments {
            query_num: 0,
            queries: vec![],
            fri_last_val: "42".into(),
        };
        let proof = Proof {
            modulus: 3221225473,
            dom_size: 8192,
            interp_domain_size: 1024,
            target: "5".into(),
            domain_gen: "1".into(),
            mul_field_gen: "5".into(),
            interp_poly_root: "00".into(),
            compos_poly_root: "00".into(),
            compos_factors: factors,
            fri_commitment: commitment,
            fri_decommitments: decommitments,
        };

        let json = serde_json::to_string(&proof).unwrap();
        assert!(json.contains("\"mod\":3221225473"));
        let back: Proof = serde_json::from_str(&json).unwrap();
        assert_eq!(back, proof);
    }
}
