//! FRI commit and decommit phases.
//!
//! The commit phase folds the composition polynomial layer by layer until
//! it collapses to a constant, committing every layer with a Merkle tree.
//! The decommit phase opens the trace polynomial and every layer at the
//! caller-chosen query indices.

use crate::error::StarkError;
use crate::field::FieldElement;
use crate::math::domain::fold_domain;
use crate::math::polynomial::Polynomial;
use crate::merkle::MerkleTree;
use crate::proof::{FriCommitment, FriDecommitments, LayerOpening, Opening, QueryDecommitment};
use std::collections::BTreeMap;

/// The full layer chain produced by the commit phase. Index 0 holds the
/// composition polynomial itself; each following layer is the fold of the
/// previous one over the squared half-domain.
pub struct FriLayers {
    pub polys: Vec<Polynomial>,
    pub domains: Vec<Vec<FieldElement>>,
    pub evals: Vec<Vec<FieldElement>>,
    pub merkles: Vec<MerkleTree>,
}

impl FriLayers {
    pub fn num_layers(&self) -> usize {
        self.polys.len()
    }
}

/// Random linear fold of the even/odd coefficient split:
/// next(Y) = even(Y) + beta·odd(Y), so that next(x²) combines p(x) and p(-x).
pub fn next_fri_polynomial(poly: &Polynomial, beta: FieldElement) -> Polynomial {
    let coeffs = poly.coefficients();
    let even: Vec<FieldElement> = coeffs.iter().copied().step_by(2).collect();
    let odd: Vec<FieldElement> = coeffs.iter().copied().skip(1).step_by(2).collect();
    Polynomial::new(even).add(&Polynomial::new(odd).scale(beta))
}

/// One folding step: next polynomial, next (squared, halved) domain, and
/// the evaluations of the former over the latter.
pub fn next_fri_layer(
    poly: &Polynomial,
    domain: &[FieldElement],
    beta: FieldElement,
) -> (Polynomial, Vec<FieldElement>, Vec<FieldElement>) {
    let next_poly = next_fri_polynomial(poly, beta);
    let next_domain = fold_domain(domain);
    let next_eval = next_domain.iter().map(|&x| next_poly.eval(x)).collect();
    (next_poly, next_domain, next_eval)
}

/// Commit phase: folds until the polynomial degree reaches 0, consuming
/// one externally supplied coefficient per layer. Returns the layer chain
/// together with the commitment record for the proof object.
pub fn commit_fri(
    cp: Polynomial,
    domain: Vec<FieldElement>,
    cp_eval: Vec<FieldElement>,
    cp_merkle: MerkleTree,
    coeffs: &[u64],
) -> Result<(FriLayers, FriCommitment), StarkError> {
    let mut layer_roots = vec![hex::encode(cp_merkle.root())];
    let mut layers = FriLayers {
        polys: vec![cp],
        domains: vec![domain],
        evals: vec![cp_eval],
        merkles: vec![cp_merkle],
    };

    let mut consumed = 0;
    while layers.polys[layers.polys.len() - 1]
        .degree()
        .is_some_and(|d| d > 0)
    {
        let beta = coeffs
            .get(consumed)
            .copied()
            .ok_or(StarkError::NotEnoughFoldingCoefficients { consumed })?;

        let (next_poly, next_domain, next_eval) = next_fri_layer(
            &layers.polys[layers.polys.len() - 1],
            &layers.domains[layers.domains.len() - 1],
            FieldElement::new(beta),
        );
        let next_merkle = MerkleTree::new(&next_eval)?;

        layer_roots.push(hex::encode(next_merkle.root()));
        layers.polys.push(next_poly);
        layers.domains.push(next_domain);
        layers.evals.push(next_eval);
        layers.merkles.push(next_merkle);
        consumed += 1;
    }

    let final_constant = layers.polys[layers.polys.len() - 1]
        .eval(FieldElement::zero())
        .to_string();
    let commitment = FriCommitment {
        layer_roots,
        folding_poly_coeffs: coeffs[..consumed].to_vec(),
        final_constant,
    };

    log::debug!("FRI commit: {} folding layers", consumed);
    Ok((layers, commitment))
}

fn open(eval: &[FieldElement], merkle: &MerkleTree, idx: usize) -> Result<Opening, StarkError> {
    Ok(Opening {
        val: eval[idx].to_string(),
        auth_path: merkle
            .authentication_path(idx)?
            .iter()
            .map(hex::encode)
            .collect(),
    })
}

/// Opens every layer except the last at the query index and its sibling
/// half a domain away. The index reduction cascades layer to layer, so a
/// top-level index addresses every layer consistently.
pub fn decommit_on_fri_layers(
    mut idx: usize,
    layers: &FriLayers,
) -> Result<(BTreeMap<String, LayerOpening>, String), StarkError> {
    let mut openings = BTreeMap::new();

    let last = layers.num_layers() - 1;
    for layer_num in 0..last {
        let eval = &layers.evals[layer_num];
        let merkle = &layers.merkles[layer_num];
        let length = eval.len();
        idx %= length;
        let sib_idx = (idx + length / 2) % length;

        let value = open(eval, merkle, idx)?;
        let sibling = open(eval, merkle, sib_idx)?;
        openings.insert(
            format!("layer_{layer_num}"),
            LayerOpening {
                idx,
                val: value.val,
                auth_path: value.auth_path,
                sib_val: sibling.val,
                sib_auth_path: sibling.auth_path,
            },
        );
    }

    let last_val = layers.evals[last][0].to_string();
    Ok((openings, last_val))
}

/// Opens the trace polynomial at x, g·x and g²·x for one query, together
/// with the per-layer openings. The query must leave room for the g²
/// shift in the evaluation vector.
pub fn decommit_on_query(
    idx: usize,
    f_eval: &[FieldElement],
    f_merkle: &MerkleTree,
    layers: &FriLayers,
    blowup: usize,
) -> Result<QueryDecommitment, StarkError> {
    if idx.checked_add(2 * blowup).map_or(true, |end| end >= f_eval.len()) {
        return Err(StarkError::IndexOutOfRange {
            index: idx,
            len: f_eval.len(),
        });
    }

    let (fri_layers, last_val) = decommit_on_fri_layers(idx, layers)?;
    Ok(QueryDecommitment {
        idx,
        f_x: open(f_eval, f_merkle, idx)?,
        f_gx: open(f_eval, f_merkle, idx + blowup)?,
        f_ggx: open(f_eval, f_merkle, idx + 2 * blowup)?,
        fri_layers,
        last_val,
    })
}

/// Decommit phase: one record per query index.
pub fn decommit_fri(
    f_eval: &[FieldElement],
    f_merkle: &MerkleTree,
    layers: &FriLayers,
    challenges: &[usize],
    query_num: usize,
    blowup: usize,
) -> Result<FriDecommitments, StarkError> {
    if challenges.len() < query_num {
        return Err(StarkError::InvalidRandomness(format!(
            "{} challenge indices supplied for {} queries",
            challenges.len(),
            query_num
        )));
    }

    let mut queries = Vec::with_capacity(query_num);
    for &idx in &challenges[..query_num] {
        queries.push(decommit_on_query(idx, f_eval, f_merkle, layers, blowup)?);
    }

    let last_eval = &layers.evals[layers.num_layers() - 1];
    Ok(FriDecommitments {
        query_num,
        queries,
        fri_last_val: last_eval[0].to_string(),
    })
}
