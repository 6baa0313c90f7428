//! Proof generation: trace → trace polynomial → constraint quotients →
//! composition polynomial → FRI commit/decommit → proof object.

use crate::error::StarkError;
use crate::field::FieldElement;
use crate::math::domain::{coset, subgroup, subgroup_generator};
use crate::math::fri::{commit_fri, decommit_fri};
use crate::math::polynomial::Polynomial;
use crate::merkle::MerkleTree;
use crate::params::ProtocolParams;
use crate::proof::{CompositionFactors, Proof, VerifierRandomness};
use crate::trace::build_trace;
use log::debug;

fn constant(c: FieldElement) -> Polynomial {
    Polynomial::new(vec![c])
}

/// X - a
fn linear(a: FieldElement) -> Polynomial {
    Polynomial::new(vec![-a, FieldElement::one()])
}

/// Generates a proof for the default 1024/8192 instance.
///
/// `verifier_randomness_json` carries all protocol randomness:
/// `{ "poly_coeffs": [a0, a1, a2], "folding_coeffs": [...], "challenges": [...] }`.
pub fn generate_proof(
    seed: &str,
    query_count: usize,
    verifier_randomness_json: &str,
) -> Result<Proof, StarkError> {
    generate_proof_with_params(
        ProtocolParams::default(),
        seed,
        query_count,
        verifier_randomness_json,
    )
}

pub fn generate_proof_with_params(
    params: ProtocolParams,
    seed: &str,
    query_count: usize,
    verifier_randomness_json: &str,
) -> Result<Proof, StarkError> {
    let randomness: VerifierRandomness = serde_json::from_str(verifier_randomness_json)
        .map_err(|e| StarkError::InvalidRandomness(e.to_string()))?;
    if randomness.poly_coeffs.len() < 3 {
        return Err(StarkError::InvalidRandomness(format!(
            "need 3 composition factors, got {}",
            randomness.poly_coeffs.len()
        )));
    }
    if randomness.challenges.len() < query_count {
        return Err(StarkError::InvalidRandomness(format!(
            "{} challenge indices supplied for {} queries",
            randomness.challenges.len(),
            query_count
        )));
    }

    let n = params.interp_domain_size;
    let trace = build_trace(seed, params.trace_len());
    let target = trace[params.target_idx()];
    debug!("trace of length {} built, target {}", trace.len(), target);

    let g = subgroup_generator(n)?;
    let trace_domain = subgroup(n)?;
    let eval_domain = coset(params.eval_domain_size)?;

    // The trace only occupies the first n - 1 subgroup points.
    let p = Polynomial::interpolate(&trace_domain[..params.trace_len()], &trace)?;
    let ev_points: Vec<FieldElement> = eval_domain.iter().map(|&d| p.eval(d)).collect();
    let f_merkle = MerkleTree::new(&ev_points)?;
    debug!("trace polynomial committed, degree {:?}", p.degree());

    // boundary at step 0: the trace starts at 1.
    let p0 = p
        .sub(&constant(FieldElement::one()))
        .divide_exact(&linear(FieldElement::one()))?;

    // boundary at the target step.
    let target_point = g.pow(params.target_idx() as u64);
    let p1 = p.sub(&constant(target)).divide_exact(&linear(target_point))?;

    // transition: p(g²X) - p(gX)² - p(X)² vanishes at every step except
    // the last three subgroup points.
    let p_gx = p.compose(&Polynomial::new(vec![FieldElement::zero(), g]));
    let p_ggx = p.compose(&Polynomial::new(vec![FieldElement::zero(), g * g]));
    let numerator = p_ggx.sub(&p_gx.multiply(&p_gx)).sub(&p.multiply(&p));

    let x_n_minus_one = Polynomial::monomial(n, FieldElement::one())
        .sub(&constant(FieldElement::one()));
    let excluded = linear(g.pow((n - 3) as u64))
        .multiply(&linear(g.pow((n - 2) as u64)))
        .multiply(&linear(g.pow((n - 1) as u64)));
    let vanishing = x_n_minus_one.divide_exact(&excluded)?;
    let p2 = numerator.divide_exact(&vanishing)?;

    let alpha_0 = randomness.poly_coeffs[0];
    let alpha_1 = randomness.poly_coeffs[1];
    let alpha_2 = randomness.poly_coeffs[2];
    let cp = p0
        .scale(FieldElement::new(alpha_0))
        .add(&p1.scale(FieldElement::new(alpha_1)))
        .add(&p2.scale(FieldElement::new(alpha_2)));
    debug!("composition polynomial degree {:?}", cp.degree());

    let cp_eval: Vec<FieldElement> = eval_domain.iter().map(|&d| cp.eval(d)).collect();
    let cp_merkle = MerkleTree::new(&cp_eval)?;
    let compos_poly_root = hex::encode(cp_merkle.root());

    let (layers, fri_commitment) = commit_fri(
        cp,
        eval_domain,
        cp_eval,
        cp_merkle,
        &randomness.folding_coeffs,
    )?;
    let fri_decommitments = decommit_fri(
        &ev_points,
        &f_merkle,
        &layers,
        &randomness.challenges,
        query_count,
        params.blowup(),
    )?;

    Ok(Proof {
        modulus: FieldElement::MODULUS,
        dom_size: params.eval_domain_size,
        interp_domain_size: n,
        target: target.to_string(),
        domain_gen: g.to_string(),
        mul_field_gen: FieldElement::generator().to_string(),
        interp_poly_root: hex::encode(f_merkle.root()),
        compos_poly_root,
        compos_factors: CompositionFactors {
            alpha_0,
            alpha_1,
            alpha_2,
        },
        fri_commitment,
        fri_decommitments,
    })
}
