//! Independent proof verification.
//!
//! The verifier trusts nothing the prover derived: it rebuilds every
//! domain from the proof's metadata, recomputes the expected composition
//! value at each query from the opened trace values, and checks every
//! Merkle opening and folding equation. Failures are accumulated into a
//! diagnostics list rather than aborting, so callers always see the full
//! set of problems.

use crate::field::FieldElement;
use crate::math::domain::{coset, fold_domain, subgroup_generator};
use crate::merkle::{self, Hash, MerkleTree};
use crate::proof::{LayerOpening, Proof, QueryDecommitment};
use log::debug;

/// Verifies a proof straight from its JSON encoding. A document that does
/// not deserialize is a structural failure, reported as a diagnostic.
pub fn verify_proof_json(json: &str) -> (bool, Vec<String>) {
    match serde_json::from_str::<Proof>(json) {
        Ok(proof) => verify_proof(&proof),
        Err(e) => (false, vec![format!("Malformed proof document: {e}")]),
    }
}

/// Verifies a proof object. Returns the validity verdict together with
/// every diagnostic collected; the proof is accepted only when the list
/// is empty.
pub fn verify_proof(proof: &Proof) -> (bool, Vec<String>) {
    let mut errors = Vec::new();

    // Structural phase: anything unparseable here makes the remaining
    // checks meaningless, so these return immediately.
    if proof.modulus != FieldElement::MODULUS {
        errors.push(format!(
            "Unsupported field modulus {} (expected {})",
            proof.modulus,
            FieldElement::MODULUS
        ));
        return (false, errors);
    }

    let dom_size = proof.dom_size;
    let interp_size = proof.interp_domain_size;
    if !dom_size.is_power_of_two()
        || !interp_size.is_power_of_two()
        || interp_size < 4
        || dom_size <= interp_size
    {
        errors.push(format!(
            "Invalid domain sizes: evaluation {dom_size}, interpolation {interp_size}"
        ));
        return (false, errors);
    }
    let blowup = dom_size / interp_size;

    let target = match parse_felt(&proof.target, "target", &mut errors) {
        Some(t) => t,
        None => return (false, errors),
    };
    let final_constant = match parse_felt(
        &proof.fri_commitment.final_constant,
        "fri_commitment.final_constant",
        &mut errors,
    ) {
        Some(c) => c,
        None => return (false, errors),
    };
    let interp_root = match parse_digest(&proof.interp_poly_root, "interp_poly_root", &mut errors)
    {
        Some(r) => r,
        None => return (false, errors),
    };

    let n_layers = proof.fri_commitment.folding_poly_coeffs.len();
    if proof.fri_commitment.layer_roots.len() <= n_layers {
        errors.push(format!(
            "{} layer roots for {} folding coefficients",
            proof.fri_commitment.layer_roots.len(),
            n_layers
        ));
        return (false, errors);
    }
    if n_layers >= dom_size.trailing_zeros() as usize {
        errors.push(format!(
            "{n_layers} folding layers cannot fit a domain of {dom_size} points"
        ));
        return (false, errors);
    }
    let mut layer_roots = Vec::with_capacity(n_layers);
    for (j, root) in proof.fri_commitment.layer_roots[..n_layers].iter().enumerate() {
        match parse_digest(root, &format!("layer_roots[{j}]"), &mut errors) {
            Some(r) => layer_roots.push(r),
            None => return (false, errors),
        }
    }

    let query_num = proof.fri_decommitments.query_num;
    if proof.fri_decommitments.queries.len() < query_num {
        errors.push(format!(
            "Proof claims {} queries but carries {}",
            query_num,
            proof.fri_decommitments.queries.len()
        ));
        return (false, errors);
    }

    // Domain reconstruction from metadata alone.
    let eval_domain = match coset(dom_size) {
        Ok(d) => d,
        Err(e) => {
            errors.push(format!("Cannot rebuild evaluation domain: {e}"));
            return (false, errors);
        }
    };
    let g = match subgroup_generator(interp_size) {
        Ok(g) => g,
        Err(e) => {
            errors.push(format!("Cannot rebuild interpolation domain: {e}"));
            return (false, errors);
        }
    };
    let mut layer_domains = Vec::with_capacity(n_layers);
    let mut current = eval_domain.clone();
    for _ in 0..n_layers {
        let next = fold_domain(&current);
        layer_domains.push(current);
        current = next;
    }

    // The final layer holds a constant polynomial, so its committed root
    // is fully determined by final_constant and the remaining domain size.
    match parse_digest(
        &proof.fri_commitment.layer_roots[n_layers],
        &format!("layer_roots[{n_layers}]"),
        &mut errors,
    ) {
        Some(final_root) => match MerkleTree::new(&vec![final_constant; current.len()]) {
            Ok(tree) => {
                if tree.root() != final_root {
                    errors.push(format!(
                        "Layer {n_layers}: final layer root does not commit to the final constant"
                    ));
                }
            }
            Err(e) => {
                errors.push(format!("Cannot rebuild final layer commitment: {e}"));
                return (false, errors);
            }
        },
        None => return (false, errors),
    }

    match parse_felt(
        &proof.fri_decommitments.fri_last_val,
        "fri_decommitments.fri_last_val",
        &mut errors,
    ) {
        Some(last_val) => {
            if last_val != final_constant {
                errors.push(format!(
                    "fri_last_val {last_val} does not match the final constant {final_constant}"
                ));
            }
        }
        None => return (false, errors),
    }

    let ctx = VerifyContext {
        g,
        eval_domain,
        interp_size,
        blowup,
        target,
        final_constant,
        interp_root,
        layer_roots,
        layer_domains,
        alphas: [
            FieldElement::new(proof.compos_factors.alpha_0),
            FieldElement::new(proof.compos_factors.alpha_1),
            FieldElement::new(proof.compos_factors.alpha_2),
        ],
        betas: proof
            .fri_commitment
            .folding_poly_coeffs
            .iter()
            .map(|&b| FieldElement::new(b))
            .collect(),
    };

    // Cryptographic phase: collect everything, never short-circuit.
    for (i, query) in proof.fri_decommitments.queries[..query_num].iter().enumerate() {
        verify_query(i, query, &ctx, &mut errors);
    }

    debug!(
        "verification finished: {} queries, {} errors",
        query_num,
        errors.len()
    );
    (errors.is_empty(), errors)
}

struct VerifyContext {
    g: FieldElement,
    eval_domain: Vec<FieldElement>,
    interp_size: usize,
    blowup: usize,
    target: FieldElement,
    final_constant: FieldElement,
    interp_root: Hash,
    layer_roots: Vec<Hash>,
    layer_domains: Vec<Vec<FieldElement>>,
    alphas: [FieldElement; 3],
    betas: Vec<FieldElement>,
}

fn verify_query(i: usize, query: &QueryDecommitment, ctx: &VerifyContext, errors: &mut Vec<String>) {
    let idx = query.idx;
    let dom_size = ctx.eval_domain.len();
    if idx.checked_add(2 * ctx.blowup).map_or(true, |end| end >= dom_size) {
        errors.push(format!(
            "Query {i}: index {idx} leaves no room for the g^2 shift in {dom_size} points"
        ));
        return;
    }

    let Some(f_x) = parse_felt(&query.f_x.val, &format!("query {i} f_x"), errors) else {
        return;
    };
    let Some(f_gx) = parse_felt(&query.f_gx.val, &format!("query {i} f_gx"), errors) else {
        return;
    };
    let Some(f_ggx) = parse_felt(&query.f_ggx.val, &format!("query {i} f_ggx"), errors) else {
        return;
    };

    // Trace-level openings at x, g·x and g²·x.
    for (name, offset, value, opening) in [
        ("f(x)", 0, f_x, &query.f_x),
        ("f(gx)", ctx.blowup, f_gx, &query.f_gx),
        ("f(ggx)", 2 * ctx.blowup, f_ggx, &query.f_ggx),
    ] {
        match parse_path(&opening.auth_path, &format!("query {i} {name}"), errors) {
            Some(path) => {
                if !merkle::verify_decommitment(idx + offset, value, &path, &ctx.interp_root) {
                    errors.push(format!(
                        "Query {i}: decommitment verification failed for {name} at index {}",
                        idx + offset
                    ));
                }
            }
            None => return,
        }
    }

    // The last layer's opened value must be the committed constant.
    match parse_felt(&query.last_val, &format!("query {i} last_val"), errors) {
        Some(last_val) => {
            if last_val != ctx.final_constant {
                errors.push(format!(
                    "Query {i}: final constant mismatch, expected {} got {last_val}",
                    ctx.final_constant
                ));
            }
        }
        None => return,
    }

    let n_layers = ctx.betas.len();
    let mut reduced_idx = idx;
    for j in 0..n_layers {
        let layer_len = ctx.layer_domains[j].len();
        reduced_idx %= layer_len;

        let Some(layer) = query.fri_layers.get(&format!("layer_{j}")) else {
            errors.push(format!("Query {i}: missing opening for layer {j}"));
            return;
        };
        if layer.idx != reduced_idx {
            errors.push(format!(
                "Query {i}, Layer {j}: opening index {} does not reduce from query index {idx}",
                layer.idx
            ));
            return;
        }

        let Some((val, sib_val)) = parse_layer_values(i, j, layer, errors) else {
            return;
        };

        // Layer 0 is the composition polynomial: its opened value must
        // equal, exactly, the value recomputed from the trace openings.
        if j == 0 {
            match composition_value(ctx, idx, f_x, f_gx, f_ggx) {
                Ok(expected) => {
                    if expected != val {
                        errors.push(format!(
                            "Query {i}, Layer 0: composition polynomial mismatch, \
                             expected {expected} got {val}"
                        ));
                    }
                }
                Err(e) => errors.push(format!(
                    "Query {i}, Layer 0: cannot recompute composition value: {e}"
                )),
            }
        }

        let sib_idx = (reduced_idx + layer_len / 2) % layer_len;
        check_layer_decommitments(i, j, layer, val, sib_val, sib_idx, ctx, errors);

        // Fold invariant between this layer and the next.
        let domain_element = ctx.layer_domains[j][reduced_idx];
        let folded = match fold_pair(val, sib_val, ctx.betas[j], domain_element) {
            Ok(f) => f,
            Err(e) => {
                errors.push(format!("Query {i}, Layer {j}: folding computation failed: {e}"));
                continue;
            }
        };

        if j + 1 < n_layers {
            if let Some(next) = query.fri_layers.get(&format!("layer_{}", j + 1)) {
                if let Some(next_val) =
                    parse_felt(&next.val, &format!("query {i} layer {}", j + 1), errors)
                {
                    if folded != next_val {
                        errors.push(format!(
                            "Query {i}, Layer {j}: folding mismatch, expected {next_val} \
                             got {folded}"
                        ));
                    }
                }
            }
        } else if folded != ctx.final_constant {
            errors.push(format!(
                "Query {i}, Layer {j}: final folding mismatch, expected {} got {folded}",
                ctx.final_constant
            ));
        }
    }
}

fn check_layer_decommitments(
    i: usize,
    j: usize,
    layer: &LayerOpening,
    val: FieldElement,
    sib_val: FieldElement,
    sib_idx: usize,
    ctx: &VerifyContext,
    errors: &mut Vec<String>,
) {
    let root = &ctx.layer_roots[j];
    if let Some(path) = parse_path(&layer.auth_path, &format!("query {i} layer {j}"), errors) {
        if !merkle::verify_decommitment(layer.idx, val, &path, root) {
            errors.push(format!(
                "Query {i}, Layer {j}: layer decommitment verification failed at index {}",
                layer.idx
            ));
        }
    }
    if let Some(path) = parse_path(
        &layer.sib_auth_path,
        &format!("query {i} layer {j} sibling"),
        errors,
    ) {
        if !merkle::verify_decommitment(sib_idx, sib_val, &path, root) {
            errors.push(format!(
                "Query {i}, Layer {j}: sibling decommitment verification failed at index {sib_idx}"
            ));
        }
    }
}

/// Recomputes the composition polynomial value at the query point from
/// the three opened trace values and the public composition factors.
fn composition_value(
    ctx: &VerifyContext,
    idx: usize,
    f_x: FieldElement,
    f_gx: FieldElement,
    f_ggx: FieldElement,
) -> Result<FieldElement, crate::error::StarkError> {
    let x = ctx.eval_domain[idx];
    let g = ctx.g;
    let n = ctx.interp_size as u64;
    let one = FieldElement::one();

    let f1 = ctx.alphas[0] * (f_x - one).divide(x - one)?;
    let f2 = ctx.alphas[1] * (f_x - ctx.target).divide(x - g.pow(n - 2))?;

    let vanishing = (x.pow(n) - one).divide(
        (x - g.pow(n - 3)) * (x - g.pow(n - 2)) * (x - g.pow(n - 1)),
    )?;
    let f3 = ctx.alphas[2] * (f_ggx - f_gx * f_gx - f_x * f_x).divide(vanishing)?;

    Ok(f1 + f2 + f3)
}

/// folded = (p(d) + p(-d)) / 2 + beta * (p(d) - p(-d)) / (2d)
fn fold_pair(
    p_d: FieldElement,
    p_neg_d: FieldElement,
    beta: FieldElement,
    domain_element: FieldElement,
) -> Result<FieldElement, crate::error::StarkError> {
    let two = FieldElement::new(2);
    let even = (p_d + p_neg_d).divide(two)?;
    let odd = beta * (p_d - p_neg_d).divide(two * domain_element)?;
    Ok(even + odd)
}

fn parse_layer_values(
    i: usize,
    j: usize,
    layer: &LayerOpening,
    errors: &mut Vec<String>,
) -> Option<(FieldElement, FieldElement)> {
    let val = parse_felt(&layer.val, &format!("query {i} layer {j} val"), errors)?;
    let sib_val = parse_felt(&layer.sib_val, &format!("query {i} layer {j} sib_val"), errors)?;
    Some((val, sib_val))
}

fn parse_felt(s: &str, what: &str, errors: &mut Vec<String>) -> Option<FieldElement> {
    match s.parse::<FieldElement>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(format!("Malformed field element for {what}: '{s}'"));
            None
        }
    }
}

fn parse_digest(s: &str, what: &str, errors: &mut Vec<String>) -> Option<Hash> {
    match hex::decode(s) {
        Ok(bytes) => match Hash::try_from(bytes.as_slice()) {
            Ok(digest) => Some(digest),
            Err(_) => {
                errors.push(format!("Digest for {what} has wrong length"));
                None
            }
        },
        Err(_) => {
            errors.push(format!("Malformed hex digest for {what}"));
            None
        }
    }
}

fn parse_path(path: &[String], what: &str, errors: &mut Vec<String>) -> Option<Vec<Hash>> {
    let mut hashes = Vec::with_capacity(path.len());
    for (level, entry) in path.iter().enumerate() {
        hashes.push(parse_digest(entry, &format!("{what} path[{level}]"), errors)?);
    }
    Some(hashes)
}
