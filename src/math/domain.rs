//! Multiplicative subgroup and coset domains.
//!
//! Both the prover and the verifier build their domains through these
//! functions only, which is what makes the verifier's independent domain
//! reconstruction exact.

use crate::error::StarkError;
use crate::field::{FieldElement, MODULUS};

/// Generator of the multiplicative subgroup of the given power-of-two size.
pub fn subgroup_generator(size: usize) -> Result<FieldElement, StarkError> {
    let order = MODULUS - 1; // 3 * 2^30
    if size == 0 || !size.is_power_of_two() || order % size as u64 != 0 {
        return Err(StarkError::BadDomainSize(size));
    }
    Ok(FieldElement::generator().pow(order / size as u64))
}

/// The subgroup {g^0, g^1, ..., g^(size-1)}.
pub fn subgroup(size: usize) -> Result<Vec<FieldElement>, StarkError> {
    let g = subgroup_generator(size)?;
    let mut points = Vec::with_capacity(size);
    let mut cur = FieldElement::one();
    for _ in 0..size {
        points.push(cur);
        cur *= g;
    }
    Ok(points)
}

/// The evaluation coset: the size-`size` subgroup shifted by the full
/// group generator, so it is disjoint from every interpolation subgroup.
pub fn coset(size: usize) -> Result<Vec<FieldElement>, StarkError> {
    let w = FieldElement::generator();
    Ok(subgroup(size)?.into_iter().map(|x| w * x).collect())
}

/// Next FRI domain: square each point of the first half. Squaring maps
/// x and -x to the same point, so the second half is redundant.
pub fn fold_domain(points: &[FieldElement]) -> Vec<FieldElement> {
    points[..points.len() / 2].iter().map(|&x| x * x).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subgroup_generator_order() {
        let g = subgroup_generator(1024).unwrap();
        assert_eq!(g.pow(1024), FieldElement::one());
        assert_ne!(g.pow(512), FieldElement::one());
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(subgroup_generator(0).is_err());
        assert!(subgroup_generator(3).is_err());
        assert!(subgroup_generator(1 << 31).is_err());
    }

    #[test]
    fn test_coset_avoids_subgroup() {
        // No coset point has order dividing the subgroup size.
        let points = coset(16).unwrap();
        for p in &points {
            assert_ne!(p.pow(16), FieldElement::one());
        }
    }

    #[test]
    fn test_fold_domain_is_squared_half() {
        let points = coset(16).unwrap();
        let folded = fold_domain(&points);
        assert_eq!(folded.len(), 8);
        for (i, &f) in folded.iter().enumerate() {
            assert_eq!(f, points[i] * points[i]);
            // The two halves square to the same point.
            assert_eq!(f, points[i + 8] * points[i + 8]);
        }
    }
}
