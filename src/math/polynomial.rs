//! Dense polynomial algebra over the protocol field.

use crate::error::StarkError;
use crate::field::FieldElement;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Polynomial with field coefficients.
///
/// The polynomial is stored as a vector of coefficients, where the index
/// represents the power of x. For example, [1, 2, 3] represents
/// 3x² + 2x + 1.
///
/// # Invariants
///
/// * The coefficients vector never has trailing zeros
/// * The zero polynomial is the empty coefficient vector
pub struct Polynomial {
    /// Coefficients in ascending order of power.
    coefficients: Vec<FieldElement>,
}

impl Polynomial {
    /// Creates a new polynomial from coefficients, trimming trailing zeros.
    pub fn new(mut coefficients: Vec<FieldElement>) -> Self {
        while coefficients.last().is_some_and(|c| c.is_zero()) {
            coefficients.pop();
        }
        Self { coefficients }
    }

    /// Creates the zero polynomial.
    pub fn zero() -> Self {
        Self {
            coefficients: Vec::new(),
        }
    }

    /// The identity polynomial X, the building block for constraint
    /// expressions like `X - 1`.
    pub fn x() -> Self {
        Self {
            coefficients: vec![FieldElement::zero(), FieldElement::one()],
        }
    }

    /// `coeff * X^degree`.
    pub fn monomial(degree: usize, coeff: FieldElement) -> Self {
        if coeff.is_zero() {
            return Self::zero();
        }
        let mut coefficients = vec![FieldElement::zero(); degree + 1];
        coefficients[degree] = coeff;
        Self { coefficients }
    }

    /// Returns the degree of the polynomial, or `None` for the zero
    /// polynomial (the -infinity analogue).
    pub fn degree(&self) -> Option<usize> {
        if self.coefficients.is_empty() {
            None
        } else {
            Some(self.coefficients.len() - 1)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn coefficients(&self) -> &[FieldElement] {
        &self.coefficients
    }

    pub fn leading_coefficient(&self) -> FieldElement {
        self.coefficients
            .last()
            .copied()
            .unwrap_or(FieldElement::zero())
    }

    /// Evaluates the polynomial at point x using Horner's method.
    pub fn eval(&self, x: FieldElement) -> FieldElement {
        let mut result = FieldElement::zero();
        for &coeff in self.coefficients.iter().rev() {
            result = result * x + coeff;
        }
        result
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let max_len = self.coefficients.len().max(other.coefficients.len());
        let mut result = vec![FieldElement::zero(); max_len];

        for (i, &c) in self.coefficients.iter().enumerate() {
            result[i] += c;
        }
        for (i, &c) in other.coefficients.iter().enumerate() {
            result[i] += c;
        }

        Polynomial::new(result)
    }

    pub fn sub(&self, other: &Polynomial) -> Polynomial {
        let max_len = self.coefficients.len().max(other.coefficients.len());
        let mut result = vec![FieldElement::zero(); max_len];

        for (i, &c) in self.coefficients.iter().enumerate() {
            result[i] += c;
        }
        for (i, &c) in other.coefficients.iter().enumerate() {
            result[i] -= c;
        }

        Polynomial::new(result)
    }

    /// Multiplies two polynomials by coefficient convolution.
    pub fn multiply(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }

        let mut result =
            vec![FieldElement::zero(); self.coefficients.len() + other.coefficients.len() - 1];

        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in other.coefficients.iter().enumerate() {
                result[i + j] += a * b;
            }
        }

        Polynomial::new(result)
    }

    /// Multiplies every coefficient by a scalar.
    pub fn scale(&self, scalar: FieldElement) -> Polynomial {
        Polynomial::new(self.coefficients.iter().map(|&c| c * scalar).collect())
    }

    /// Divides this polynomial by another, returning (quotient, remainder).
    ///
    /// Standard long division over the field; the remainder has degree
    /// strictly less than the divisor. Fails with `DivisionByZero` if the
    /// divisor is the zero polynomial.
    pub fn divide(&self, divisor: &Polynomial) -> Result<(Polynomial, Polynomial), StarkError> {
        if divisor.is_zero() {
            return Err(StarkError::DivisionByZero);
        }

        let divisor_degree = divisor.coefficients.len() - 1;
        if self.coefficients.len() <= divisor_degree {
            return Ok((Polynomial::zero(), self.clone()));
        }
        let dividend_degree = self.coefficients.len() - 1;

        let leading_inv = divisor.leading_coefficient().inverse()?;
        let mut quotient = vec![FieldElement::zero(); dividend_degree - divisor_degree + 1];
        let mut remainder = self.coefficients.clone();

        for i in (0..=dividend_degree - divisor_degree).rev() {
            let coeff = remainder[i + divisor_degree];
            if coeff.is_zero() {
                continue;
            }

            quotient[i] = coeff * leading_inv;
            for j in 0..=divisor_degree {
                remainder[i + j] -= quotient[i] * divisor.coefficients[j];
            }
        }

        Ok((Polynomial::new(quotient), Polynomial::new(remainder)))
    }

    /// Exact division: fails with `InexactDivision` if the remainder is
    /// nonzero. Callers only use this where divisibility is guaranteed by
    /// construction, e.g. constraint numerators over their vanishing
    /// polynomials.
    pub fn divide_exact(&self, divisor: &Polynomial) -> Result<Polynomial, StarkError> {
        let (quotient, remainder) = self.divide(divisor)?;
        match remainder.degree() {
            None => Ok(quotient),
            Some(d) => Err(StarkError::InexactDivision {
                remainder_degree: d,
            }),
        }
    }

    /// Divides by the linear factor (X - a) in a single synthetic-division
    /// pass, returning (quotient, remainder value).
    pub fn divide_by_linear(&self, a: FieldElement) -> (Polynomial, FieldElement) {
        if self.is_zero() {
            return (Polynomial::zero(), FieldElement::zero());
        }

        let n = self.coefficients.len();
        let mut quotient = vec![FieldElement::zero(); n - 1];
        let mut carry = FieldElement::zero();

        for i in (0..n).rev() {
            let b = self.coefficients[i] + carry * a;
            if i == 0 {
                return (Polynomial::new(quotient), b);
            }
            quotient[i - 1] = b;
            carry = b;
        }

        unreachable!()
    }

    /// Substitutes `other` for the variable: returns self(other(X)).
    ///
    /// Used to build shifted polynomials such as p(g·X) by composing with
    /// the degree-one polynomial g·X.
    pub fn compose(&self, other: &Polynomial) -> Polynomial {
        let mut result = Polynomial::zero();
        for &coeff in self.coefficients.iter().rev() {
            result = result.multiply(other).add(&Polynomial::new(vec![coeff]));
        }
        result
    }

    /// Lagrange interpolation: the unique polynomial of degree < n through
    /// the n given points. O(n²) via one master product and a synthetic
    /// division per basis polynomial.
    pub fn interpolate(
        xs: &[FieldElement],
        ys: &[FieldElement],
    ) -> Result<Polynomial, StarkError> {
        if xs.len() != ys.len() || xs.is_empty() {
            return Err(StarkError::InterpolationMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }

        // master = prod_i (X - x_i)
        let mut master = Polynomial::new(vec![FieldElement::one()]);
        for &x in xs {
            master = master.multiply(&Polynomial::new(vec![-x, FieldElement::one()]));
        }

        let mut acc = vec![FieldElement::zero(); xs.len()];
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let (basis, _) = master.divide_by_linear(x);
            // Normalize so the basis is 1 at x_i, then weight by y_i.
            let weight = y * basis.eval(x).inverse()?;
            for (j, &c) in basis.coefficients().iter().enumerate() {
                acc[j] += c * weight;
            }
        }

        Ok(Polynomial::new(acc))
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficients.is_empty() {
            return write!(f, "0");
        }

        let mut terms = Vec::new();
        for (i, &coeff) in self.coefficients.iter().enumerate() {
            if !coeff.is_zero() {
                let term = if i == 0 {
                    format!("{}", coeff)
                } else if i == 1 {
                    format!("{}x", coeff)
                } else {
                    format!("{}x^{}", coeff, i)
                };
                terms.push(term);
            }
        }

        write!(f, "{}", terms.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(coeffs: &[u64]) -> Polynomial {
        Polynomial::new(coeffs.iter().map(|&c| FieldElement::new(c)).collect())
    }

    #[test]
    fn test_degree() {
        assert_eq!(poly(&[]).degree(), None);
        assert_eq!(poly(&[0, 0]).degree(), None);
        assert_eq!(poly(&[7]).degree(), Some(0));
        assert_eq!(poly(&[1, 2, 3, 0]).degree(), Some(2));
    }

    #[test]
    fn test_eval_horner() {
        // 3x^2 + 2x + 1 at x = 5
        let p = poly(&[1, 2, 3]);
        assert_eq!(p.eval(FieldElement::new(5)), FieldElement::new(86));
    }

    #[test]
    fn test_add_sub() {
        let p1 = poly(&[1, 2, 3]);
        let p2 = poly(&[4, 5, 6]);
        assert_eq!(p1.add(&p2), poly(&[5, 7, 9]));
        assert_eq!(p1.add(&p2).sub(&p2), p1);
    }

    #[test]
    fn test_multiply() {
        // (2x + 1)(4x + 3) = 8x^2 + 10x + 3
        assert_eq!(poly(&[1, 2]).multiply(&poly(&[3, 4])), poly(&[3, 10, 8]));
    }

    #[test]
    fn test_divide_with_remainder() {
        // (x^3 + 2x^2 + 3x + 4) / (x + 1) = x^2 + x + 2 rem 2
        let (q, r) = poly(&[4, 3, 2, 1]).divide(&poly(&[1, 1])).unwrap();
        assert_eq!(q, poly(&[2, 1, 1]));
        assert_eq!(r, poly(&[2]));
    }

    #[test]
    fn test_divide_exact() {
        // (x^2 + 2x + 1) / (x + 1) = x + 1
        let q = poly(&[1, 2, 1]).divide_exact(&poly(&[1, 1])).unwrap();
        assert_eq!(q, poly(&[1, 1]));

        assert!(matches!(
            poly(&[4, 3, 2, 1]).divide_exact(&poly(&[1, 1])),
            Err(StarkError::InexactDivision { .. })
        ));
    }

    #[test]
    fn test_divide_by_zero() {
        assert!(poly(&[1, 2, 1]).divide(&Polynomial::zero()).is_err());
    }

    #[test]
    fn test_divide_by_linear_matches_long_division() {
        let p = poly(&[4, 3, 2, 1]);
        let a = FieldElement::new(17);
        let (q, r) = p.divide_by_linear(a);
        let (q2, r2) = p
            .divide(&Polynomial::new(vec![-a, FieldElement::one()]))
            .unwrap();
        assert_eq!(q, q2);
        assert_eq!(Polynomial::new(vec![r]), r2);
    }

    #[test]
    fn test_compose_with_shift() {
        // p(x) = x^2 + 1 composed with 2x gives 4x^2 + 1.
        let p = poly(&[1, 0, 1]);
        let shift = poly(&[0, 2]);
        assert_eq!(p.compose(&shift), poly(&[1, 0, 4]));
    }

    #[test]
    fn test_interpolate_roundtrip() {
        let xs: Vec<FieldElement> = (1..=8u64).map(FieldElement::new).collect();
        let ys: Vec<FieldElement> = xs.iter().map(|&x| x * x + FieldElement::new(3)).collect();
        let p = Polynomial::interpolate(&xs, &ys).unwrap();
        assert_eq!(p, poly(&[3, 0, 1]));
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_eq!(p.eval(*x), *y);
        }
    }
}
