use thiserror::Error;

/// Errors raised while constructing a proof.
///
/// Proof *verification* never surfaces these as `Err`: the verifier folds
/// every failure into its diagnostics list and returns `(false, errors)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StarkError {
    #[error("division by zero in the field")]
    DivisionByZero,

    #[error("polynomial division left a nonzero remainder of degree {remainder_degree}")]
    InexactDivision { remainder_degree: usize },

    #[error("index {index} is out of range for a structure of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("domain size {0} is not a power of two dividing the group order")]
    BadDomainSize(usize),

    #[error("interpolation needs matching nonempty point and value lists, got {xs} and {ys}")]
    InterpolationMismatch { xs: usize, ys: usize },

    #[error("cannot build a Merkle tree over an empty leaf sequence")]
    EmptyLeaves,

    #[error("ran out of folding coefficients after {consumed} layers")]
    NotEnoughFoldingCoefficients { consumed: usize },

    #[error("verifier randomness is invalid: {0}")]
    InvalidRandomness(String),

    #[error("malformed proof: {0}")]
    MalformedProof(String),
}
