use crate::error::StarkError;

/// Fixed protocol instance parameters, chosen at construction time and
/// never mutated once a prove or verify cycle begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolParams {
    /// Size of the interpolation subgroup (trace domain).
    pub interp_domain_size: usize,
    /// Size of the coset evaluation domain.
    pub eval_domain_size: usize,
}

impl ProtocolParams {
    pub fn new(interp_domain_size: usize, eval_domain_size: usize) -> Result<Self, StarkError> {
        if !interp_domain_size.is_power_of_two() || interp_domain_size < 4 {
            return Err(StarkError::BadDomainSize(interp_domain_size));
        }
        if !eval_domain_size.is_power_of_two() || eval_domain_size <= interp_domain_size {
            return Err(StarkError::BadDomainSize(eval_domain_size));
        }
        Ok(Self {
            interp_domain_size,
            eval_domain_size,
        })
    }

    /// Ratio between evaluation and interpolation domains; also the index
    /// stride between f(x) and f(g·x) in the evaluation vector.
    pub fn blowup(&self) -> usize {
        self.eval_domain_size / self.interp_domain_size
    }

    /// The trace leaves the subgroup's last point unused.
    pub fn trace_len(&self) -> usize {
        self.interp_domain_size - 1
    }

    /// Index of the publicly claimed trace element.
    pub fn target_idx(&self) -> usize {
        self.interp_domain_size - 2
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            interp_domain_size: 1024,
            eval_domain_size: 8192,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instance() {
        let params = ProtocolParams::default();
        assert_eq!(params.blowup(), 8);
        assert_eq!(params.trace_len(), 1023);
        assert_eq!(params.target_idx(), 1022);
    }

    #[test]
    fn test_rejects_degenerate_sizes() {
        assert!(ProtocolParams::new(1000, 8192).is_err());
        assert!(ProtocolParams::new(1024, 1024).is_err());
        assert!(ProtocolParams::new(1024, 3000).is_err());
    }
}
