use crate::digest_sha2;
use crate::field::FieldElement;

/// Derives the secret second trace element from the caller's seed.
///
/// The hash is only a deterministic pseudorandom seed source here, not a
/// security primitive; the commitment hashing lives in `merkle`.
pub fn trace_secret(seed: &str) -> FieldElement {
    let digest = digest_sha2(seed.as_bytes());
    let mut wide = [0u8; 16];
    wide.copy_from_slice(&digest[..16]);
    FieldElement::from_u128_mod_order(u128::from_be_bytes(wide))
}

/// Builds the execution trace: t[0] = 1, t[1] = secret, and then the
/// squares recurrence t[n] = t[n-2]² + t[n-1]².
pub fn build_trace(seed: &str, len: usize) -> Vec<FieldElement> {
    let mut trace = Vec::with_capacity(len);
    trace.push(FieldElement::one());
    if len > 1 {
        trace.push(trace_secret(seed));
    }
    while trace.len() < len {
        let a = trace[trace.len() - 2];
        let b = trace[trace.len() - 1];
        trace.push(a * a + b * b);
    }
    trace
}
