//! Pairwise-independent hash extracting a λ-byte key from a group element.
//!
//! `h_{α,β}(x) = LSB_{8·λ}((α · (x mod q) + β) mod q)`. For a random `(α, β)` this family is
//! pairwise-independent over ℤ_q, which is what lets it double as a leftover-hash extractor on
//! the (at most `log₂ q`-bit-entropy) DDH output `g^{R_i C_j}`.

use num_bigint::BigUint;

use crate::error::CoreError;
use crate::group::{to_fixed_be, Group};
use crate::rng::Rng;

/// `λ_bytes = max(16, ⌈⌈log₂ q⌉ / 2 / 8⌉)`.
pub fn lambda_bytes(group: &Group) -> usize {
    let q_bits = group.q().bits() as usize;
    (16).max(q_bits.div_ceil(2).div_ceil(8))
}

/// The public parameters of one pairwise-independent hash instance.
#[derive(Clone)]
pub struct HashParams {
    alpha: BigUint,
    beta: BigUint,
    lambda_bytes: usize,
}

impl HashParams {
    /// Samples `α ∈ ℤ_q*`, `β ∈ ℤ_q` and derives `λ_bytes` from the group.
    pub fn sample(group: &Group, rng: &mut impl Rng) -> Result<Self, CoreError> {
        let alpha = group.rand_scalar_nonzero(rng)?;
        let beta = sample_in_zq(group, rng)?;
        Ok(HashParams { alpha, beta, lambda_bytes: lambda_bytes(group) })
    }

    pub fn from_parts(alpha: BigUint, beta: BigUint, lambda_bytes: usize) -> Self {
        HashParams { alpha, beta, lambda_bytes }
    }

    pub fn alpha(&self) -> &BigUint {
        &self.alpha
    }

    pub fn beta(&self) -> &BigUint {
        &self.beta
    }

    pub fn lambda_bytes(&self) -> usize {
        self.lambda_bytes
    }

    /// `h(x)`, truncated to the low `λ_bytes` bytes of `(α·(x mod q) + β) mod q`, emitted
    /// big-endian.
    pub fn hash(&self, group: &Group, x: &BigUint) -> Result<Vec<u8>, CoreError> {
        let v = (&self.alpha * (x % group.q()) + &self.beta) % group.q();
        let full = to_fixed_be(&v, group.q_bytes())?;
        Ok(full[full.len() - self.lambda_bytes..].to_vec())
    }
}

fn sample_in_zq(group: &Group, rng: &mut impl Rng) -> Result<BigUint, CoreError> {
    // beta may legitimately be 0; draw q_bytes uniform bytes and reduce mod q rather than
    // rejection-sampling a nonzero value (this is not a secret-scalar sample, just a public
    // hash-family parameter).
    let mut buf = vec![0u8; group.q_bytes()];
    rng.fill_bytes(&mut buf);
    Ok(BigUint::from_bytes_be(&buf) % group.q())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn hash_output_has_lambda_bytes_length() {
        let group = Group::new().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let params = HashParams::sample(&group, &mut rng).unwrap();
        let x = group.rand_scalar_nonzero(&mut rng).unwrap();
        let out = params.hash(&group, &x).unwrap();
        assert_eq!(out.len(), params.lambda_bytes());
    }

    #[test]
    fn hash_is_deterministic() {
        let group = Group::new().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let params = HashParams::sample(&group, &mut rng).unwrap();
        let x = group.rand_scalar_nonzero(&mut rng).unwrap();
        assert_eq!(params.hash(&group, &x).unwrap(), params.hash(&group, &x).unwrap());
    }

    #[test]
    fn distinct_inputs_usually_diverge() {
        let group = Group::new().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let params = HashParams::sample(&group, &mut rng).unwrap();
        let x = group.rand_scalar_nonzero(&mut rng).unwrap();
        let y = group.rand_scalar_nonzero(&mut rng).unwrap();
        assert_ne!(params.hash(&group, &x).unwrap(), params.hash(&group, &y).unwrap());
    }
}
