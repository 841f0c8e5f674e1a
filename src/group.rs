//! Prime-order subgroup arithmetic in ℤ_p*.
//!
//! Uses the standardized RFC 3526 2048-bit MODP Group 14 prime `p`. The generator is taken as
//! `2²  mod p` rather than the RFC's own generator `2`, so that it lands in (and generates) the
//! order-`q` quadratic-residue subgroup of the safe prime `p = 2q + 1`, as this protocol requires.
//! Parameters are fixed at construction; this crate never generates group parameters at runtime.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::CoreError;
use crate::rng::Rng;

/// RFC 3526, 2048-bit MODP Group 14.
const P_HEX: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74",
    "020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437",
    "4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05",
    "98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB",
    "9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
    "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718",
    "3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF",
);

/// A prime-order subgroup of ℤ_p* together with a generator of exact order `q`.
#[derive(Clone)]
pub struct Group {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

impl Group {
    /// Constructs the standardized group, running a self-check that `g` has exact order `q`.
    pub fn new() -> Result<Self, CoreError> {
        let hex: String = P_HEX.chars().filter(|c| !c.is_whitespace()).collect();
        let p = BigUint::parse_bytes(hex.as_bytes(), 16).ok_or(CoreError::InvalidParameters)?;
        let q = (&p - BigUint::one()) / BigUint::from(2u8);
        let g = BigUint::from(4u8) % &p;

        let group = Group { p, q, g };
        if !group.generator_has_exact_order_q() {
            return Err(CoreError::InvalidParameters);
        }
        Ok(group)
    }

    fn generator_has_exact_order_q(&self) -> bool {
        self.g.modpow(&self.q, &self.p).is_one() && !self.g.modpow(&BigUint::from(2u8), &self.p).is_one()
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Number of bytes needed to hold any element of ℤ_q in fixed-width big-endian encoding.
    pub fn q_bytes(&self) -> usize {
        self.q.bits().div_ceil(8) as usize
    }

    /// Number of bytes needed to hold any element of ℤ_p in fixed-width big-endian encoding.
    pub fn p_bytes(&self) -> usize {
        self.p.bits().div_ceil(8) as usize
    }

    /// `base^exp mod p`.
    pub fn pow(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        base.modpow(exp, &self.p)
    }

    /// `x^{-1} mod q` via Fermat's little theorem. Caller must ensure `x mod q != 0`.
    pub fn inv_q(&self, x: &BigUint) -> BigUint {
        let exp = &self.q - BigUint::from(2u8);
        x.modpow(&exp, &self.q)
    }

    /// `x^{-1} mod p` via Fermat's little theorem. Caller must ensure `x mod p != 0`.
    pub fn inv_p(&self, x: &BigUint) -> BigUint {
        let exp = &self.p - BigUint::from(2u8);
        x.modpow(&exp, &self.p)
    }

    /// `1 < x < p` and `x^q ≡ 1 (mod p)`.
    pub fn in_subgroup(&self, x: &BigUint) -> bool {
        x > &BigUint::one() && x < &self.p && self.pow(x, &self.q).is_one()
    }

    /// Samples a uniform element of ℤ_q* = {1, ..., q-1} by rejection sampling over a uniform
    /// byte buffer of `⌈log₂ q⌉` bits, masking off the excess high bits of the top byte so the
    /// rejection rate stays below 50%.
    pub fn rand_scalar_nonzero(&self, rng: &mut impl Rng) -> Result<BigUint, CoreError> {
        sample_nonzero_below(&self.q, rng)
    }
}

/// Uniformly samples a value in `{1, ..., modulus - 1}` by rejection sampling.
fn sample_nonzero_below(modulus: &BigUint, rng: &mut impl Rng) -> Result<BigUint, CoreError> {
    let bits = modulus.bits();
    let byte_len = bits.div_ceil(8) as usize;
    let top_bits = bits % 8;
    let top_mask: u8 = if top_bits == 0 { 0xFF } else { (1u8 << top_bits) - 1 };

    const MAX_ATTEMPTS: usize = 1_000;
    let mut buf = vec![0u8; byte_len];
    for _ in 0..MAX_ATTEMPTS {
        rng.fill_bytes(&mut buf);
        buf[0] &= top_mask;
        let candidate = BigUint::from_bytes_be(&buf);
        if !candidate.is_zero() && &candidate < modulus {
            return Ok(candidate);
        }
    }
    Err(CoreError::Internal(crate::error::Bug::RngRejectionExhausted))
}

/// Encodes `x` as a fixed-width big-endian byte string of exactly `len` bytes.
pub fn to_fixed_be(x: &BigUint, len: usize) -> Result<Vec<u8>, CoreError> {
    let raw = x.to_bytes_be();
    if raw.len() > len {
        return Err(CoreError::Internal(crate::error::Bug::EncodingOverflow));
    }
    let mut out = vec![0u8; len - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Decodes a fixed-width big-endian byte string back into an integer (`OS2IP`).
pub fn from_fixed_be(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}
