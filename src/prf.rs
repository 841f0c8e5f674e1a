//! SHA-256 counter-mode PRF used for one-time-pad derivation and MAC-key derivation.
//!
//! No other construction in this crate invents its own key schedule; everything that needs
//! pseudorandom bytes from a key goes through [`prf`] or [`prf_labeled`].

use sha2::{Digest, Sha256};

const SHA256_OUTPUT_LEN: usize = 32;

/// `SHA256(key ‖ counter)` concatenated over `counter = 0, 1, ...` and truncated to `out_len`.
pub fn prf(key: &[u8], out_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(out_len + SHA256_OUTPUT_LEN);
    let mut counter: u32 = 0;
    while out.len() < out_len {
        let mut hasher = Sha256::new();
        hasher.update(key);
        hasher.update(counter.to_be_bytes());
        out.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    out.truncate(out_len);
    out
}

/// `prf(key ‖ label, out_len)` — `label` is a domain separator.
pub fn prf_labeled(key: &[u8], label: &[u8], out_len: usize) -> Vec<u8> {
    let mut keyed = Vec::with_capacity(key.len() + label.len());
    keyed.extend_from_slice(key);
    keyed.extend_from_slice(label);
    prf(&keyed, out_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_has_requested_length() {
        for len in [0, 1, 31, 32, 33, 100] {
            assert_eq!(prf(b"key", len).len(), len);
        }
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(prf(b"key", 64), prf(b"key", 64));
    }

    #[test]
    fn distinct_labels_diverge() {
        assert_ne!(
            prf_labeled(b"key", b"A", 32),
            prf_labeled(b"key", b"B", 32)
        );
    }

    #[test]
    fn longer_output_is_an_extension_of_shorter() {
        let short = prf(b"key", 32);
        let long = prf(b"key", 64);
        assert_eq!(&long[..32], &short[..]);
    }
}
