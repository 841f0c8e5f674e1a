//! PRF-pad + HMAC-tag commitment.
//!
//! `K = h(g^{R_i C_j})` is derived upstream by the adaptive sender/receiver (`h` a
//! pairwise-independent hash, §4.6-4.7); this module only ever sees the derived key bytes.
//!
//! ```text
//! hdr  = u32_be(len(msg))
//! pad  = prf_labeled(key, "NP05-COMMIT-PAD", len(msg))
//! ct   = msg XOR pad
//! mac_key = prf_labeled(key, "NP05-COMMIT-MAC", 32)
//! tag  = HMAC_SHA256(mac_key, hdr ‖ aad ‖ ct)
//! blob = hdr ‖ ct ‖ tag
//! ```
//!
//! Hiding follows from PRF pseudo-randomness given an unknown key; binding and integrity follow
//! from HMAC unforgeability. The tag check is constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::CoreError;
use crate::prf::prf_labeled;

type HmacSha256 = Hmac<Sha256>;

const PAD_LABEL: &[u8] = b"NP05-COMMIT-PAD";
const MAC_LABEL: &[u8] = b"NP05-COMMIT-MAC";
const TAG_LEN: usize = 32;
const LEN_HDR: usize = 4;

fn derive_pad(key: &[u8], msg_len: usize) -> Vec<u8> {
    prf_labeled(key, PAD_LABEL, msg_len)
}

fn derive_mac_key(key: &[u8]) -> Vec<u8> {
    prf_labeled(key, MAC_LABEL, TAG_LEN)
}

fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// Commits to `msg` under `key`, binding `aad` into the tag without encrypting it.
///
/// `key` must be non-empty.
pub fn commit(msg: &[u8], key: &[u8], aad: &[u8]) -> Result<Vec<u8>, CoreError> {
    if key.is_empty() {
        return Err(CoreError::MalformedInput("commitment key must be non-empty"));
    }
    let len: u32 = msg
        .len()
        .try_into()
        .map_err(|_| CoreError::MalformedInput("message too large to commit to"))?;
    let hdr = len.to_be_bytes();

    let pad = derive_pad(key, msg.len());
    let ct = xor(msg, &pad);

    let mac_key = derive_mac_key(key);
    let mut mac = HmacSha256::new_from_slice(&mac_key)
        .map_err(|_| CoreError::Internal(crate::error::Bug::EncodingOverflow))?;
    mac.update(&hdr);
    mac.update(aad);
    mac.update(&ct);
    let tag = mac.finalize().into_bytes();

    let mut blob = Vec::with_capacity(LEN_HDR + ct.len() + TAG_LEN);
    blob.extend_from_slice(&hdr);
    blob.extend_from_slice(&ct);
    blob.extend_from_slice(&tag);
    Ok(blob)
}

/// Opens `blob` under `key` and `aad`, failing with [`CoreError::InvalidCommitment`] on any
/// length or tag mismatch.
pub fn open(blob: &[u8], key: &[u8], aad: &[u8]) -> Result<Vec<u8>, CoreError> {
    if key.is_empty() {
        return Err(CoreError::MalformedInput("commitment key must be non-empty"));
    }
    if blob.len() < LEN_HDR + TAG_LEN {
        return Err(CoreError::InvalidCommitment);
    }

    let hdr = &blob[..LEN_HDR];
    let ct = &blob[LEN_HDR..blob.len() - TAG_LEN];
    let tag = &blob[blob.len() - TAG_LEN..];

    let mlen = u32::from_be_bytes([hdr[0], hdr[1], hdr[2], hdr[3]]) as usize;
    if ct.len() != mlen {
        return Err(CoreError::InvalidCommitment);
    }

    let mac_key = derive_mac_key(key);
    let mut mac = HmacSha256::new_from_slice(&mac_key)
        .map_err(|_| CoreError::Internal(crate::error::Bug::EncodingOverflow))?;
    mac.update(hdr);
    mac.update(aad);
    mac.update(ct);
    let expected_tag = mac.finalize().into_bytes();

    // Constant-time comparison via `subtle`, not a `==` on the raw bytes.
    if expected_tag.as_slice().ct_eq(tag).unwrap_u8() == 0 {
        return Err(CoreError::InvalidCommitment);
    }

    let pad = derive_pad(key, mlen);
    Ok(xor(ct, &pad))
}

/// Verifies `blob` under `key`/`aad`, optionally checking that opening it yields `expected`.
pub fn verify(blob: &[u8], key: &[u8], aad: &[u8], expected: Option<&[u8]>) -> bool {
    match open(blob, key, aad) {
        Ok(msg) => expected.is_none_or(|want| msg == want),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let blob = commit(b"hello world", b"key", b"").unwrap();
        assert_eq!(open(&blob, b"key", b"").unwrap(), b"hello world");
    }

    #[test]
    fn empty_message_round_trips() {
        let blob = commit(b"", b"key", b"").unwrap();
        assert_eq!(open(&blob, b"key", b"").unwrap(), b"");
    }

    #[test]
    fn multi_kilobyte_message_round_trips() {
        let msg = vec![0xABu8; 8 * 1024];
        let blob = commit(&msg, b"key", b"").unwrap();
        assert_eq!(open(&blob, b"key", b"").unwrap(), msg);
    }

    #[test]
    fn wrong_key_fails() {
        let blob = commit(b"hello", b"key-a", b"").unwrap();
        assert!(open(&blob, b"key-b", b"").is_err());
    }

    #[test]
    fn wrong_aad_fails() {
        let blob = commit(b"hello", b"key", b"aad-a").unwrap();
        assert!(open(&blob, b"key", b"aad-b").is_err());
    }

    #[test]
    fn flipped_byte_fails() {
        let mut blob = commit(b"hello world", b"key", b"").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(open(&blob, b"key", b"").is_err());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(commit(b"hello", b"", b"").is_err());
        let blob = commit(b"hello", b"key", b"").unwrap();
        assert!(open(&blob, b"", b"").is_err());
    }

    #[test]
    fn verify_checks_expected_message() {
        let blob = commit(b"hello", b"key", b"").unwrap();
        assert!(verify(&blob, b"key", b"", Some(b"hello")));
        assert!(!verify(&blob, b"key", b"", Some(b"goodbye")));
        assert!(verify(&blob, b"key", b"", None));
    }
}
