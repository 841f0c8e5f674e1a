//! Naor-Pinkas 1-out-of-2 DDH oblivious transfer.
//!
//! A turn-based three-message protocol: sender publishes `A = g^a`, receiver answers with `B`
//! chosen according to its bit, sender replies with two masked messages, receiver recovers the
//! one matching its bit. Security rests on DDH: the receiver's `B` is computationally
//! indistinguishable between the two choices, and the sender cannot tell which ciphertext the
//! receiver will open.

use num_bigint::BigUint;
use num_traits::One;

use crate::error::CoreError;
use crate::group::{to_fixed_be, Group};
use crate::prf::prf;
use crate::rng::Rng;

/// Sender side of a single 1-out-of-2 OT.
pub struct Ot2Sender<'g> {
    group: &'g Group,
    a: BigUint,
    a_pub: BigUint,
}

impl<'g> Drop for Ot2Sender<'g> {
    fn drop(&mut self) {
        self.a = BigUint::default();
    }
}

impl<'g> Ot2Sender<'g> {
    /// Samples `a` and publishes `A = g^a`.
    pub fn prepare(group: &'g Group, rng: &mut impl Rng) -> Result<Self, CoreError> {
        let a = group.rand_scalar_nonzero(rng)?;
        let a_pub = group.pow(group.g(), &a);
        Ok(Ot2Sender { group, a, a_pub })
    }

    /// The sender's public key `A`, to be sent to the receiver.
    pub fn public_key(&self) -> &BigUint {
        &self.a_pub
    }

    /// Given the receiver's `B` and the two equal-length messages, returns `(c0, c1)`.
    pub fn respond(&self, b: &BigUint, m0: &[u8], m1: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CoreError> {
        if !(b > &BigUint::one() && b < self.group.p()) {
            return Err(CoreError::InvalidGroupElement("OT receiver public key B out of range"));
        }
        if m0.len() != m1.len() {
            return Err(CoreError::MalformedInput("OT messages must be of equal length"));
        }

        let k0 = self.group.pow(b, &self.a);
        let a_inv = self.group.inv_p(&self.a_pub);
        let b_div_a = (b * &a_inv) % self.group.p();
        let k1 = self.group.pow(&b_div_a, &self.a);

        let key_len = self.group.p_bytes();
        let pad0 = prf(&to_fixed_be(&k0, key_len)?, m0.len());
        let pad1 = prf(&to_fixed_be(&k1, key_len)?, m1.len());

        Ok((xor(m0, &pad0), xor(m1, &pad1)))
    }
}

/// Receiver side of a single 1-out-of-2 OT, fixed to one choice bit for its lifetime.
pub struct Ot2Receiver<'g> {
    group: &'g Group,
    choice_bit: bool,
    b: BigUint,
    a_pub: Option<BigUint>,
}

impl<'g> Drop for Ot2Receiver<'g> {
    fn drop(&mut self) {
        self.b = BigUint::default();
    }
}

impl<'g> Ot2Receiver<'g> {
    /// Samples `b` eagerly; `generate_reply` binds it to the sender's `A`.
    pub fn new(group: &'g Group, choice_bit: bool, rng: &mut impl Rng) -> Result<Self, CoreError> {
        let b = group.rand_scalar_nonzero(rng)?;
        Ok(Ot2Receiver { group, choice_bit, b, a_pub: None })
    }

    /// Given the sender's `A`, returns `B` to send back.
    pub fn generate_reply(&mut self, a_pub: &BigUint) -> BigUint {
        let g_pow_b = self.group.pow(self.group.g(), &self.b);
        let reply = if self.choice_bit {
            (a_pub * &g_pow_b) % self.group.p()
        } else {
            g_pow_b
        };
        self.a_pub = Some(a_pub.clone());
        reply
    }

    /// Recovers the chosen message from the sender's `(c0, c1)`.
    pub fn recover(&self, c0: &[u8], c1: &[u8]) -> Result<Vec<u8>, CoreError> {
        let a_pub = self
            .a_pub
            .as_ref()
            .ok_or(CoreError::ProtocolViolation("recover called before generate_reply"))?;
        let chosen = if self.choice_bit { c1 } else { c0 };

        let k = self.group.pow(a_pub, &self.b);
        let key_len = self.group.p_bytes();
        let pad = prf(&to_fixed_be(&k, key_len)?, chosen.len());
        Ok(xor(chosen, &pad))
    }
}

fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn run_ot(group: &Group, choice_bit: bool, m0: &[u8], m1: &[u8], rng: &mut impl Rng) -> Vec<u8> {
        let sender = Ot2Sender::prepare(group, rng).unwrap();
        let mut receiver = Ot2Receiver::new(group, choice_bit, rng).unwrap();
        let b = receiver.generate_reply(sender.public_key());
        let (c0, c1) = sender.respond(&b, m0, m1).unwrap();
        receiver.recover(&c0, &c1).unwrap()
    }

    #[test]
    fn recovers_message_zero_on_bit_zero() {
        let group = Group::new().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let out = run_ot(&group, false, b"hello", b"world", &mut rng);
        assert_eq!(out, b"hello");
    }

    #[test]
    fn recovers_message_one_on_bit_one() {
        let group = Group::new().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let out = run_ot(&group, true, b"hello", b"world", &mut rng);
        assert_eq!(out, b"world");
    }

    #[test]
    fn rejects_mismatched_message_lengths() {
        let group = Group::new().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let sender = Ot2Sender::prepare(&group, &mut rng).unwrap();
        let mut receiver = Ot2Receiver::new(&group, false, &mut rng).unwrap();
        let b = receiver.generate_reply(sender.public_key());
        assert!(sender.respond(&b, b"short", b"longer!!").is_err());
    }

    #[test]
    fn rejects_out_of_range_b() {
        let group = Group::new().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let sender = Ot2Sender::prepare(&group, &mut rng).unwrap();
        let bad_b = BigUint::one();
        assert!(sender.respond(&bad_b, b"m0", b"m1").is_err());
    }
}
