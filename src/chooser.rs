//! Receiver-side collaborator that drives the nested 1-out-of-2 OTs for one [`Of1mService`]
//! query, replacing the callback-closure "chooser" pattern with a small trait.

use num_bigint::BigUint;

use crate::error::CoreError;
use crate::group::Group;
use crate::ot_1ofm::{reconstruct, Of1mService};
use crate::ot_ddh::Ot2Receiver;
use crate::rng::Rng;

/// Resolves one index of an [`Of1mService`] into the scalar the sender committed to there.
pub trait Chooser {
    fn choose(&mut self, service: &Of1mService<'_>, index: usize) -> Result<BigUint, CoreError>;
}

/// The default in-process chooser: runs all ℓ nested DDH OTs directly against the sender's live
/// [`Of1mService`], since both parties live in the same process for this crate.
pub struct InProcessChooser<'g, R> {
    group: &'g Group,
    rng: R,
}

impl<'g, R: Rng> InProcessChooser<'g, R> {
    pub fn new(group: &'g Group, rng: R) -> Self {
        InProcessChooser { group, rng }
    }
}

impl<'g, R: Rng> Chooser for InProcessChooser<'g, R> {
    fn choose(&mut self, service: &Of1mService<'_>, index: usize) -> Result<BigUint, CoreError> {
        if index >= service.m() {
            return Err(CoreError::MalformedInput("1-out-of-m index out of range"));
        }

        let mut seeds = Vec::with_capacity(service.l());
        for j in 0..service.l() {
            let bit = ((index >> j) & 1) == 1;
            let sender = service.ot2_sender(j)?;
            let mut receiver = Ot2Receiver::new(self.group, bit, &mut self.rng)?;
            let b = receiver.generate_reply(sender.public_key());
            let (s0, s1) = service.bitpair(j)?;
            let (c0, c1) = sender.respond(&b, s0, s1)?;
            let seed = receiver.recover(&c0, &c1)?;
            if seed.len() != 32 {
                return Err(CoreError::Internal(crate::error::Bug::EncodingOverflow));
            }
            let mut seed_arr = [0u8; 32];
            seed_arr.copy_from_slice(&seed);
            seeds.push(seed_arr);
        }

        reconstruct(service, index, &seeds)
    }
}
