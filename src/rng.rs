//! RNG collaborator.
//!
//! Every scalar sample and every seed draw goes through this trait instead of a hidden
//! process-global generator, so production code and deterministic tests can share the same
//! sampling logic while swapping only the byte source.

use rand_core::{CryptoRng, OsRng as CoreOsRng, RngCore};

/// A source of cryptographically strong uniform bytes.
pub trait Rng {
    fn fill_bytes(&mut self, buf: &mut [u8]);
}

impl<T: RngCore + CryptoRng> Rng for T {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        RngCore::fill_bytes(self, buf)
    }
}

/// The system CSPRNG, wrapped so callers write `OsRng` instead of reaching for `rand_core`
/// directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRng;

impl Rng for OsRng {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        CoreOsRng.fill_bytes(buf)
    }
}
