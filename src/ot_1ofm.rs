//! 1-out-of-m OT composed from ℓ = ⌈log₂ m⌉ instances of the DDH 1-out-of-2 OT (§4.5).
//!
//! The sender publishes `m` ciphertexts once; the receiver spends `ℓ` 1-out-of-2 OTs to learn
//! exactly one per-bit seed per position, reconstructs the pad for its chosen index from those
//! seeds, and decrypts only that one ciphertext.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;
use zeroize::Zeroize;

use crate::error::CoreError;
use crate::group::{from_fixed_be, to_fixed_be, Group};
use crate::ot_ddh::Ot2Sender;
use crate::prf::prf_labeled;
use crate::rng::Rng;

fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

fn bit_info(label: &[u8], j: usize, sid: &[u8; 16]) -> Vec<u8> {
    let mut info = Vec::with_capacity(label.len() + 2 + 2 + 5 + 16);
    info.extend_from_slice(label);
    info.extend_from_slice(b"|j=");
    info.extend_from_slice(&(j as u16).to_be_bytes());
    info.extend_from_slice(b"|sid=");
    info.extend_from_slice(sid);
    info
}

/// Sender-side state for one direction (`"ROW"` or `"COL"`) of a query round.
///
/// Lives for exactly one query; seeds are zeroized on drop.
pub struct Of1mService<'g> {
    group: &'g Group,
    m: usize,
    l: usize,
    q_bytes: usize,
    sid: [u8; 16],
    label: Vec<u8>,
    seeds0: Vec<[u8; 32]>,
    seeds1: Vec<[u8; 32]>,
    ot2_senders: Vec<Ot2Sender<'g>>,
    ct: Vec<Vec<u8>>,
}

impl<'g> Drop for Of1mService<'g> {
    fn drop(&mut self) {
        for s in self.seeds0.iter_mut() {
            s.zeroize();
        }
        for s in self.seeds1.iter_mut() {
            s.zeroize();
        }
    }
}

/// Number of bits needed to index `m` positions, with the `m = 1` edge case pinned to 1 bit.
fn ell_for(m: usize) -> usize {
    if m <= 1 {
        1
    } else {
        (usize::BITS - (m - 1).leading_zeros()) as usize
    }
}

impl<'g> Of1mService<'g> {
    /// Builds a fresh service over `payload`, a non-empty list of ℤ_q* scalars.
    pub fn new(group: &'g Group, payload: &[BigUint], label: &[u8], rng: &mut impl Rng) -> Result<Self, CoreError> {
        if payload.is_empty() {
            return Err(CoreError::MalformedInput("1-out-of-m payload must be non-empty"));
        }
        for x in payload {
            if x.is_zero() || x >= group.q() {
                return Err(CoreError::MalformedInput("1-out-of-m payload element not in Z_q*"));
            }
        }

        let m = payload.len();
        let l = ell_for(m);
        let q_bytes = group.q_bytes();

        let mut sid = [0u8; 16];
        rng.fill_bytes(&mut sid);

        let mut seeds0 = Vec::with_capacity(l);
        let mut seeds1 = Vec::with_capacity(l);
        let mut ot2_senders = Vec::with_capacity(l);
        for _ in 0..l {
            let mut s0 = [0u8; 32];
            let mut s1 = [0u8; 32];
            rng.fill_bytes(&mut s0);
            rng.fill_bytes(&mut s1);
            seeds0.push(s0);
            seeds1.push(s1);
            ot2_senders.push(Ot2Sender::prepare(group, rng)?);
        }

        let mut ct = Vec::with_capacity(m);
        for (t, p_t) in payload.iter().enumerate() {
            let mut pad = vec![0u8; q_bytes];
            for j in 0..l {
                let bit = (t >> j) & 1;
                let seed = if bit == 1 { &seeds1[j] } else { &seeds0[j] };
                let info = bit_info(label, j, &sid);
                xor_into(&mut pad, &prf_labeled(seed, &info, q_bytes));
            }
            let mt = to_fixed_be(p_t, q_bytes)?;
            let mut c = mt;
            xor_into(&mut c, &pad);
            ct.push(c);
        }

        Ok(Of1mService { group, m, l, q_bytes, sid, label: label.to_vec(), seeds0, seeds1, ot2_senders, ct })
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn l(&self) -> usize {
        self.l
    }

    pub fn q_bytes(&self) -> usize {
        self.q_bytes
    }

    pub fn sid(&self) -> &[u8; 16] {
        &self.sid
    }

    pub fn label(&self) -> &[u8] {
        &self.label
    }

    pub fn ciphertext(&self, t: usize) -> Result<&[u8], CoreError> {
        self.ct.get(t).map(|v| v.as_slice()).ok_or(CoreError::Internal(crate::error::Bug::BitIndexOutOfRange))
    }

    /// The seed pair for bit position `j`, to be transferred via the nested DDH OT.
    pub fn bitpair(&self, j: usize) -> Result<(&[u8; 32], &[u8; 32]), CoreError> {
        if j >= self.l {
            return Err(CoreError::Internal(crate::error::Bug::BitIndexOutOfRange));
        }
        Ok((&self.seeds0[j], &self.seeds1[j]))
    }

    /// The nested DDH OT sender for bit position `j`.
    pub fn ot2_sender(&self, j: usize) -> Result<&Ot2Sender<'g>, CoreError> {
        self.ot2_senders.get(j).ok_or(CoreError::Internal(crate::error::Bug::BitIndexOutOfRange))
    }

    /// A serializable snapshot of everything this service publishes (seeds excluded).
    pub fn info(&self) -> Of1mServiceInfo {
        Of1mServiceInfo {
            m: self.m as u32,
            l: self.l as u32,
            q_bytes: self.q_bytes as u32,
            sid: self.sid,
            label: self.label.clone(),
            ct: self.ct.clone(),
            a_j: self.ot2_senders.iter().map(|s| s.public_key().clone()).collect(),
        }
    }
}

/// Serializable public view of an [`Of1mService`] (§6 external interface), sans secrets.
#[derive(Debug, Clone, Serialize)]
pub struct Of1mServiceInfo {
    pub m: u32,
    pub l: u32,
    pub q_bytes: u32,
    pub sid: [u8; 16],
    pub label: Vec<u8>,
    pub ct: Vec<Vec<u8>>,
    pub a_j: Vec<BigUint>,
}

/// Reconstructs the chosen scalar from `seeds` gathered via the nested OTs (§4.5 step 2-3).
pub fn reconstruct(service: &Of1mService<'_>, index: usize, seeds: &[[u8; 32]]) -> Result<BigUint, CoreError> {
    if index >= service.m() {
        return Err(CoreError::MalformedInput("1-out-of-m index out of range"));
    }
    if seeds.len() != service.l() {
        return Err(CoreError::Internal(crate::error::Bug::BitIndexOutOfRange));
    }

    let q_bytes = service.q_bytes();
    let mut pad = vec![0u8; q_bytes];
    for (j, seed) in seeds.iter().enumerate() {
        let info = bit_info(service.label(), j, service.sid());
        xor_into(&mut pad, &prf_labeled(seed, &info, q_bytes));
    }

    let ct = service.ciphertext(index)?;
    let mut m_bytes = ct.to_vec();
    xor_into(&mut m_bytes, &pad);
    let x = from_fixed_be(&m_bytes);

    if x.is_zero() || &x >= service.group_q_ref() {
        return Err(CoreError::ProtocolViolation("1-out-of-m recovered value not in Z_q*"));
    }
    Ok(x)
}

impl<'g> Of1mService<'g> {
    fn group_q_ref(&self) -> &BigUint {
        self.group.q()
    }
}
