//! Sender role: one-time grid setup plus per-round payload preparation.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::commitment::commit;
use crate::error::CoreError;
use crate::group::Group;
use crate::hash::HashParams;
use crate::ot_1ofm::Of1mService;
use crate::rng::Rng;

const COMMITMENT_AAD: &[u8] = b"";
const ROW_LABEL: &[u8] = b"ROW";
const COL_LABEL: &[u8] = b"COL";

/// The blob the sender publishes once, before any queries (§3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublicSetup {
    pub m: u32,
    pub y: Vec<Vec<Vec<u8>>>,
    pub alpha: BigUint,
    pub beta: BigUint,
    pub lambda_bytes: u32,
    pub p: BigUint,
    pub q: BigUint,
}

/// Everything the sender hands the receiver for a single adaptive query round (§3, §6).
pub struct RoundPayload<'g> {
    pub row_ot_payload: Vec<BigUint>,
    pub col_ot_payload: Vec<BigUint>,
    pub g_pow_inv_rr: BigUint,
    pub row_service: Of1mService<'g>,
    pub col_service: Of1mService<'g>,
}

/// Long-term sender state: the message grid and its row/column DDH synthesizer scalars.
pub struct AdaptiveSender<'g> {
    group: &'g Group,
    m: usize,
    messages: Vec<Vec<Vec<u8>>>,
    row_scalars: Vec<BigUint>,
    col_scalars: Vec<BigUint>,
    hash_params: Option<HashParams>,
}

impl<'g> Drop for AdaptiveSender<'g> {
    fn drop(&mut self) {
        // num-bigint's BigUint has no Zeroize impl, so its backing limb allocation cannot be
        // wiped from here; this at least drops the scalars' magnitudes rather than letting the
        // struct's final field values linger for as long as the Drop glue takes to run.
        self.row_scalars.clear();
        self.col_scalars.clear();
    }
}

impl<'g> AdaptiveSender<'g> {
    /// `messages` must be row-major, `m` rows of `m` equal-length byte strings, `N = m²`.
    pub fn new(group: &'g Group, messages: Vec<Vec<Vec<u8>>>) -> Result<Self, CoreError> {
        let m = messages.len();
        if m == 0 {
            return Err(CoreError::MalformedInput("message grid must be non-empty"));
        }
        let msg_len = messages[0].first().map(|row0| row0.len());
        for row in &messages {
            if row.len() != m {
                return Err(CoreError::MalformedInput("message grid must be square (m rows of m columns)"));
            }
            for msg in row {
                if Some(msg.len()) != msg_len {
                    return Err(CoreError::MalformedInput("all messages must have equal length"));
                }
            }
        }

        Ok(AdaptiveSender { group, m, messages, row_scalars: Vec::new(), col_scalars: Vec::new(), hash_params: None })
    }

    /// Builds from a flat list of `N` messages, rejecting any `N` whose square root is not an
    /// integer before reshaping row-major into an `m×m` grid (§4.6 step 1).
    pub fn from_flat(group: &'g Group, messages: Vec<Vec<u8>>) -> Result<Self, CoreError> {
        let n = messages.len();
        let m = (n as f64).sqrt().round() as usize;
        if m == 0 || m * m != n {
            return Err(CoreError::MalformedInput("message count is not a perfect square"));
        }

        let mut grid = Vec::with_capacity(m);
        let mut rest = messages;
        for _ in 0..m {
            grid.push(rest.drain(..m).collect());
        }
        Self::new(group, grid)
    }

    /// One-time database initialization (§4.6 step 1-5). Returns the blob to publish.
    #[instrument(skip_all, fields(m = self.m))]
    pub fn setup(&mut self, rng: &mut impl Rng) -> Result<PublicSetup, CoreError> {
        let params = HashParams::sample(self.group, rng)?;

        let row_scalars: Vec<BigUint> =
            (0..self.m).map(|_| self.group.rand_scalar_nonzero(rng)).collect::<Result<_, _>>()?;
        let col_scalars: Vec<BigUint> =
            (0..self.m).map(|_| self.group.rand_scalar_nonzero(rng)).collect::<Result<_, _>>()?;

        let mut y = Vec::with_capacity(self.m);
        for i in 0..self.m {
            let g_r_i = self.group.pow(self.group.g(), &row_scalars[i]);
            let mut row_commits = Vec::with_capacity(self.m);
            for j in 0..self.m {
                let e_ij = self.group.pow(&g_r_i, &col_scalars[j]);
                let key = params.hash(self.group, &e_ij)?;
                let commitment = commit(&self.messages[i][j], &key, COMMITMENT_AAD)?;
                row_commits.push(commitment);
            }
            y.push(row_commits);
        }

        debug!(m = self.m, "sender: commitment grid built");

        self.row_scalars = row_scalars;
        self.col_scalars = col_scalars;
        self.hash_params = Some(params.clone());

        info!(m = self.m, "sender: database initialized");
        Ok(PublicSetup {
            m: self.m as u32,
            y,
            alpha: params.alpha().clone(),
            beta: params.beta().clone(),
            lambda_bytes: params.lambda_bytes() as u32,
            p: self.group.p().clone(),
            q: self.group.q().clone(),
        })
    }

    /// Per-round payload preparation (§4.6). Requires [`AdaptiveSender::setup`] to have run.
    #[instrument(skip_all, fields(m = self.m))]
    pub fn prepare_query_payload(&self, rng: &mut impl Rng) -> Result<RoundPayload<'g>, CoreError> {
        if self.hash_params.is_none() {
            return Err(CoreError::ProtocolViolation("prepare_query_payload called before setup"));
        }

        let r_r = self.group.rand_scalar_nonzero(rng)?;
        let r_c = self.group.rand_scalar_nonzero(rng)?;

        let row_ot_payload: Vec<BigUint> =
            self.row_scalars.iter().map(|r| (r * &r_r) % self.group.q()).collect();
        let col_ot_payload: Vec<BigUint> =
            self.col_scalars.iter().map(|c| (c * &r_c) % self.group.q()).collect();

        let r_product = (&r_r * &r_c) % self.group.q();
        let inv_rr = self.group.inv_q(&r_product);
        let g_pow_inv_rr = self.group.pow(self.group.g(), &inv_rr);

        let row_service = Of1mService::new(self.group, &row_ot_payload, ROW_LABEL, rng)?;
        let col_service = Of1mService::new(self.group, &col_ot_payload, COL_LABEL, rng)?;

        debug!("sender: round payload prepared");
        Ok(RoundPayload { row_ot_payload, col_ot_payload, g_pow_inv_rr, row_service, col_service })
    }
}
