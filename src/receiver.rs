//! Receiver role: setup ingest plus per-query resolution.

use num_bigint::BigUint;
use tracing::{debug, instrument};

use crate::chooser::Chooser;
use crate::commitment::open;
use crate::error::CoreError;
use crate::group::Group;
use crate::hash::HashParams;
use crate::sender::{PublicSetup, RoundPayload};

const COMMITMENT_AAD: &[u8] = b"";

/// Receiver-side session state machine: `Fresh -> SetupReceived -> Querying -> SetupReceived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    SetupReceived,
}

/// Long-term receiver state: the ingested commitment grid and hash parameters.
pub struct AdaptiveReceiver<'g> {
    group: &'g Group,
    state: State,
    m: usize,
    y: Vec<Vec<Vec<u8>>>,
    hash_params: Option<HashParams>,
}

impl<'g> AdaptiveReceiver<'g> {
    pub fn new(group: &'g Group) -> Self {
        AdaptiveReceiver { group, state: State::Fresh, m: 0, y: Vec::new(), hash_params: None }
    }

    /// Ingests the sender's one-time [`PublicSetup`] blob (§4.7).
    ///
    /// Re-ingesting a blob that is identical to the one already held leaves state unchanged;
    /// any other blob while already holding setup is rejected rather than silently replacing it.
    #[instrument(skip_all)]
    pub fn ingest(&mut self, setup: &PublicSetup) -> Result<(), CoreError> {
        if setup.m == 0 {
            return Err(CoreError::MalformedInput("setup m must be non-zero"));
        }
        let m = setup.m as usize;
        if setup.y.len() != m || setup.y.iter().any(|row| row.len() != m) {
            return Err(CoreError::MalformedInput("setup commitment grid shape mismatch"));
        }

        if &setup.p != self.group.p() || &setup.q != self.group.q() {
            return Err(CoreError::InvalidParameters);
        }

        if self.state == State::SetupReceived {
            let unchanged = self.m == m
                && self.y == setup.y
                && self
                    .hash_params
                    .as_ref()
                    .map(|p| p.alpha() == &setup.alpha && p.beta() == &setup.beta && p.lambda_bytes() as u32 == setup.lambda_bytes)
                    .unwrap_or(false);
            if !unchanged {
                return Err(CoreError::ProtocolViolation("setup already ingested with different parameters"));
            }
            debug!("receiver: re-ingest of identical setup, no-op");
            return Ok(());
        }

        self.m = m;
        self.y = setup.y.clone();
        self.hash_params = Some(HashParams::from_parts(setup.alpha.clone(), setup.beta.clone(), setup.lambda_bytes as usize));
        self.state = State::SetupReceived;
        debug!(m = self.m, "receiver: setup ingested");
        Ok(())
    }

    pub fn m(&self) -> usize {
        self.m
    }

    /// Resolves `(i, j)` to its plaintext message (§4.7).
    #[instrument(skip_all, fields(i, j))]
    pub fn query(
        &self,
        i: usize,
        j: usize,
        payload: &RoundPayload<'_>,
        row_chooser: &mut impl Chooser,
        col_chooser: &mut impl Chooser,
    ) -> Result<Vec<u8>, CoreError> {
        if self.state != State::SetupReceived {
            return Err(CoreError::ProtocolViolation("query before setup ingest"));
        }
        if i >= self.m || j >= self.m {
            return Err(CoreError::MalformedInput("query index out of range"));
        }

        let u = row_chooser.choose(&payload.row_service, i)?;
        if u == BigUint::from(0u8) {
            return Err(CoreError::ProtocolViolation("recovered row scalar is zero"));
        }
        let v = col_chooser.choose(&payload.col_service, j)?;
        if v == BigUint::from(0u8) {
            return Err(CoreError::ProtocolViolation("recovered column scalar is zero"));
        }

        if !self.group.in_subgroup(&payload.g_pow_inv_rr) {
            return Err(CoreError::InvalidGroupElement("g_pow_inv_rr not in the order-q subgroup"));
        }

        let e = (&u * &v) % self.group.q();
        let big_e = self.group.pow(&payload.g_pow_inv_rr, &e);

        let params = self.hash_params.as_ref().ok_or(CoreError::ProtocolViolation("hash parameters missing"))?;
        let key = params.hash(self.group, &big_e)?;

        let msg = open(&self.y[i][j], &key, COMMITMENT_AAD)?;
        debug!(i, j, "receiver: query resolved");
        Ok(msg)
    }
}
