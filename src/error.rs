//! Error taxonomy for the protocol core.
//!
//! [`CoreError`] is the only error type surfaced across the public API. Each variant maps to
//! exactly one diagnostic class from the protocol design; internal invariant violations that are
//! this crate's own fault (not a misbehaving peer) are carried separately as [`Bug`].

use thiserror::Error;

/// Errors surfaced by the oblivious transfer core.
///
/// Every query or setup call returns one of these on failure. No path silently coerces invalid
/// input: a query that hits any of these aborts without producing output and without mutating
/// long-term party state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Group self-check failed, or a setup blob disagrees with this party's own `(p, q)`.
    #[error("invalid group parameters")]
    InvalidParameters,

    /// Missing field, wrong length, or an index out of range in a setup or round payload.
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),

    /// `B`, `g_pow_inv_rr`, or a recovered group element failed a subgroup or range check.
    #[error("invalid group element: {0}")]
    InvalidGroupElement(&'static str),

    /// HMAC tag mismatch, length mismatch, or a commitment opened with the wrong `(key, aad)`.
    #[error("invalid commitment")]
    InvalidCommitment,

    /// A recovered scalar was zero, or a payload list did not match the service's own payload.
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    /// An invariant this crate itself is responsible for was broken; not caused by a peer.
    #[error("internal error")]
    Internal(#[from] Bug),
}

/// Invariant violations that indicate a defect in this crate, not in a peer's behavior.
///
/// These should be unreachable in correct code; they exist so a broken internal invariant fails
/// loudly with a stack-traceable error instead of panicking or silently producing wrong output.
#[derive(Debug, Error)]
pub enum Bug {
    #[error("sampled scalar exhausted rejection budget")]
    RngRejectionExhausted,
    #[error("bit index out of range for this service")]
    BitIndexOutOfRange,
    #[error("fixed-width encoding overflow")]
    EncodingOverflow,
}
