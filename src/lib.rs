//! Adaptive 1-out-of-N oblivious transfer, in the style of Naor-Pinkas (2005, Protocol 3.1).
//!
//! A sender holds an `m×m` grid of `N = m²` equal-length messages. It runs a one-time
//! [`AdaptiveSender::setup`] that publishes `m²` commitments. A receiver may then, round over
//! round, adaptively pick `(i, j)` coordinates and learn exactly `X[i][j]` via
//! [`AdaptiveReceiver::query`] — without learning any other message, and without the sender
//! learning `(i, j)`.
//!
//! Each round costs `O(m)` group operations rather than `O(m²)`, by running a
//! [1-out-of-m OT](ot_1ofm) per axis, itself built from `ℓ = ⌈log₂ m⌉` [1-out-of-2 DDH
//! OTs](ot_ddh) with per-bit seed pairs that XOR-combine into one pad per index.
//!
//! ```
//! use adaptive_ot::{AdaptiveReceiver, AdaptiveSender, Group, InProcessChooser, OsRng};
//!
//! # fn main() -> Result<(), adaptive_ot::CoreError> {
//! let group = Group::new()?;
//! let messages = vec![
//!     vec![b"A".to_vec(), b"B".to_vec()],
//!     vec![b"C".to_vec(), b"D".to_vec()],
//! ];
//!
//! let mut sender = AdaptiveSender::new(&group, messages)?;
//! let setup = sender.setup(&mut OsRng)?;
//!
//! let mut receiver = AdaptiveReceiver::new(&group);
//! receiver.ingest(&setup)?;
//!
//! let payload = sender.prepare_query_payload(&mut OsRng)?;
//! let mut row_chooser = InProcessChooser::new(&group, OsRng);
//! let mut col_chooser = InProcessChooser::new(&group, OsRng);
//! let msg = receiver.query(1, 0, &payload, &mut row_chooser, &mut col_chooser)?;
//! assert_eq!(msg, b"C");
//! # Ok(())
//! # }
//! ```

pub mod chooser;
pub mod commitment;
pub mod error;
pub mod group;
pub mod hash;
pub mod ot_1ofm;
pub mod ot_ddh;
pub mod prf;
pub mod receiver;
pub mod rng;
pub mod sender;

pub use chooser::{Chooser, InProcessChooser};
pub use error::{Bug, CoreError};
pub use group::Group;
pub use ot_1ofm::{Of1mService, Of1mServiceInfo};
pub use receiver::AdaptiveReceiver;
pub use rng::{OsRng, Rng};
pub use sender::{AdaptiveSender, PublicSetup, RoundPayload};
