//! Local demonstration of the adaptive 1-out-of-N OT protocol.
//!
//! Runs both parties in-process: builds a synthetic `m×m` grid, performs setup, then drives
//! `rounds` adaptively-chosen queries and reports whether each recovered message matched the
//! grid. Not part of the protocol's security contract; this binary never logs scalars, seeds,
//! or keys, only indices and lengths.

use adaptive_ot::{AdaptiveReceiver, AdaptiveSender, CoreError, Group, InProcessChooser};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::info;

struct Args {
    m: u32,
    rounds: u32,
    seed: u64,
}

fn args() -> Args {
    use bpaf::Parser;
    let m = bpaf::long("m").help("grid side length").argument::<u32>("M").fallback(4);
    let rounds = bpaf::long("rounds").help("number of adaptive queries to run").argument::<u32>("ROUNDS").fallback(8);
    let seed = bpaf::long("seed").help("seed for the demo's deterministic RNG").argument::<u64>("SEED").fallback(0);
    bpaf::construct!(Args { m, rounds, seed }).to_options().descr("Adaptive 1-out-of-N OT demo").run()
}

fn grid(m: usize) -> Vec<Vec<Vec<u8>>> {
    (0..m).map(|i| (0..m).map(|j| format!("MSG(i={i},j={j})").into_bytes()).collect()).collect()
}

fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt::init();

    let args = args();
    let m = args.m.max(1) as usize;
    let mut rng = ChaCha20Rng::seed_from_u64(args.seed);

    let group = Group::new()?;
    let mut sender = AdaptiveSender::new(&group, grid(m))?;
    let setup = sender.setup(&mut rng)?;
    info!(m, "demo: setup published");

    let mut receiver = AdaptiveReceiver::new(&group);
    receiver.ingest(&setup)?;

    let mut ok = 0u32;
    for round in 0..args.rounds {
        let i = (rng.next_u32() as usize) % m;
        let j = (rng.next_u32() as usize) % m;

        let payload = sender.prepare_query_payload(&mut rng)?;
        let mut row_chooser = InProcessChooser::new(&group, ChaCha20Rng::seed_from_u64(args.seed ^ (round as u64) ^ 0x01));
        let mut col_chooser = InProcessChooser::new(&group, ChaCha20Rng::seed_from_u64(args.seed ^ (round as u64) ^ 0x02));

        let got = receiver.query(i, j, &payload, &mut row_chooser, &mut col_chooser)?;
        let want = format!("MSG(i={i},j={j})").into_bytes();
        let matched = got == want;
        ok += matched as u32;
        println!("round {round}: query({i}, {j}) -> {}", if matched { "match" } else { "MISMATCH" });
    }

    println!("{ok}/{} rounds matched", args.rounds);
    Ok(())
}
