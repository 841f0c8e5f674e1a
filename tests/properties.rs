//! Property-based tests for the adaptive OT core (§8 invariants/laws).

use adaptive_ot::{commitment, AdaptiveReceiver, AdaptiveSender, Group, InProcessChooser};
use proptest::prelude::*;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn grid(m: usize) -> Vec<Vec<Vec<u8>>> {
    (0..m).map(|i| (0..m).map(|j| format!("MSG(i={i},j={j})").into_bytes()).collect()).collect()
}

proptest! {
    /// Law 1: correctness. For a valid setup, every (i, j) query returns the grid's own message.
    #[test]
    fn correctness_over_full_grid(m in 1usize..6, seed in any::<u64>()) {
        let group = Group::new().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut sender = AdaptiveSender::new(&group, grid(m)).unwrap();
        let setup = sender.setup(&mut rng).unwrap();
        let mut receiver = AdaptiveReceiver::new(&group);
        receiver.ingest(&setup).unwrap();

        for i in 0..m {
            for j in 0..m {
                let payload = sender.prepare_query_payload(&mut rng).unwrap();
                let mut row_chooser = InProcessChooser::new(&group, ChaCha20Rng::seed_from_u64(seed ^ i as u64));
                let mut col_chooser = InProcessChooser::new(&group, ChaCha20Rng::seed_from_u64(seed ^ (j as u64) << 32));
                let got = receiver.query(i, j, &payload, &mut row_chooser, &mut col_chooser).unwrap();
                prop_assert_eq!(got, format!("MSG(i={i},j={j})").into_bytes());
            }
        }
    }

    /// Law 2: commitment round-trip.
    #[test]
    fn commitment_round_trips(msg in proptest::collection::vec(any::<u8>(), 0..256), key in proptest::collection::vec(any::<u8>(), 1..64), aad in proptest::collection::vec(any::<u8>(), 0..32)) {
        let blob = commitment::commit(&msg, &key, &aad).unwrap();
        prop_assert_eq!(commitment::open(&blob, &key, &aad).unwrap(), msg);
    }

    /// Law 3: commitment binding. Opening under a different key fails.
    #[test]
    fn commitment_binds_to_key(msg in proptest::collection::vec(any::<u8>(), 0..128), key in proptest::collection::vec(any::<u8>(), 1..32), key_suffix in any::<u8>()) {
        let mut other_key = key.clone();
        other_key.push(key_suffix);
        let blob = commitment::commit(&msg, &key, b"").unwrap();
        prop_assert!(commitment::open(&blob, &other_key, b"").is_err());
    }

    /// Law 7: payload independence. Two rounds at the same (i, j) with independent blinders
    /// return the same message and do not reuse a round's row/col OT payload lists.
    #[test]
    fn repeated_query_is_stable_with_distinct_payloads(seed_a in any::<u64>(), seed_b in any::<u64>()) {
        prop_assume!(seed_a != seed_b);
        let group = Group::new().unwrap();
        let mut setup_rng = ChaCha20Rng::seed_from_u64(1);
        let mut sender = AdaptiveSender::new(&group, grid(2)).unwrap();
        let setup = sender.setup(&mut setup_rng).unwrap();
        let mut receiver = AdaptiveReceiver::new(&group);
        receiver.ingest(&setup).unwrap();

        let mut rng_a = ChaCha20Rng::seed_from_u64(seed_a);
        let mut rng_b = ChaCha20Rng::seed_from_u64(seed_b);
        let payload_a = sender.prepare_query_payload(&mut rng_a).unwrap();
        let payload_b = sender.prepare_query_payload(&mut rng_b).unwrap();

        prop_assert_ne!(&payload_a.row_ot_payload, &payload_b.row_ot_payload);

        let mut row_a = InProcessChooser::new(&group, ChaCha20Rng::seed_from_u64(seed_a));
        let mut col_a = InProcessChooser::new(&group, ChaCha20Rng::seed_from_u64(seed_a));
        let mut row_b = InProcessChooser::new(&group, ChaCha20Rng::seed_from_u64(seed_b));
        let mut col_b = InProcessChooser::new(&group, ChaCha20Rng::seed_from_u64(seed_b));

        let out_a = receiver.query(0, 0, &payload_a, &mut row_a, &mut col_a).unwrap();
        let out_b = receiver.query(0, 0, &payload_b, &mut row_b, &mut col_b).unwrap();
        prop_assert_eq!(out_a, out_b);
    }
}
