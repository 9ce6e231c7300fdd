//! Property tests for the dataset allocator

use ppa_splitter_core::{build_label_sequence, Dataset, LabelSequence, Ratios};
use proptest::prelude::*;

/// Ratios with test in [0, 1) and dev taking part of the remainder
fn ratio_strategy() -> impl Strategy<Value = Ratios> {
    (0.0f64..1.0, 0.0f64..0.99).prop_map(|(test, share)| {
        let dev = (1.0 - test) * share;
        Ratios::from_test_dev(test, dev).expect("generated ratios are valid")
    })
}

proptest! {
    #[test]
    fn sequence_length_matches_unit_count(n in 0usize..2000, ratios in ratio_strategy()) {
        let sequence = LabelSequence::allocate(n, &ratios);
        prop_assert_eq!(sequence.len(), n);
        prop_assert_eq!(sequence.counts().total(), n);
    }

    #[test]
    fn counts_converge_to_ratios(n in 1usize..2000, ratios in ratio_strategy()) {
        let counts = LabelSequence::allocate(n, &ratios).counts();
        for dataset in Dataset::ALL {
            let actual = counts.get(dataset) as f64 / n as f64;
            let requested = ratios.get(dataset);
            prop_assert!(
                (actual - requested).abs() <= 1.0 / n as f64 + 1e-12,
                "{} got {} for requested {} with n = {}",
                dataset, actual, requested, n
            );
        }
    }

    #[test]
    fn zero_dev_never_labels_dev(n in 0usize..2000, test in 0.0f64..=1.0) {
        let sequence = build_label_sequence(n, test, 0.0).unwrap();
        prop_assert!(sequence.labels().iter().all(|d| *d != Dataset::Dev));
    }

    #[test]
    fn prefixes_track_quotas(n in 1usize..500, ratios in ratio_strategy()) {
        let sequence = LabelSequence::allocate(n, &ratios);
        let quotas = sequence.counts();
        let mut seen = [0usize; 3];

        for (i, label) in sequence.labels().iter().enumerate() {
            let slot = Dataset::ALL.iter().position(|d| d == label).unwrap();
            seen[slot] += 1;
            let step = (i + 1) as f64;
            for (slot, dataset) in Dataset::ALL.iter().enumerate() {
                let ideal = quotas.get(*dataset) as f64 * step / n as f64;
                // Smooth interleaving never runs more than one unit ahead or
                // two units behind the ideal proportional count
                prop_assert!(seen[slot] as f64 <= ideal + 1.0);
                prop_assert!(seen[slot] as f64 + 2.0 >= ideal);
            }
        }
    }
}

#[test]
fn test_interleaving_is_not_contiguous() {
    let sequence = build_label_sequence(100, 0.1, 0.1).unwrap();
    let labels = sequence.labels();

    let first_test = labels.iter().position(|d| *d == Dataset::Test).unwrap();
    let last_test = labels.iter().rposition(|d| *d == Dataset::Test).unwrap();
    assert!(last_test - first_test > 80, "test units are clustered");

    let first_dev = labels.iter().position(|d| *d == Dataset::Dev).unwrap();
    let last_dev = labels.iter().rposition(|d| *d == Dataset::Dev).unwrap();
    assert!(last_dev - first_dev > 80, "dev units are clustered");
}
