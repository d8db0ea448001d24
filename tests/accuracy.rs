//! Statistical accuracy of the estimator, checked over repeated
//! independent trials rather than a single sample.

use distinct_estimator::Estimator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Expected relative standard error for `2^precision` registers.
fn standard_error(precision: u8) -> f64 {
    1.04 / ((1u64 << precision) as f64).sqrt()
}

fn relative_error(estimate: u64, actual: u64) -> f64 {
    (estimate as f64 - actual as f64).abs() / actual as f64
}

#[test]
fn test_error_distribution_over_many_trials() {
    const PRECISION: u8 = 10;
    const TRIALS: u64 = 50;
    const CARDINALITY: u64 = 10_000;

    let sigma = standard_error(PRECISION);
    let mut total_error = 0.0;
    for trial in 0..TRIALS {
        let mut estimator = Estimator::<u64>::new(PRECISION).unwrap();
        // Disjoint key ranges make the trials independent samples of the
        // estimator's error distribution.
        let base = trial * CARDINALITY;
        for key in base..base + CARDINALITY {
            estimator.insert(&key);
        }
        let error = relative_error(estimator.calculate(), CARDINALITY);
        assert!(error < 6.0 * sigma, "trial {trial}: error = {error:.4}");
        total_error += error;
    }

    // The mean absolute error of an unbiased estimator with standard error
    // sigma is about 0.8 * sigma; two sigma leaves generous slack.
    let mean_error = total_error / TRIALS as f64;
    assert!(mean_error < 2.0 * sigma, "mean error = {mean_error:.4}");
}

#[test]
fn test_higher_precision_tracks_tighter() {
    const CARDINALITY: u64 = 50_000;

    let mut coarse = Estimator::<u64>::new(6).unwrap();
    let mut fine = Estimator::<u64>::new(14).unwrap();
    for key in 0..CARDINALITY {
        coarse.insert(&key);
        fine.insert(&key);
    }

    // Both estimates must respect their own error bounds; the fine one is
    // checked at a bound 16x tighter than the coarse one.
    let coarse_error = relative_error(coarse.calculate(), CARDINALITY);
    let fine_error = relative_error(fine.calculate(), CARDINALITY);
    assert!(coarse_error < 6.0 * standard_error(6), "coarse error = {coarse_error:.4}");
    assert!(fine_error < 6.0 * standard_error(14), "fine error = {fine_error:.4}");
}

#[test]
fn test_duplicates_do_not_inflate_the_estimate() {
    const PRECISION: u8 = 12;
    const DISTINCT: u64 = 1_000;

    // Draw 50k keys with replacement from a pool of 1k distinct values:
    // the estimate must track the pool size, not the stream length.
    let mut rng = StdRng::seed_from_u64(42);
    let mut estimator = Estimator::<u64>::new(PRECISION).unwrap();
    for _ in 0..50_000 {
        let key = rng.gen_range(0..DISTINCT);
        estimator.insert(&key);
    }

    let error = relative_error(estimator.calculate(), DISTINCT);
    assert!(error < 6.0 * standard_error(PRECISION), "error = {error:.4}");
}

#[test]
fn test_random_keys_match_sequential_accuracy() {
    const PRECISION: u8 = 12;
    const CARDINALITY: u64 = 20_000;

    // Keys drawn from the full u64 domain; collisions among 20k draws are
    // negligible, so the true cardinality is the number of draws.
    let mut rng = StdRng::seed_from_u64(7);
    let mut estimator = Estimator::<u64>::new(PRECISION).unwrap();
    for _ in 0..CARDINALITY {
        estimator.insert(&rng.gen::<u64>());
    }

    let error = relative_error(estimator.calculate(), CARDINALITY);
    assert!(error < 6.0 * standard_error(PRECISION), "error = {error:.4}");
}

#[test]
fn test_string_keys_accuracy() {
    const PRECISION: u8 = 10;
    const CARDINALITY: usize = 5_000;

    let keys: Vec<String> = (0..CARDINALITY).map(|i| format!("user-{i:06}")).collect();
    let mut estimator =
        Estimator::<String, _>::with_key_adapter(PRECISION, String::as_bytes).unwrap();
    for key in &keys {
        estimator.insert(key);
        estimator.insert(key);
    }

    let error = relative_error(estimator.calculate(), CARDINALITY as u64);
    assert!(error < 6.0 * standard_error(PRECISION), "error = {error:.4}");
}
