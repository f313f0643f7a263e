// ============================================================
// Layer 4 - Train/Holdout Splitter
// ============================================================
// Shuffles samples with a seeded RNG and splits them into:
//   - Training set: used to fit the encoder and the forest
//   - Holdout set:  used only to compute MAE and R²
//
// The holdout size is ceil(n * test_fraction), the rest is
// training (20% holdout → 80 / 20 on 100 rows). The same seed
// and the same input always produce the same split.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom
// driven by a StdRng seeded from a u64.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Seeded shuffle of `samples`, split into (train, holdout).
///
/// # Example
/// ```ignore
/// let (train, test) = split_train_test(all_rows, 0.2, 42);
/// // train has 80% of rows, test has 20%
/// ```
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total     = samples.len();
    let test_size = ((total as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let test_size = test_size.min(total);

    // split_off(n) leaves [0..n] in `samples` and returns [n..]
    let test = samples.split_off(total - test_size);

    tracing::debug!(
        "Dataset split (seed {}): {} training, {} holdout",
        seed,
        samples.len(),
        test.len(),
    );

    (samples, test)
}
