//! Seeded train/test splits.
//!
//! All splitting is index-based and driven by an explicit seed so that two
//! runs over the same table produce identical membership; the trainers rely
//! on this for reproducible metrics.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256Plus;
use std::collections::BTreeMap;

/// Shuffle `0..n` with a seeded RNG and split off `ceil(n * test_ratio)`
/// test indices. Returns `(train, test)`.
pub fn shuffle_split(n: usize, test_ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_ratio).ceil() as usize;
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}

/// Stratified variant: the test ratio is applied within every class, so the
/// split preserves class balance. Classes are visited in label order with a
/// single seeded RNG, which keeps the result deterministic.
pub fn stratified_split(labels: &[usize], test_ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, label) in labels.iter().enumerate() {
        by_class.entry(*label).or_default().push(idx);
    }

    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for (_, mut members) in by_class {
        members.shuffle(&mut rng);
        let n_test = ((members.len() as f64) * test_ratio).ceil() as usize;
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes() {
        let (train, test) = shuffle_split(20, 0.25, 42);
        assert_eq!(test.len(), 5);
        assert_eq!(train.len(), 15);

        // Test size rounds up
        let (train, test) = shuffle_split(10, 0.25, 42);
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 7);
    }

    #[test]
    fn test_split_is_a_partition() {
        let (mut train, test) = shuffle_split(50, 0.3, 7);
        train.extend_from_slice(&test);
        train.sort_unstable();
        assert_eq!(train, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_membership() {
        let a = shuffle_split(100, 0.25, 42);
        let b = shuffle_split(100, 0.25, 42);
        assert_eq!(a, b, "Fixed seed must reproduce the split exactly");

        let c = shuffle_split(100, 0.25, 43);
        assert_ne!(a.1, c.1, "Different seed should move the boundary");
    }

    #[test]
    fn test_stratified_preserves_class_balance() {
        // 40 negatives, 20 positives
        let mut labels = vec![0usize; 40];
        labels.extend(vec![1usize; 20]);

        let (train, test) = stratified_split(&labels, 0.25, 42);
        assert_eq!(test.len(), 15);
        assert_eq!(train.len(), 45);

        let test_pos = test.iter().filter(|&&i| labels[i] == 1).count();
        let train_pos = train.iter().filter(|&&i| labels[i] == 1).count();
        assert_eq!(test_pos, 5, "A quarter of each class lands in test");
        assert_eq!(train_pos, 15);
    }

    #[test]
    fn test_stratified_is_deterministic() {
        let labels: Vec<usize> = (0..30).map(|i| usize::from(i % 3 == 0)).collect();
        let a = stratified_split(&labels, 0.25, 9);
        let b = stratified_split(&labels, 0.25, 9);
        assert_eq!(a, b);
    }
}
