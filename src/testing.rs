//! Fixtures shared by the unit tests

use std::fs;
use std::path::PathBuf;
use std::process;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::dataset::{DataSet, FeatureTable};

/// Names of the Boston housing features, extended with `EXTRA<i>` for wider tables
pub(crate) fn feature_names(n_cols: usize) -> Vec<String> {
    (0..n_cols)
        .map(|i| match crate::housing::BOSTON_FEATURES.get(i) {
            Some(name) => (*name).to_owned(),
            None => format!("EXTRA{}", i),
        })
        .collect()
}

/// A noisy linear data set shaped like the housing data
pub(crate) fn synthetic_housing(n_rows: usize, n_cols: usize, seed: u64) -> DataSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let weights: Vec<f64> = (0..n_cols).map(|_| rng.random_range(-3.0..3.0)).collect();

    let mut data = Vec::with_capacity(n_rows * n_cols);
    let mut target = Vec::with_capacity(n_rows);
    for _ in 0..n_rows {
        let row: Vec<f64> = (0..n_cols).map(|_| rng.random_range(0.0..10.0)).collect();
        let noise: f64 = rng.random_range(-1.0..1.0);
        target.push(22.5 + row.iter().zip(&weights).map(|(x, w)| x * w).sum::<f64>() + noise);
        data.extend(row);
    }

    DataSet::new(
        FeatureTable::new(feature_names(n_cols), data).unwrap(),
        target,
        "MEDV".to_owned(),
    )
    .unwrap()
}

/// An empty directory private to this test process
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("housing-ols-{}-{}", process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}
