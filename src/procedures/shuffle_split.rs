use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{Fold, Procedure};
use crate::error::{Error, Result};

/// A single seeded random train/test split
///
/// The test set holds `ceil(test_size * n_rows)` rows, the training set the rest. The partition
/// depends only on the seed, the fraction and the row count; `ChaCha8Rng` produces the same
/// stream on every platform.
#[derive(Debug, Clone)]
pub struct ShuffleSplit {
    fold: Fold,
}

impl ShuffleSplit {
    pub fn new(n_rows: usize, test_size: f64, seed: u64) -> Result<Self> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(Error::InvalidSplit(format!(
                "test_size must be between 0 and 1, got {}",
                test_size
            )));
        }

        let n_test = (test_size * n_rows as f64).ceil() as usize;
        let n_train = n_rows.saturating_sub(n_test);
        if n_test == 0 || n_train == 0 {
            return Err(Error::InvalidSplit(format!(
                "{} rows with test_size {} leave an empty partition (train {}, test {})",
                n_rows, test_size, n_train, n_test
            )));
        }

        let mut indices: Vec<usize> = (0..n_rows).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let trainset = indices.split_off(n_test);
        Ok(ShuffleSplit {
            fold: Fold {
                trainset,
                testset: indices,
            },
        })
    }

    pub fn fold(&self) -> &Fold {
        &self.fold
    }
}

impl Procedure for ShuffleSplit {
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a> {
        Box::new(std::iter::once(&self.fold))
    }
}
