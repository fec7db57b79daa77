//! Validation procedures

mod shuffle_split;

pub use self::shuffle_split::ShuffleSplit;

/// Validation procedures support iteration over train/test folds
pub trait Procedure {
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a>;
}

/// A single fold, consisting of a training set and a testing set of row indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub trainset: Vec<usize>,
    pub testset: Vec<usize>,
}

impl Fold {
    pub fn new() -> Self {
        Fold {
            trainset: Vec::new(),
            testset: Vec::new(),
        }
    }
}

impl Default for Fold {
    fn default() -> Self {
        Fold::new()
    }
}
