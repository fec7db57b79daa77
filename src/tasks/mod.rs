mod supervised_regression;

pub use self::supervised_regression::{Evaluation, Metrics, SupervisedRegression};
