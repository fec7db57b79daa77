use log::{debug, info};
use serde_derive::{Deserialize, Serialize};

use crate::config::Config;
use crate::dataset::DataSet;
use crate::error::{Error, Result};
use crate::linear_model::LinearRegression;
use crate::measure_accumulator::{round_to, ExplainedVariance, MeanSquaredError, MeasureAccumulator};
use crate::procedures::{Procedure, ShuffleSplit};
use crate::run_logger::RunLogger;

/// Regression task: a data set and the procedure that splits it into train and test rows
pub struct SupervisedRegression {
    pub(crate) name: String,
    pub(crate) source_data: DataSet,
    pub(crate) estimation_procedure: Box<dyn Procedure>,
    pub(crate) decimals: u32,
}

/// The three reported metrics, rounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub train_mse: f64,
    pub test_mse: f64,
    pub explained_variance: f64,
}

impl Metrics {
    pub const TRAIN_MSE: &'static str = "MSE w/ TRAIN data";
    pub const TEST_MSE: &'static str = "MSE w/ TEST data";
    pub const EXPLAINED_VARIANCE: &'static str = "R-Square";

    /// name/value pairs in reporting order
    pub fn named(&self) -> [(&'static str, f64); 3] {
        [
            (Metrics::TRAIN_MSE, self.train_mse),
            (Metrics::TEST_MSE, self.test_mse),
            (Metrics::EXPLAINED_VARIANCE, self.explained_variance),
        ]
    }

    pub fn report(&self, logger: &dyn RunLogger) {
        for (name, value) in self.named().iter() {
            logger.log(name, *value);
        }
    }
}

/// Result of evaluating a model on the task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub metrics: Metrics,

    /// known targets of the test rows
    pub test_actual: Vec<f64>,

    /// predictions for the test rows, aligned with `test_actual`
    pub test_predicted: Vec<f64>,
}

impl Evaluation {
    /// (actual, predicted) pairs for a predicted-vs-actual scatter plot
    pub fn scatter(&self) -> Vec<(f64, f64)> {
        self.test_actual
            .iter()
            .cloned()
            .zip(self.test_predicted.iter().cloned())
            .collect()
    }
}

impl SupervisedRegression {
    pub fn new<P>(name: &str, source_data: DataSet, procedure: P, decimals: u32) -> Self
    where
        P: Procedure + 'static,
    {
        SupervisedRegression {
            name: name.to_owned(),
            source_data,
            estimation_procedure: Box::new(procedure),
            decimals,
        }
    }

    /// A single seeded train/test split as configured
    pub fn from_config(name: &str, source_data: DataSet, config: &Config) -> Result<Self> {
        let split = ShuffleSplit::new(source_data.n_rows(), config.test_size, config.seed)?;
        Ok(SupervisedRegression::new(
            name,
            source_data,
            split,
            config.decimals,
        ))
    }

    /// get task name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_data(&self) -> &DataSet {
        &self.source_data
    }

    /// Refit `model` on the training rows of every fold and score it.
    ///
    /// Training error is measured on the training rows, test error and explained variance on
    /// the test rows. With several folds the measures accumulate over all of them and `model`
    /// ends up fitted on the last fold.
    pub fn evaluate(&self, model: &mut LinearRegression) -> Result<Evaluation> {
        let data = &self.source_data;

        let mut train_mse = MeanSquaredError::<f64>::new();
        let mut test_mse = MeanSquaredError::<f64>::new();
        let mut explained = ExplainedVariance::<f64>::new();
        let mut test_actual = Vec::new();
        let mut test_predicted = Vec::new();
        let mut n_folds = 0;

        for fold in self.estimation_procedure.iter() {
            let train = data.subset(&fold.trainset);
            let test = data.subset(&fold.testset);
            debug!(
                "{}: fold with {} train and {} test rows",
                self.name,
                train.n_rows(),
                test.n_rows()
            );

            model.refit(&train.features, &train.target)?;

            let pred_train = model.predict(&train.features)?;
            let pred_test = model.predict(&test.features)?;

            train_mse.update(train.target.iter().cloned(), pred_train.iter().cloned());
            for (known, pred) in test.target.iter().zip(&pred_test) {
                test_mse.update_one(known, pred);
                explained.update_one(known, pred);
            }

            test_actual.extend(test.target);
            test_predicted.extend(pred_test);
            n_folds += 1;
        }

        if n_folds == 0 {
            return Err(Error::InvalidSplit(format!("{} has no folds", self.name)));
        }

        let metrics = Metrics {
            train_mse: round_to(train_mse.result()?, self.decimals),
            test_mse: round_to(test_mse.result()?, self.decimals),
            explained_variance: round_to(explained.result()?, self.decimals),
        };
        info!("{}: {:?}", self.name, metrics);

        Ok(Evaluation {
            metrics,
            test_actual,
            test_predicted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::FeatureTable;
    use crate::procedures::Fold;
    use crate::run_logger::RecordingLogger;
    use crate::testing::synthetic_housing;

    fn task(data: DataSet) -> SupervisedRegression {
        SupervisedRegression::from_config("synthetic", data, &Config::default()).unwrap()
    }

    #[test]
    fn evaluation_on_housing_shape() {
        let data = synthetic_housing(506, 13, 17);
        let task = task(data.clone());
        let mut model = LinearRegression::fit_dataset(&data).unwrap();

        let eval = task.evaluate(&mut model).unwrap();

        assert_eq!(eval.test_actual.len(), 167);
        assert_eq!(eval.test_predicted.len(), 167);
        assert!(eval.metrics.train_mse >= 0.0);
        assert!(eval.metrics.test_mse >= 0.0);
        assert!(eval.metrics.explained_variance <= 1.0);
        // uniform noise on [-1, 1) has variance 1/3
        assert!(eval.metrics.test_mse < 1.0);
        assert!(eval.metrics.explained_variance > 0.9);
    }

    #[test]
    fn metrics_are_rounded() {
        let data = synthetic_housing(120, 4, 2);
        let mut model = LinearRegression::fit_dataset(&data).unwrap();
        let eval = task(data).evaluate(&mut model).unwrap();

        for (_, v) in eval.metrics.named().iter() {
            assert_eq!(*v, round_to(*v, 4));
        }
    }

    #[test]
    fn oversized_decimals_leave_metrics_finite() {
        let data = synthetic_housing(120, 4, 2);
        let config = Config {
            decimals: 400,
            ..Config::default()
        };
        let task = SupervisedRegression::from_config("synthetic", data.clone(), &config).unwrap();
        let mut model = LinearRegression::fit_dataset(&data).unwrap();
        let eval = task.evaluate(&mut model).unwrap();

        for (_, v) in eval.metrics.named().iter() {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn evaluation_is_reproducible() {
        let data = synthetic_housing(200, 5, 12);
        let mut a = LinearRegression::fit_dataset(&data).unwrap();
        let mut b = a.clone();

        let task = task(data);
        assert_eq!(task.evaluate(&mut a).unwrap(), task.evaluate(&mut b).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn model_is_refit_on_train_rows_only() {
        let data = synthetic_housing(90, 3, 5);
        let split = ShuffleSplit::new(data.n_rows(), 0.33, 5).unwrap();
        let train = data.subset(&split.fold().trainset);

        let mut model = LinearRegression::fit_dataset(&data).unwrap();
        SupervisedRegression::new("synthetic", data, split, 4)
            .evaluate(&mut model)
            .unwrap();

        assert_eq!(model, LinearRegression::fit_dataset(&train).unwrap());
    }

    #[test]
    fn constant_test_target_is_fatal() {
        let features = FeatureTable::from_rows(
            vec!["a"],
            vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]],
        )
        .unwrap();
        let data = DataSet::new(features, vec![1.0, 2.0, 5.0, 5.0], "y".into()).unwrap();

        struct Fixed(Fold);
        impl Procedure for Fixed {
            fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a> {
                Box::new(std::iter::once(&self.0))
            }
        }
        let fold = Fold {
            trainset: vec![0, 1],
            testset: vec![2, 3],
        };

        let mut model = LinearRegression::fit_dataset(&data).unwrap();
        match SupervisedRegression::new("flat", data, Fixed(fold), 4).evaluate(&mut model) {
            Err(Error::Degenerate(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn metrics_reach_the_logger() {
        let metrics = Metrics {
            train_mse: 19.0,
            test_mse: 28.5,
            explained_variance: 0.69,
        };
        let logger = RecordingLogger::default();
        metrics.report(&logger);

        assert_eq!(
            logger.records(),
            vec![
                (Metrics::TRAIN_MSE.to_owned(), 19.0),
                (Metrics::TEST_MSE.to_owned(), 28.5),
                (Metrics::EXPLAINED_VARIANCE.to_owned(), 0.69),
            ]
        );
    }
}
