//! Ordinary least squares with an intercept

use std::iter::FromIterator;

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::dataset::{DataSet, FeatureTable};
use crate::error::{Error, Result};

/// A fitted linear regression model
///
/// Predicts `intercept + row · coefficients`. The feature names record the column order the
/// coefficients were fitted on; tables are aligned to that order by name before prediction.
///
/// The model can be fitted from a table or by consuming an iterator over training rows:
/// ```
/// # use housing_ols::linear_model::LinearRegression;
/// let data = vec![(vec![1.0], 3.0), (vec![2.0], 5.0), (vec![3.0], 7.0)];
/// let model: LinearRegression = data.iter().map(|(x, y)| (x, y)).collect();
/// assert!((model.predict_row(&[4.0]) - 9.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Fit on every row of `features`.
    ///
    /// The intercept is handled by centering: coefficients solve the least squares problem on
    /// the centered design matrix, the intercept restores the means. Rank deficient designs get
    /// the minimum-norm solution of the pseudo-inverse; singular values below
    /// `max(rows, cols) * eps * s_max` are treated as zero.
    pub fn fit(features: &FeatureTable, target: &[f64]) -> Result<Self> {
        let n = features.n_rows();
        let p = features.n_cols();

        if n != target.len() {
            return Err(Error::InvalidInput(format!(
                "{} feature rows but {} target values",
                n,
                target.len()
            )));
        }
        if n == 0 {
            return Err(Error::InvalidInput("cannot fit on zero rows".into()));
        }

        let y_mean = target.iter().sum::<f64>() / n as f64;

        let mut x_mean = vec![0.0; p];
        for row in features.rows() {
            for (m, &x) in x_mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut x_mean {
            *m /= n as f64;
        }

        let coefficients = if p == 0 {
            Vec::new()
        } else {
            let x = DMatrix::from_fn(n, p, |i, j| features.row(i)[j] - x_mean[j]);
            let y = DVector::from_iterator(n, target.iter().map(|&t| t - y_mean));

            let svd = x.svd(true, true);
            let s_max = svd.singular_values.iter().cloned().fold(0.0, f64::max);
            let eps = n.max(p) as f64 * f64::EPSILON * s_max;
            let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();
            if rank < p {
                debug!("design matrix has rank {} < {} features", rank, p);
            }

            let beta = svd
                .solve(&y, eps)
                .map_err(|e| Error::Degenerate(format!("least squares solve failed: {}", e)))?;
            beta.iter().cloned().collect()
        };

        let intercept = y_mean
            - x_mean
                .iter()
                .zip(&coefficients)
                .map(|(m, c)| m * c)
                .sum::<f64>();

        Ok(LinearRegression {
            feature_names: features.names().to_vec(),
            coefficients,
            intercept,
        })
    }

    pub fn fit_dataset(data: &DataSet) -> Result<Self> {
        LinearRegression::fit(&data.features, &data.target)
    }

    /// Replace all learned parameters by a fit on new data
    pub fn refit(&mut self, features: &FeatureTable, target: &[f64]) -> Result<()> {
        *self = LinearRegression::fit(features, target)?;
        Ok(())
    }

    pub(crate) fn from_parts(
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self> {
        if feature_names.len() != coefficients.len() {
            return Err(Error::DecodeError(format!(
                "{} feature names but {} coefficients",
                feature_names.len(),
                coefficients.len()
            )));
        }
        Ok(LinearRegression {
            feature_names,
            coefficients,
            intercept,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// predict target value for a single feature vector in training column order
    pub fn predict_row(&self, x: &[f64]) -> f64 {
        self.intercept
            + x.iter()
                .zip(&self.coefficients)
                .map(|(xi, ci)| xi * ci)
                .sum::<f64>()
    }

    /// Predict one value per row.
    ///
    /// Fails with `ShapeMismatch` if the column count differs from training and with
    /// `UnknownFeature` if the names differ; columns in a different order are realigned.
    pub fn predict(&self, features: &FeatureTable) -> Result<Vec<f64>> {
        if features.n_cols() != self.n_features() {
            return Err(Error::ShapeMismatch {
                expected: self.n_features(),
                found: features.n_cols(),
            });
        }
        let aligned = features.reorder(&self.feature_names)?;
        Ok(aligned.rows().map(|row| self.predict_row(row)).collect())
    }
}

impl<'a, J> FromIterator<(J, &'a f64)> for LinearRegression
where
    J: IntoIterator<Item = &'a f64>,
{
    /// Fit on `(features, target)` pairs. Columns are named `x0`, `x1`, ... A collection that
    /// cannot be fitted (no rows, ragged rows) yields a model predicting NaN.
    fn from_iter<I: IntoIterator<Item = (J, &'a f64)>>(iter: I) -> Self {
        let mut rows = Vec::new();
        let mut target = Vec::new();
        for (x, &y) in iter {
            rows.push(x.into_iter().cloned().collect::<Vec<f64>>());
            target.push(y);
        }

        let n_cols = rows.first().map_or(0, Vec::len);
        let names: Vec<String> = (0..n_cols).map(|i| format!("x{}", i)).collect();

        FeatureTable::from_rows(names, rows)
            .and_then(|table| LinearRegression::fit(&table, &target))
            .unwrap_or_else(|_| LinearRegression {
                feature_names: Vec::new(),
                coefficients: Vec::new(),
                intercept: f64::NAN,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::synthetic_housing;

    fn table(rows: Vec<Vec<f64>>) -> FeatureTable {
        let n = rows[0].len();
        let names: Vec<String> = (0..n).map(|i| format!("f{}", i)).collect();
        FeatureTable::from_rows(names, rows).unwrap()
    }

    #[test]
    fn ols_flat() {
        let x = table(vec![
            vec![1.0, 2.0],
            vec![2.0, 1.0],
            vec![1.0, 5.0],
            vec![2.0, 6.0],
        ]);
        let model = LinearRegression::fit(&x, &[3.0, 3.0, 3.0, 3.0]).unwrap();

        assert!((model.intercept() - 3.0).abs() < 1e-12);
        for c in model.coefficients() {
            assert!(c.abs() < 1e-12);
        }
    }

    #[test]
    fn ols_recovers_exact_plane() {
        // y = 1 + 2 a - 3 b
        let rows = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![2.0, 3.0],
            vec![5.0, -1.0],
        ];
        let y: Vec<f64> = rows.iter().map(|r| 1.0 + 2.0 * r[0] - 3.0 * r[1]).collect();
        let model = LinearRegression::fit(&table(rows), &y).unwrap();

        assert!((model.intercept() - 1.0).abs() < 1e-9);
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-9);
        assert!((model.coefficients()[1] + 3.0).abs() < 1e-9);
    }

    #[test]
    fn duplicated_column_gets_minimum_norm_solution() {
        // the second column repeats the first, y = 4 x
        let rows = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0], vec![4.0, 4.0]];
        let y = vec![4.0, 8.0, 12.0, 16.0];
        let model = LinearRegression::fit(&table(rows), &y).unwrap();

        assert!((model.coefficients()[0] - 2.0).abs() < 1e-9);
        assert!((model.coefficients()[1] - 2.0).abs() < 1e-9);
        assert!(model.intercept().abs() < 1e-9);
    }

    #[test]
    fn single_row_predicts_its_target() {
        let model = LinearRegression::fit(&table(vec![vec![3.0, 4.0]]), &[7.5]).unwrap();
        assert_eq!(model.coefficients(), &[0.0, 0.0]);
        assert_eq!(model.predict_row(&[100.0, -5.0]), 7.5);
    }

    #[test]
    fn no_features_predicts_the_mean() {
        let empty: Vec<&str> = Vec::new();
        let x = FeatureTable::from_rows(empty, vec![vec![], vec![], vec![]]).unwrap();
        let model = LinearRegression::fit(&x, &[1.0, 2.0, 6.0]).unwrap();

        assert_eq!(model.n_features(), 0);
        assert_eq!(model.predict(&x).unwrap(), vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn fit_is_deterministic() {
        let data = synthetic_housing(506, 13, 11);
        let a = LinearRegression::fit_dataset(&data).unwrap();
        let b = LinearRegression::fit_dataset(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn full_size_prediction_length() {
        let data = synthetic_housing(506, 13, 3);
        let model = LinearRegression::fit_dataset(&data).unwrap();
        assert_eq!(model.n_features(), 13);
        assert_eq!(model.predict(&data.features).unwrap().len(), 506);
    }

    #[test]
    fn refit_replaces_parameters() {
        let first = synthetic_housing(100, 3, 1);
        let second = synthetic_housing(80, 2, 2);

        let mut model = LinearRegression::fit_dataset(&first).unwrap();
        model.refit(&second.features, &second.target).unwrap();

        assert_eq!(model, LinearRegression::fit_dataset(&second).unwrap());
        assert_eq!(model.n_features(), 2);
    }

    #[test]
    fn wrong_width_is_a_shape_mismatch() {
        let data = synthetic_housing(50, 13, 4);
        let model = LinearRegression::fit_dataset(&data).unwrap();

        let wide = synthetic_housing(5, 14, 4);
        match model.predict(&wide.features) {
            Err(Error::ShapeMismatch { expected, found }) => {
                assert_eq!(expected, 13);
                assert_eq!(found, 14);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn permuted_columns_predict_the_same() {
        let data = synthetic_housing(40, 3, 9);
        let model = LinearRegression::fit_dataset(&data).unwrap();

        let mut order = data.features.names().to_vec();
        order.reverse();
        let permuted = data.features.reorder(&order).unwrap();

        assert_eq!(
            model.predict(&permuted).unwrap(),
            model.predict(&data.features).unwrap()
        );
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let x = table(vec![vec![1.0], vec![2.0]]);
        assert!(LinearRegression::fit(&x, &[1.0]).is_err());
    }

    #[test]
    fn collect_from_pairs() {
        let data = vec![
            (vec![1.0, 2.0], 8.0),
            (vec![2.0, 1.0], 9.0),
            (vec![1.0, 5.0], 5.0),
            (vec![2.0, 6.0], 4.0),
        ];

        let model: LinearRegression = data.iter().map(|(x, y)| (x, y)).collect();

        for (x, y) in &data {
            assert!((model.predict_row(x) - y).abs() < 1e-9);
        }
    }
}
