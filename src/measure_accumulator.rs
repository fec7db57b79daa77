//! Measure accumulators are summaries of model performance, such as regression error or
//! explained variance.

use std::marker::PhantomData;

use num_traits::AsPrimitive;

use crate::error::{Error, Result};

/// Trait implemented by performance measures
pub trait MeasureAccumulator<T> {
    /// initialize new measure
    fn new() -> Self;

    /// update with one prediction
    fn update_one(&mut self, known: &T, pred: &T);

    /// get resulting performance; fails if the measure is undefined for the data seen
    fn result(&self) -> Result<f64>;

    /// update with multiple predictions
    fn update<I: Iterator<Item = T>>(&mut self, known: I, predicted: I) {
        for (k, p) in known.zip(predicted) {
            self.update_one(&k, &p)
        }
    }
}

/// Running mean and variance (Welford)
#[derive(Debug, Clone, Copy, Default)]
struct RunningMoments {
    n: usize,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    fn update(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// population variance
    fn variance(&self) -> f64 {
        self.m2 / self.n as f64
    }
}

/// Mean Squared Error
#[derive(Debug)]
pub struct MeanSquaredError<T> {
    sum_of_squares: f64,
    n: usize,
    _t: PhantomData<T>,
}

impl<T> MeasureAccumulator<T> for MeanSquaredError<T>
where
    T: AsPrimitive<f64>,
{
    fn new() -> Self {
        MeanSquaredError {
            sum_of_squares: 0.0,
            n: 0,
            _t: PhantomData,
        }
    }

    fn update_one(&mut self, known: &T, pred: &T) {
        let diff = known.as_() - pred.as_();
        self.sum_of_squares += diff * diff;
        self.n += 1;
    }

    fn result(&self) -> Result<f64> {
        if self.n == 0 {
            return Err(Error::Degenerate("mean squared error of zero samples".into()));
        }
        Ok(self.sum_of_squares / self.n as f64)
    }
}

/// Explained variance: `1 - Var(known - pred) / Var(known)`
///
/// Undefined, and reported as an error, when the known values have zero variance.
#[derive(Debug)]
pub struct ExplainedVariance<T> {
    known: RunningMoments,
    residual: RunningMoments,
    _t: PhantomData<T>,
}

impl<T> MeasureAccumulator<T> for ExplainedVariance<T>
where
    T: AsPrimitive<f64>,
{
    fn new() -> Self {
        ExplainedVariance {
            known: RunningMoments::default(),
            residual: RunningMoments::default(),
            _t: PhantomData,
        }
    }

    fn update_one(&mut self, known: &T, pred: &T) {
        let k = known.as_();
        self.known.update(k);
        self.residual.update(k - pred.as_());
    }

    fn result(&self) -> Result<f64> {
        if self.known.n == 0 {
            return Err(Error::Degenerate("explained variance of zero samples".into()));
        }
        let var_known = self.known.variance();
        if var_known == 0.0 {
            return Err(Error::Degenerate(
                "explained variance is undefined for a constant target".into(),
            ));
        }
        Ok(1.0 - self.residual.variance() / var_known)
    }
}

/// Round to `decimals` decimal places
///
/// Values that cannot be scaled to `decimals` places within `f64` range are already as precise
/// as `f64` gets and are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals.min(i32::MAX as u32) as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure<M: MeasureAccumulator<f64>>(known: &[f64], pred: &[f64]) -> Result<f64> {
        let mut m = M::new();
        m.update(known.iter().cloned(), pred.iter().cloned());
        m.result()
    }

    #[test]
    fn mse() {
        let r = measure::<MeanSquaredError<f64>>(&[1.0, 2.0, 3.0], &[1.0, 4.0, 2.0]).unwrap();
        assert!((r - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn mse_of_nothing_is_an_error() {
        assert!(measure::<MeanSquaredError<f64>>(&[], &[]).is_err());
    }

    #[test]
    fn perfect_prediction_explains_everything() {
        let y = [3.0, -0.5, 2.0, 7.0];
        assert_eq!(measure::<ExplainedVariance<f64>>(&y, &y).unwrap(), 1.0);
    }

    #[test]
    fn explained_variance_reference_value() {
        // 1 - Var([0.5, -0.5, 0, -1]) / Var([3, -0.5, 2, 7]) = 1 - 0.3125 / 7.296875
        let r = measure::<ExplainedVariance<f64>>(&[3.0, -0.5, 2.0, 7.0], &[2.5, 0.0, 2.0, 8.0])
            .unwrap();
        assert!((r - 0.957_173_447_537_473_2).abs() < 1e-12);
    }

    #[test]
    fn constant_bias_is_not_penalized() {
        let known = [1.0, 2.0, 3.0];
        let shifted = [11.0, 12.0, 13.0];
        let r = measure::<ExplainedVariance<f64>>(&known, &shifted).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_target_is_degenerate() {
        match measure::<ExplainedVariance<f64>>(&[4.0, 4.0, 4.0], &[3.0, 4.0, 5.0]) {
            Err(Error::Degenerate(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn integer_inputs() {
        let mut m = <MeanSquaredError<i32> as MeasureAccumulator<i32>>::new();
        m.update_one(&3, &1);
        assert_eq!(m.result().unwrap(), 4.0);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(21.894_831_316_5, 4), 21.8948);
        assert_eq!(round_to(0.6955, 2), 0.7);
        assert_eq!(round_to(-1.23456, 0), -1.0);
    }

    #[test]
    fn rounding_past_f64_range_keeps_the_value() {
        assert_eq!(round_to(1.5, 400), 1.5);
        assert_eq!(round_to(0.25, u32::MAX), 0.25);
        assert_eq!(round_to(0.0, 400), 0.0);
        assert_eq!(round_to(1e10, 300), 1e10);
        assert_eq!(round_to(-2.5e-3, 400), -2.5e-3);
    }
}
