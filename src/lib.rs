//! Ordinary least squares on the Boston housing data.
//!
//! The crate covers a small train-and-serve workflow:
//!
//! - [`housing::load_boston`] fetches the data set from OpenML (or reads a local ARFF file),
//! - [`linear_model::LinearRegression`] fits and predicts,
//! - [`persistence`] writes and reads the fitted model,
//! - [`tasks::SupervisedRegression`] evaluates a model on a seeded train/test split,
//! - [`pipeline::run`] strings these together and reports the metrics,
//! - [`scoring::Scorer`] serves a persisted model behind `init`/`run`.

pub mod config;
pub mod dataset;
pub mod error;
mod file_lock;
pub mod housing;
pub mod linear_model;
pub mod measure_accumulator;
mod openml_api;
pub mod persistence;
pub mod pipeline;
pub mod procedures;
pub mod run_logger;
pub mod scoring;
pub mod tasks;

#[cfg(test)]
mod testing;

pub use crate::config::Config;
pub use crate::dataset::{DataSet, FeatureTable};
pub use crate::error::{Error, Result};
pub use crate::linear_model::LinearRegression;
pub use crate::measure_accumulator::{ExplainedVariance, MeanSquaredError};
pub use crate::run_logger::{LogRunLogger, RunLogger};
pub use crate::scoring::{ScoreResponse, Scorer, ScoringContext};
pub use crate::tasks::SupervisedRegression;

pub mod prelude {
    pub use crate::measure_accumulator::MeasureAccumulator;
    pub use crate::procedures::Procedure;
    pub use crate::run_logger::RunLogger;
}
