//! Load-once, predict-many scoring of a persisted model.
//!
//! [`Scorer`] follows the `init`/`run` convention of hosted scoring scripts: `init` loads the
//! model file once, `run` scores one request at a time. All state lives in a
//! [`ScoringContext`], which is read-only after construction and can be shared between threads.
//!
//! `run` never fails: errors come back in-band as [`ScoreResponse::Error`], so a bad request
//! does not take the serving loop down.

mod collector;
mod schema;

use std::sync::Arc;

use log::{info, warn};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::dataset::FeatureTable;
use crate::error::{Error, Result};
use crate::linear_model::LinearRegression;
use crate::persistence;

pub use self::collector::{collector_for, DataCollector, JsonLinesCollector, NoopCollector};
pub use self::schema::{ColumnSchema, InputSchema, OutputSchema, ServiceSchema};

/// Why a request could not be scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ShapeMismatch,
    UnknownFeature,
    TypeError,
    InvalidInput,
    ModelNotLoaded,
    Internal,
}

impl<'a> From<&'a Error> for FailureKind {
    fn from(e: &'a Error) -> Self {
        match e {
            Error::ShapeMismatch { .. } => FailureKind::ShapeMismatch,
            Error::UnknownFeature(_) => FailureKind::UnknownFeature,
            Error::TypeError(_) | Error::JsonError(_) => FailureKind::TypeError,
            Error::InvalidInput(_) => FailureKind::InvalidInput,
            Error::ModelNotLoaded => FailureKind::ModelNotLoaded,
            _ => FailureKind::Internal,
        }
    }
}

/// Outcome of one scoring request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreResponse {
    Ok { predictions: Vec<f64> },
    Error { kind: FailureKind, message: String },
}

impl ScoreResponse {
    fn failure(e: &Error) -> Self {
        ScoreResponse::Error {
            kind: e.into(),
            message: e.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            ScoreResponse::Ok { .. } => true,
            ScoreResponse::Error { .. } => false,
        }
    }

    pub fn predictions(&self) -> Option<&[f64]> {
        match self {
            ScoreResponse::Ok { predictions } => Some(predictions),
            ScoreResponse::Error { .. } => None,
        }
    }
}

/// A loaded model and its two collectors
pub struct ScoringContext {
    model: Arc<LinearRegression>,
    inputs: Box<dyn DataCollector>,
    predictions: Box<dyn DataCollector>,
}

impl ScoringContext {
    /// Load the model file named by `config` and set up the collectors.
    pub fn init(config: &Config) -> Result<Self> {
        let model = persistence::load(config.model_path())?;
        info!(
            "Scoring with {} features from {}",
            model.n_features(),
            config.model_path().display()
        );
        Ok(ScoringContext::new(
            model,
            collector_for(config, "inputs"),
            collector_for(config, "prediction"),
        ))
    }

    pub fn new(
        model: LinearRegression,
        inputs: Box<dyn DataCollector>,
        predictions: Box<dyn DataCollector>,
    ) -> Self {
        ScoringContext {
            model: Arc::new(model),
            inputs,
            predictions,
        }
    }

    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    /// Predict one value per row of `input` and archive input and output.
    pub fn run(&self, input: &FeatureTable) -> ScoreResponse {
        match self.model.predict(input) {
            Ok(predictions) => {
                if let Err(e) = self.inputs.collect(&input.to_records()) {
                    warn!("Could not collect scoring input: {}", e);
                }
                if let Err(e) = self.predictions.collect(&Value::from(predictions.clone())) {
                    warn!("Could not collect predictions: {}", e);
                }
                ScoreResponse::Ok { predictions }
            }
            Err(e) => {
                warn!("Scoring failed: {}", e);
                ScoreResponse::failure(&e)
            }
        }
    }

    /// Like [`run`](ScoringContext::run), for a JSON table in records or split orientation.
    pub fn run_json(&self, input: &Value) -> ScoreResponse {
        match FeatureTable::from_json(input) {
            Ok(table) => self.run(&table),
            Err(e) => {
                warn!("Rejected scoring request: {}", e);
                ScoreResponse::failure(&e)
            }
        }
    }

    pub fn schema(&self) -> ServiceSchema {
        ServiceSchema::for_model(&self.model)
    }
}

/// The `init`/`run` entry points. Uninitialized until `init` succeeds.
#[derive(Default)]
pub struct Scorer {
    context: Option<ScoringContext>,
}

impl Scorer {
    pub fn new() -> Self {
        Scorer { context: None }
    }

    /// Load the persisted model. On failure the scorer stays (or becomes) uninitialized.
    pub fn init(&mut self, config: &Config) -> Result<()> {
        self.context = None;
        self.context = Some(ScoringContext::init(config)?);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Option<&ScoringContext> {
        self.context.as_ref()
    }

    pub fn run(&self, input: &FeatureTable) -> ScoreResponse {
        match self.context {
            Some(ref ctx) => ctx.run(input),
            None => ScoreResponse::failure(&Error::ModelNotLoaded),
        }
    }

    pub fn run_json(&self, input: &Value) -> ScoreResponse {
        match self.context {
            Some(ref ctx) => ctx.run_json(input),
            None => ScoreResponse::failure(&Error::ModelNotLoaded),
        }
    }

    /// The request/response description; `None` before `init`
    pub fn schema(&self) -> Option<ServiceSchema> {
        self.context.as_ref().map(ScoringContext::schema)
    }
}
