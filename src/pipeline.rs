//! The training run: fit on all rows, export, re-import, evaluate on a held-out split, report.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde_derive::{Deserialize, Serialize};

use crate::config::Config;
use crate::dataset::DataSet;
use crate::error::Result;
use crate::housing::load_boston;
use crate::linear_model::LinearRegression;
use crate::measure_accumulator::round_to;
use crate::persistence;
use crate::run_logger::RunLogger;
use crate::tasks::{Evaluation, SupervisedRegression};

const PREVIEW_ROWS: usize = 5;

/// What a training run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// intercept of the model fitted on all rows, rounded to 2 decimals
    pub intercept: f64,
    pub n_coefficients: usize,
    pub first_targets: Vec<f64>,
    pub first_predictions: Vec<f64>,
    pub model_path: PathBuf,
    pub scatter_path: PathBuf,
    pub evaluation: Evaluation,
}

/// Points of the predicted-vs-actual plot over the test rows
#[derive(Debug, Serialize, Deserialize)]
struct ScatterData {
    title: String,
    x_label: String,
    y_label: String,
    points: Vec<(f64, f64)>,
}

/// Load the housing data as configured and run the pipeline on it
pub fn run(config: &Config, logger: &dyn RunLogger) -> Result<PipelineReport> {
    let data = load_boston(config)?;
    run_on(data, config, logger)
}

/// Run the pipeline on an already loaded data set
pub fn run_on(data: DataSet, config: &Config, logger: &dyn RunLogger) -> Result<PipelineReport> {
    fs::create_dir_all(&config.output_dir)?;

    let full = LinearRegression::fit_dataset(&data)?;
    let predictions = full.predict(&data.features)?;
    let n_preview = PREVIEW_ROWS.min(data.n_rows());

    let report_intercept = round_to(full.intercept(), 2);
    info!("Estimated intercept: {}", report_intercept);
    info!("Number of coefficients: {}", full.n_features());
    info!("First home values: {:?}", &data.target[..n_preview]);
    info!("First predictions: {:?}", &predictions[..n_preview]);

    let model_path = config.model_path();
    persistence::save(&full, &model_path)?;
    let mut reloaded = persistence::load(&model_path)?;

    let first_targets = data.target[..n_preview].to_vec();
    let task = SupervisedRegression::from_config("Boston housing", data, config)?;
    let evaluation = task.evaluate(&mut reloaded)?;
    evaluation.metrics.report(logger);

    let scatter_path = config.scatter_path();
    write_scatter(&evaluation, &scatter_path)?;

    Ok(PipelineReport {
        intercept: report_intercept,
        n_coefficients: full.n_features(),
        first_targets,
        first_predictions: predictions[..n_preview].to_vec(),
        model_path,
        scatter_path,
        evaluation,
    })
}

fn write_scatter(evaluation: &Evaluation, path: &Path) -> Result<()> {
    let scatter = ScatterData {
        title: "Prices vs Predicted prices".to_owned(),
        x_label: "Prices".to_owned(),
        y_label: "Predicted prices".to_owned(),
        points: evaluation.scatter(),
    };
    fs::write(path, serde_json::to_vec_pretty(&scatter)?)?;
    info!("Wrote {} scatter points to {}", scatter.points.len(), path.display());
    Ok(())
}
