extern crate housing_ols;

use housing_ols::{pipeline, Config, LogRunLogger};
use time::PreciseTime;

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();

    let config = Config::load().unwrap();

    let start = PreciseTime::now();
    let report = pipeline::run(&config, &LogRunLogger).unwrap();
    let end = PreciseTime::now();

    println!("ESTIMATED INTERCEPT COEFFICIENT: {}", report.intercept);
    println!("NUMBER OF COEFFICIENTS:          {}", report.n_coefficients);
    println!("First 5 home values:  {:?}", report.first_targets);
    println!("First 5 predictions:  {:?}", report.first_predictions);

    let metrics = &report.evaluation.metrics;
    println!("MSE w/ TRAIN data: {}", metrics.train_mse);
    println!("MSE w/ TEST data:  {}", metrics.test_mse);
    println!("R-Square:          {}", metrics.explained_variance);

    println!("Model written to {}", report.model_path.display());
    println!("Scatter data written to {}", report.scatter_path.display());
    println!("Finished in {}", start.to(end));
}
