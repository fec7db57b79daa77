//! Pipeline and scoring configuration.
//!
//! Every field has a default. A JSON file named by `HOUSING_OLS_CONFIG` may override any subset
//! of them, and `HOUSING_OLS_*` environment variables override the file.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV: &str = "HOUSING_OLS_CONFIG";

const ENV_PREFIX: &str = "HOUSING_OLS_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory receiving the model file and the scatter data
    pub output_dir: PathBuf,

    /// File name of the persisted model inside `output_dir`
    pub model_file: String,

    /// Read the dataset from this ARFF file instead of downloading it
    pub dataset_path: Option<PathBuf>,

    /// OpenML data set id of the Boston housing data
    pub openml_data_id: u32,

    /// Name of the target column
    pub target: String,

    /// Fraction of rows held out for testing
    pub test_size: f64,

    /// Seed of the train/test shuffle
    pub seed: u64,

    /// Decimal places the metrics are rounded to
    pub decimals: u32,

    /// Record scoring inputs and predictions
    pub data_collection: bool,

    /// Directory receiving collected records
    pub collector_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from("./outputs"),
            model_file: "model.json".to_owned(),
            dataset_path: None,
            openml_data_id: 531,
            target: "MEDV".to_owned(),
            test_size: 0.33,
            seed: 5,
            decimals: 4,
            data_collection: false,
            collector_dir: PathBuf::from("./outputs/collected"),
        }
    }
}

impl Config {
    /// Defaults, then the file named by `HOUSING_OLS_CONFIG` (if set), then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => Config::from_file(PathBuf::from(path))?,
            None => Config::default(),
        };
        config.apply_overrides(|key| env::var(format!("{}{}", ENV_PREFIX, key)).ok())?;
        Ok(config)
    }

    pub fn from_file<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let raw = fs::read_to_string(&path)?;
        Config::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Full path of the persisted model
    pub fn model_path(&self) -> PathBuf {
        self.output_dir.join(&self.model_file)
    }

    /// Full path of the scatter data
    pub fn scatter_path(&self) -> PathBuf {
        self.output_dir.join("scatter.json")
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("MODEL_FILE") {
            self.model_file = v;
        }
        if let Some(v) = lookup("DATASET_PATH") {
            self.dataset_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("OPENML_DATA_ID") {
            self.openml_data_id = parse_override("OPENML_DATA_ID", &v)?;
        }
        if let Some(v) = lookup("TARGET") {
            self.target = v;
        }
        if let Some(v) = lookup("TEST_SIZE") {
            self.test_size = parse_override("TEST_SIZE", &v)?;
        }
        if let Some(v) = lookup("SEED") {
            self.seed = parse_override("SEED", &v)?;
        }
        if let Some(v) = lookup("DECIMALS") {
            self.decimals = parse_override("DECIMALS", &v)?;
        }
        if let Some(v) = lookup("DATA_COLLECTION") {
            self.data_collection = parse_flag(&v);
        }
        if let Some(v) = lookup("COLLECTOR_DIR") {
            self.collector_dir = PathBuf::from(v);
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::InvalidInput(format!("{}{} has invalid value {:?}", ENV_PREFIX, key, value))
    })
}

fn parse_flag(value: &str) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        _ => false,
    }
}
