//! Persisted model format
//!
//! A model is stored as one JSON document:
//!
//! ```text
//! {"format": "housing-ols/linear-regression", "version": 1,
//!  "feature_names": [...], "coefficients": [...], "intercept": ...}
//! ```
//!
//! Floats are written in shortest round-trip form and parsed exactly, so a reloaded model makes
//! bit-identical predictions.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use log::info;
use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::file_lock::{ExclusiveLock, SharedLock};
use crate::linear_model::LinearRegression;

const FORMAT: &str = "housing-ols/linear-regression";
const VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PersistedModel {
    format: String,
    version: u32,
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Encode a model. Fails if a parameter is not finite, since JSON cannot carry it.
pub fn serialize(model: &LinearRegression) -> Result<Vec<u8>> {
    if !model.intercept().is_finite() || model.coefficients().iter().any(|c| !c.is_finite()) {
        return Err(Error::InvalidInput(
            "model has non-finite parameters and cannot be persisted".into(),
        ));
    }

    let persisted = PersistedModel {
        format: FORMAT.to_owned(),
        version: VERSION,
        feature_names: model.feature_names().to_vec(),
        coefficients: model.coefficients().to_vec(),
        intercept: model.intercept(),
    };
    Ok(serde_json::to_vec_pretty(&persisted)?)
}

/// Decode a model written by [`serialize`]
pub fn deserialize(bytes: &[u8]) -> Result<LinearRegression> {
    let persisted: PersistedModel =
        serde_json::from_slice(bytes).map_err(|e| Error::DecodeError(e.to_string()))?;

    if persisted.format != FORMAT {
        return Err(Error::DecodeError(format!(
            "unknown format {:?}",
            persisted.format
        )));
    }
    if persisted.version != VERSION {
        return Err(Error::DecodeError(format!(
            "unsupported version {}",
            persisted.version
        )));
    }

    LinearRegression::from_parts(
        persisted.feature_names,
        persisted.coefficients,
        persisted.intercept,
    )
}

/// Write a model to `path`, creating the parent directory if needed
pub fn save<P: AsRef<Path>>(model: &LinearRegression, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = serialize(model)?;

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let f = OpenOptions::new().create(true).write(true).open(path)?;
    let mut file = ExclusiveLock::new(f)?;
    file.set_len(0)?;
    file.write_all(&bytes)?;
    file.flush()?;

    info!("Exported model to {}", path.display());
    Ok(())
}

/// Read a model from `path`
pub fn load<P: AsRef<Path>>(path: P) -> Result<LinearRegression> {
    let path = path.as_ref();
    let mut file = SharedLock::new(File::open(path)?)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let model = deserialize(&bytes)?;
    info!("Imported model from {}", path.display());
    Ok(model)
}
