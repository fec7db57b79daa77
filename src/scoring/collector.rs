//! Side channels that archive scoring inputs and predictions.
//!
//! Collection is best effort: callers log a failed `collect` and carry on.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::Result;
use crate::file_lock::ExclusiveLock;

/// Receives one record per scoring call
pub trait DataCollector: Send + Sync {
    fn collect(&self, record: &Value) -> Result<()>;
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCollector;

impl DataCollector for NoopCollector {
    fn collect(&self, _record: &Value) -> Result<()> {
        Ok(())
    }
}

/// Appends each record as one JSON line to `<dir>/<model>.<identifier>.jsonl`
#[derive(Debug, Clone)]
pub struct JsonLinesCollector {
    path: PathBuf,
    identifier: String,
}

impl JsonLinesCollector {
    pub fn new<P: AsRef<Path>>(dir: P, model_name: &str, identifier: &str) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(JsonLinesCollector {
            path: dir.join(format!("{}.{}.jsonl", model_name, identifier)),
            identifier: identifier.to_owned(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataCollector for JsonLinesCollector {
    fn collect(&self, record: &Value) -> Result<()> {
        let mut line = serde_json::to_vec(&json!({
            "identifier": self.identifier,
            "data": record,
        }))?;
        line.push(b'\n');

        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut file = ExclusiveLock::new(f)?;
        file.write_all(&line)?;
        debug!("Collected {} record into {}", self.identifier, self.path.display());
        Ok(())
    }
}

/// The collector for `identifier` as configured: a JSON-lines file when data collection is on,
/// otherwise (or if the collector directory cannot be created) a no-op.
pub fn collector_for(config: &Config, identifier: &str) -> Box<dyn DataCollector> {
    if !config.data_collection {
        return Box::new(NoopCollector);
    }

    match JsonLinesCollector::new(&config.collector_dir, &config.model_file, identifier) {
        Ok(c) => Box::new(c),
        Err(e) => {
            warn!(
                "Data collection disabled for {}: cannot use {}: {}",
                identifier,
                config.collector_dir.display(),
                e
            );
            Box::new(NoopCollector)
        }
    }
}
