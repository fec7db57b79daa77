//! Reporting of named scalar run metrics

use log::info;

/// Receives `log(name, value)` calls for run metrics
pub trait RunLogger {
    fn log(&self, name: &str, value: f64);
}

/// Writes metrics through the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRunLogger;

impl RunLogger for LogRunLogger {
    fn log(&self, name: &str, value: f64) {
        info!(target: "housing_ols::metrics", "{}: {}", name, value);
    }
}

/// Keeps every metric in memory, in call order
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: std::sync::Mutex<Vec<(String, f64)>>,
}

impl RecordingLogger {
    pub fn records(&self) -> Vec<(String, f64)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RunLogger for RecordingLogger {
    fn log(&self, name: &str, value: f64) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((name.to_owned(), value));
    }
}
