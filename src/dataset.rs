use arff::dynamic::{DataSet as ArffDataSet, Value as ArffValue};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Named numeric columns over a fixed number of rows, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    names: Vec<String>,
    n_rows: usize,
    data: Vec<f64>,
}

/// Split-orientation request body: `{"columns": [...], "data": [[...], ...]}`
#[derive(Debug, Serialize, Deserialize)]
struct SplitTable {
    columns: Vec<String>,
    data: Vec<Vec<Value>>,
}

impl FeatureTable {
    /// build a table from column names and row-major values
    pub fn new(names: Vec<String>, data: Vec<f64>) -> Result<Self> {
        let n_cols = names.len();
        if n_cols == 0 {
            if !data.is_empty() {
                return Err(Error::InvalidInput("values given for a table without columns".into()));
            }
            return Ok(FeatureTable { names, n_rows: 0, data });
        }
        if data.len() % n_cols != 0 {
            return Err(Error::InvalidInput(format!(
                "{} values do not fill rows of {} columns",
                data.len(),
                n_cols
            )));
        }
        Ok(FeatureTable {
            n_rows: data.len() / n_cols,
            names,
            data,
        })
    }

    pub fn from_rows<S: Into<String>>(names: Vec<S>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(rows.len() * names.len());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(Error::InvalidInput(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    names.len()
                )));
            }
            data.extend(row);
        }
        Ok(FeatureTable {
            names,
            n_rows,
            data,
        })
    }

    /// Parse a JSON request in records orientation (`[{"a": 1.0, ...}, ...]`) or split
    /// orientation (`{"columns": [...], "data": [[...], ...]}`).
    ///
    /// In records orientation the columns are the keys of the first record, in map order; later
    /// records must carry exactly the same keys. Scoring aligns columns by name, so the order
    /// does not matter there.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(records) => FeatureTable::from_records(records),
            Value::Object(_) => {
                let split: SplitTable = serde_json::from_value(value.clone())?;
                let mut rows = Vec::with_capacity(split.data.len());
                for (i, row) in split.data.iter().enumerate() {
                    if row.len() != split.columns.len() {
                        return Err(Error::InvalidInput(format!(
                            "row {} has {} values, expected {}",
                            i,
                            row.len(),
                            split.columns.len()
                        )));
                    }
                    let values = row
                        .iter()
                        .zip(&split.columns)
                        .map(|(v, name)| numeric_cell(v, i, name))
                        .collect::<Result<Vec<_>>>()?;
                    rows.push(values);
                }
                FeatureTable::from_rows(split.columns, rows)
            }
            other => Err(Error::TypeError(format!(
                "expected an array of records or a split table, got {}",
                json_kind(other)
            ))),
        }
    }

    fn from_records(records: &[Value]) -> Result<Self> {
        let names: Vec<String> = match records.first() {
            None => return Ok(FeatureTable::default()),
            Some(Value::Object(first)) => first.keys().cloned().collect(),
            Some(other) => {
                return Err(Error::TypeError(format!(
                    "record 0 is {}, expected an object",
                    json_kind(other)
                )))
            }
        };

        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let obj = record.as_object().ok_or_else(|| {
                Error::TypeError(format!("record {} is {}, expected an object", i, json_kind(record)))
            })?;
            if obj.len() != names.len() {
                return Err(Error::ShapeMismatch {
                    expected: names.len(),
                    found: obj.len(),
                });
            }
            let row = names
                .iter()
                .map(|name| match obj.get(name) {
                    Some(v) => numeric_cell(v, i, name),
                    None => Err(Error::UnknownFeature(format!("record {} lacks {}", i, name))),
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }
        FeatureTable::from_rows(names, rows)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    /// values of one row, in column order
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.n_cols();
        &self.data[i * n..(i + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    /// new table holding the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> FeatureTable {
        let mut data = Vec::with_capacity(indices.len() * self.n_cols());
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        FeatureTable {
            names: self.names.clone(),
            n_rows: indices.len(),
            data,
        }
    }

    /// Reorder the columns to `order`. Every name in `order` must be present and the table
    /// must not carry additional columns.
    pub fn reorder(&self, order: &[String]) -> Result<FeatureTable> {
        if order.len() != self.n_cols() {
            return Err(Error::ShapeMismatch {
                expected: order.len(),
                found: self.n_cols(),
            });
        }
        if order == self.names.as_slice() {
            return Ok(self.clone());
        }

        let positions = order
            .iter()
            .map(|name| {
                self.names
                    .iter()
                    .position(|n| n == name)
                    .ok_or_else(|| Error::UnknownFeature(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut data = Vec::with_capacity(self.data.len());
        for row in self.rows() {
            data.extend(positions.iter().map(|&p| row[p]));
        }
        Ok(FeatureTable {
            names: order.to_vec(),
            n_rows: self.n_rows,
            data,
        })
    }

    /// JSON records, one object per row
    pub fn to_records(&self) -> Value {
        Value::Array(
            self.rows()
                .map(|row| {
                    Value::Object(
                        self.names
                            .iter()
                            .cloned()
                            .zip(row.iter().map(|&v| Value::from(v)))
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

impl Default for FeatureTable {
    fn default() -> Self {
        FeatureTable {
            names: Vec::new(),
            n_rows: 0,
            data: Vec::new(),
        }
    }
}

fn numeric_cell(v: &Value, row: usize, column: &str) -> Result<f64> {
    v.as_f64().ok_or_else(|| {
        Error::TypeError(format!(
            "row {}, column {}: expected a number, got {}",
            row,
            column,
            json_kind(v)
        ))
    })
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A feature table together with its target column
#[derive(Debug, Clone)]
pub struct DataSet {
    pub features: FeatureTable,
    pub target: Vec<f64>,
    pub target_name: String,
}

impl DataSet {
    pub fn new(features: FeatureTable, target: Vec<f64>, target_name: String) -> Result<Self> {
        if features.n_rows() != target.len() {
            return Err(Error::InvalidInput(format!(
                "{} feature rows but {} target values",
                features.n_rows(),
                target.len()
            )));
        }
        Ok(DataSet {
            features,
            target,
            target_name,
        })
    }

    /// Parse ARFF text and split off the `target` column.
    ///
    /// Numeric attributes are taken as they are. Nominal attributes must have numeric labels
    /// (`{0,1}`, `{'1','2','24'}`); their cells become the label's value, not its position in
    /// the category list. Any other attribute type is a schema error.
    pub fn from_arff(text: &str, target: &str) -> Result<Self> {
        let arff = ArffDataSet::from_str(text)?;
        if !arff.col_names().any(|n| n == target) {
            return Err(Error::DatasetSchema(format!("no target column {}", target)));
        }

        let (dx, dy) = arff.split_one(target);

        let feature_names: Vec<String> = dx.col_names().map(str::to_owned).collect();
        let rows = (0..dx.n_rows())
            .map(|i| {
                (0..dx.n_cols())
                    .map(|j| arff_cell(dx.item(i, j), i, dx.col_name(j)))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        let y = (0..dy.n_rows())
            .map(|i| arff_cell(dy.item(i, 0), i, target))
            .collect::<Result<Vec<f64>>>()?;

        DataSet::new(FeatureTable::from_rows(feature_names, rows)?, y, target.to_owned())
    }

    pub fn n_rows(&self) -> usize {
        self.target.len()
    }

    /// the rows at `indices`, features and target alike
    pub fn subset(&self, indices: &[usize]) -> DataSet {
        DataSet {
            features: self.features.select_rows(indices),
            target: indices.iter().map(|&i| self.target[i]).collect(),
            target_name: self.target_name.clone(),
        }
    }
}

fn arff_cell(value: ArffValue, row: usize, column: &str) -> Result<f64> {
    match value {
        ArffValue::Nominal(i, categories) => {
            let label = categories[i].trim_matches(&['\'', '"'][..]);
            label.parse().map_err(|_| {
                Error::DatasetSchema(format!(
                    "row {}, column {}: nominal value {} is not a number",
                    row, column, label
                ))
            })
        }
        ArffValue::String(s) => Err(Error::DatasetSchema(format!(
            "row {}, column {}: string value {} is not a number",
            row, column, s
        ))),
        other => Ok(other.as_f64()?),
    }
}
