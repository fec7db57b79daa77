//! Machine-readable description of what `run` accepts and returns

use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::linear_model::LinearRegression;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSchema {
    pub input: InputSchema,
    pub output: OutputSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    pub name: String,
    /// accepted JSON layouts of the table
    pub orientations: Vec<String>,
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub dtype: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub name: String,
    pub dtype: String,
    /// one value per input row
    pub shape: Vec<String>,
}

impl ServiceSchema {
    pub fn for_model(model: &LinearRegression) -> Self {
        ServiceSchema {
            input: InputSchema {
                name: "input_df".to_owned(),
                orientations: vec!["records".to_owned(), "split".to_owned()],
                columns: model
                    .feature_names()
                    .iter()
                    .map(|name| ColumnSchema {
                        name: name.clone(),
                        dtype: "float64".to_owned(),
                    })
                    .collect(),
            },
            output: OutputSchema {
                name: "predictions".to_owned(),
                dtype: "float64".to_owned(),
                shape: vec!["n_rows".to_owned()],
            },
        }
    }

    /// A one-row request in records orientation with every feature set to zero
    pub fn sample_input(&self) -> Value {
        let row: Map<String, Value> = self
            .input
            .columns
            .iter()
            .map(|c| (c.name.clone(), Value::from(0.0)))
            .collect();
        Value::Array(vec![Value::Object(row)])
    }
}
