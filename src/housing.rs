//! The Boston housing data set: 506 census tracts, 13 numeric features and the median home
//! value `MEDV` (in $1000s) as target.

use std::fs;

use log::{info, warn};

use crate::config::Config;
use crate::dataset::DataSet;
use crate::error::{Error, Result};
use crate::openml_api::DataDescription;

/// Feature columns, in the order the data set declares them
pub const BOSTON_FEATURES: [&str; 13] = [
    "CRIM", "ZN", "INDUS", "CHAS", "NOX", "RM", "AGE", "DIS", "RAD", "TAX", "PTRATIO", "B",
    "LSTAT",
];

/// Load the data set from `config.dataset_path` if given, otherwise from OpenML (cached).
///
/// The result always has the 13 feature columns of [`BOSTON_FEATURES`], in that order.
pub fn load_boston(config: &Config) -> Result<DataSet> {
    let text = match config.dataset_path {
        Some(ref path) => {
            info!("Reading data set from {}", path.display());
            fs::read_to_string(path)?
        }
        None => {
            let description = DataDescription::from_openml(config.openml_data_id)?;
            match description.default_target {
                Some(ref t) if t != &config.target => warn!(
                    "Data set {} declares target {}, using {}",
                    description.name, t, config.target
                ),
                _ => {}
            }
            description.fetch_arff()?
        }
    };

    let data = DataSet::from_arff(&text, &config.target)?;
    check_schema(&data)?;

    info!(
        "Loaded {} rows, {} features, target {}",
        data.n_rows(),
        data.features.n_cols(),
        data.target_name
    );
    Ok(data)
}

fn check_schema(data: &DataSet) -> Result<()> {
    let names = data.features.names();
    if names.len() != BOSTON_FEATURES.len() {
        return Err(Error::DatasetSchema(format!(
            "expected {} features, found {}",
            BOSTON_FEATURES.len(),
            names.len()
        )));
    }
    for (found, expected) in names.iter().zip(BOSTON_FEATURES.iter()) {
        if !found.eq_ignore_ascii_case(expected) {
            return Err(Error::DatasetSchema(format!(
                "expected feature {}, found {}",
                expected, found
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scratch_dir;

    fn boston_like_arff(rows: &[[f64; 14]]) -> String {
        let mut text = String::from("@relation boston\n");
        for name in BOSTON_FEATURES.iter().chain(["MEDV"].iter()) {
            text.push_str(&format!("@attribute {} numeric\n", name));
        }
        text.push_str("@data\n");
        for row in rows {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            text.push_str(&cells.join(","));
            text.push('\n');
        }
        text
    }

    #[test]
    fn local_file_is_loaded() {
        let dir = scratch_dir("housing");
        let path = dir.join("boston.arff");
        fs::write(
            &path,
            boston_like_arff(&[
                [
                    0.00632, 18.0, 2.31, 0.0, 0.538, 6.575, 65.2, 4.09, 1.0, 296.0, 15.3, 396.9,
                    4.98, 24.0,
                ],
                [
                    0.02731, 0.0, 7.07, 0.0, 0.469, 6.421, 78.9, 4.9671, 2.0, 242.0, 17.8, 396.9,
                    9.14, 21.6,
                ],
            ]),
        )
        .unwrap();

        let config = Config {
            dataset_path: Some(path),
            ..Config::default()
        };
        let data = load_boston(&config).unwrap();

        assert_eq!(data.n_rows(), 2);
        assert_eq!(data.features.n_cols(), 13);
        assert_eq!(data.target, vec![24.0, 21.6]);
        assert_eq!(data.features.row(1)[5], 6.421);
    }

    #[test]
    fn missing_local_file_is_fatal() {
        let dir = scratch_dir("housing-missing");
        let config = Config {
            dataset_path: Some(dir.join("nope.arff")),
            ..Config::default()
        };
        assert!(load_boston(&config).is_err());
    }

    #[test]
    fn foreign_columns_are_rejected() {
        let text = "@relation other\n@attribute a numeric\n@attribute MEDV numeric\n@data\n1,2\n";
        let data = DataSet::from_arff(text, "MEDV").unwrap();
        match check_schema(&data) {
            Err(Error::DatasetSchema(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
