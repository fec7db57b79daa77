use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;
use std::result::Result as StdResult;
use std::string::FromUtf8Error;

use app_dirs::AppDirsError;
use arff::Error as ArffError;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;

pub type Result<T> = StdResult<T, Error>;

#[derive(Debug)]
pub enum Error {
    IoError(IoError),
    Utf8Error(FromUtf8Error),
    HttpsError(ReqwestError),
    JsonError(JsonError),
    ArffError(ArffError),
    AppDirsError(AppDirsError),

    /// The data source answered, but not with the expected layout.
    DatasetSchema(String),

    /// A table does not have the number of columns the model was fitted on.
    ShapeMismatch { expected: usize, found: usize },

    /// A table column that the model does not know, or a model feature the table lacks.
    UnknownFeature(String),

    /// A request cell that is not a number.
    TypeError(String),

    /// Persisted model bytes that do not describe a model.
    DecodeError(String),

    /// A statistic that is undefined for the given data (e.g. zero variance).
    Degenerate(String),

    /// Train/test split parameters that cannot produce two non-empty partitions.
    InvalidSplit(String),

    /// Length mismatch between features and target, or empty training data.
    InvalidInput(String),

    /// Scoring was attempted before a model was loaded.
    ModelNotLoaded,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "io error: {}", e),
            Error::Utf8Error(e) => write!(f, "invalid utf-8: {}", e),
            Error::HttpsError(e) => write!(f, "download failed: {}", e),
            Error::JsonError(e) => write!(f, "json error: {}", e),
            Error::ArffError(e) => write!(f, "arff error: {:?}", e),
            Error::AppDirsError(e) => write!(f, "cache directory unavailable: {}", e),
            Error::DatasetSchema(msg) => write!(f, "unexpected dataset layout: {}", msg),
            Error::ShapeMismatch { expected, found } => write!(
                f,
                "shape mismatch: model expects {} features, input has {}",
                expected, found
            ),
            Error::UnknownFeature(name) => write!(f, "unknown feature: {}", name),
            Error::TypeError(msg) => write!(f, "type error: {}", msg),
            Error::DecodeError(msg) => write!(f, "cannot decode model: {}", msg),
            Error::Degenerate(msg) => write!(f, "degenerate statistic: {}", msg),
            Error::InvalidSplit(msg) => write!(f, "invalid split: {}", msg),
            Error::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Error::ModelNotLoaded => write!(f, "no model loaded, call init() first"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::Utf8Error(e) => Some(e),
            Error::HttpsError(e) => Some(e),
            Error::JsonError(e) => Some(e),
            Error::AppDirsError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::IoError(e)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(e: FromUtf8Error) -> Self {
        Error::Utf8Error(e)
    }
}

impl From<ReqwestError> for Error {
    fn from(e: ReqwestError) -> Self {
        Error::HttpsError(e)
    }
}

impl From<JsonError> for Error {
    fn from(e: JsonError) -> Self {
        Error::JsonError(e)
    }
}

impl From<ArffError> for Error {
    fn from(e: ArffError) -> Self {
        Error::ArffError(e)
    }
}

impl From<AppDirsError> for Error {
    fn from(e: AppDirsError) -> Self {
        match e {
            AppDirsError::Io(e) => Error::IoError(e),
            _ => Error::AppDirsError(e),
        }
    }
}
