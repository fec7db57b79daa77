//! Linear regression estimators.

mod ordinary_least_squares;

pub use self::ordinary_least_squares::LinearRegression;
