//! Error types for the expense analyzer.

use crate::amount::Amount;
use thiserror::Error;

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors that can occur while loading data, loading models or reporting.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON model artifact could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid transaction record
    #[error("Invalid transaction at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Food and shopping bands overlap or touch
    #[error(
        "Ambiguous category thresholds: food limit {food_limit} must be below shopping limit {shopping_limit}"
    )]
    AmbiguousThresholds {
        food_limit: Amount,
        shopping_limit: Amount,
    },

    /// Summing the loaded amounts exceeded the decimal range
    #[error("Total of {count} amounts exceeds the representable range")]
    AmountOverflow { count: usize },

    /// A model produced a number that cannot be reported as an amount
    #[error("Prediction for month {month} is {value}, which is not a finite amount within range")]
    InvalidPrediction { month: u32, value: f64 },

    /// Month index outside what the forecaster can answer
    #[error("Invalid month {0}: expected a value between 1 and 12")]
    InvalidMonth(u32),

    /// Payment mode the classifier has no encoding for
    #[error("Unknown payment mode '{0}'")]
    UnknownPaymentMode(String),

    /// Model artifact was readable but not usable
    #[error("Model {path}: {message}")]
    Model { path: String, message: String },
}
