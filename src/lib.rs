//! # Expense Analyzer
//!
//! Loads a CSV of personal expense transactions and produces the views a
//! spending dashboard needs: headline totals, rule-based categories, monthly
//! forecasts, anomaly flags and category / payment-mode breakdowns.
//!
//! ## Design Principles
//!
//! - **Fixed-point amounts**: 2 decimal places via `rust_decimal`
//! - **Ordered rules**: payment-mode rules always beat the amount bands
//! - **Explicit configuration**: thresholds travel with each call as a
//!   [`CategoryRules`] value
//! - **Opaque models**: forecasting, anomaly detection and feature-based
//!   classification sit behind traits and load from JSON artifacts
//!
//! ## Example
//!
//! ```
//! use expense_analyzer::{Amount, Category, CategoryRules};
//! use std::str::FromStr;
//!
//! let rules = CategoryRules::default();
//! let amount = Amount::from_str("3000").unwrap();
//! assert_eq!(rules.classify(amount, "Diesel"), Category::Transport);
//! ```

pub mod amount;
pub mod category;
pub mod dataset;
pub mod error;
pub mod models;
pub mod report;
pub mod rules;
pub mod transaction;

pub use amount::Amount;
pub use category::Category;
pub use dataset::{ExpenseDataset, Share, Summary};
pub use error::{AnalyzerError, Result};
pub use models::{AnomalyDetector, CategoryModel, MonthlyForecaster, Verdict};
pub use rules::{classify, CategoryRules};
pub use transaction::{FeatureVector, Transaction, TransactionRecord};
