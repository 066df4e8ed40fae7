//! Transaction models for CSV parsing and internal representation.

use crate::amount::Amount;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::str::FromStr;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Raw expense record as read from CSV.
///
/// Fields stay strings so a bad value can be reported with its row number
/// instead of failing the whole file. Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Amount")]
    pub amount: String,

    #[serde(rename = "Payment_Mode")]
    pub payment_mode: String,

    /// Category as recorded in the dataset; display only.
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
}

impl TransactionRecord {
    /// Parses the raw CSV record into a typed transaction.
    pub fn parse(&self) -> std::result::Result<Transaction, String> {
        let date = parse_date(&self.date).ok_or_else(|| format!("invalid date '{}'", self.date))?;
        let amount = Amount::from_str(&self.amount)
            .map_err(|e| format!("invalid amount '{}': {}", self.amount, e))?;
        let payment_mode = self.payment_mode.trim();
        if payment_mode.is_empty() {
            return Err("missing payment mode".to_string());
        }
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("Unknown");

        Ok(Transaction::new(date, amount, payment_mode, category))
    }
}

/// Parses the date layouts commonly found in expense exports.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// A loaded expense with its calendar fields derived once.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    date: NaiveDate,
    amount: Amount,
    payment_mode: String,
    category: String,
    month: u32,
    day: u32,
    weekday: u32,
    is_weekend: bool,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: Amount, payment_mode: &str, category: &str) -> Self {
        let weekday = date.weekday().num_days_from_monday();
        Transaction {
            date,
            amount,
            payment_mode: payment_mode.to_string(),
            category: category.to_string(),
            month: date.month(),
            day: date.day(),
            weekday,
            is_weekend: weekday >= 5,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn payment_mode(&self) -> &str {
        &self.payment_mode
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Month of year, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of month, 1-31.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Day of week, 0 = Monday .. 6 = Sunday.
    pub fn weekday(&self) -> u32 {
        self.weekday
    }

    pub fn is_weekend(&self) -> bool {
        self.is_weekend
    }
}

/// Numeric inputs consumed by an external category model, in training order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub amount: f64,
    pub month: u32,
    pub day: u32,
    pub weekday: u32,
    pub is_weekend: bool,
    pub payment_code: usize,
}

impl FeatureVector {
    pub const NAMES: [&'static str; 6] = [
        "Amount",
        "Month",
        "Day",
        "Weekday",
        "Is_Weekend",
        "Payment_Encoded",
    ];

    /// Builds features from explicit values; `is_weekend` follows `weekday`.
    pub fn new(amount: Amount, month: u32, day: u32, weekday: u32, payment_code: usize) -> Self {
        FeatureVector {
            amount: amount.to_f64(),
            month,
            day,
            weekday,
            is_weekend: weekday >= 5,
            payment_code,
        }
    }

    pub fn from_transaction(tx: &Transaction, payment_code: usize) -> Self {
        FeatureVector::new(tx.amount(), tx.month(), tx.day(), tx.weekday(), payment_code)
    }

    pub fn to_array(&self) -> [f64; 6] {
        [
            self.amount,
            f64::from(self.month),
            f64::from(self.day),
            f64::from(self.weekday),
            if self.is_weekend { 1.0 } else { 0.0 },
            self.payment_code as f64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, amount: &str, mode: &str, category: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            date: date.to_string(),
            amount: amount.to_string(),
            payment_mode: mode.to_string(),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_derives_calendar_fields() {
        let tx = record("2024-03-16", "250.5", "UPI", Some("Food"))
            .parse()
            .unwrap();

        assert_eq!(tx.amount().to_string(), "250.50");
        assert_eq!(tx.payment_mode(), "UPI");
        assert_eq!(tx.category(), "Food");
        assert_eq!(tx.month(), 3);
        assert_eq!(tx.day(), 16);
        assert_eq!(tx.weekday(), 5);
        assert!(tx.is_weekend());
    }

    #[test]
    fn test_parse_weekday_is_not_weekend() {
        let tx = record("2024-03-18", "10", "Cash", None).parse().unwrap();
        assert_eq!(tx.weekday(), 0);
        assert!(!tx.is_weekend());
        assert_eq!(tx.category(), "Unknown");
    }

    #[test]
    fn test_parse_handles_whitespace() {
        let tx = record(" 2024-01-05 ", "  99.90 ", "  Card ", Some(" Shopping "))
            .parse()
            .unwrap();
        assert_eq!(tx.payment_mode(), "Card");
        assert_eq!(tx.category(), "Shopping");
        assert_eq!(tx.amount().to_string(), "99.90");
    }

    #[test]
    fn test_parse_rejects_bad_amount() {
        let err = record("2024-01-05", "ten", "Cash", None).parse().unwrap_err();
        assert!(err.contains("invalid amount"));
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let err = record("yesterday", "10", "Cash", None).parse().unwrap_err();
        assert!(err.contains("invalid date"));
    }

    #[test]
    fn test_parse_rejects_empty_payment_mode() {
        assert!(record("2024-01-05", "10", "  ", None).parse().is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 12, 25);
        assert_eq!(parse_date("2023-12-25"), expected);
        assert_eq!(parse_date("2023/12/25"), expected);
        assert_eq!(parse_date("25-12-2023"), expected);
        assert_eq!(parse_date("12/25/2023"), expected);
        assert_eq!(parse_date("2023-12-25 18:30:00"), expected);
        assert_eq!(parse_date("2023-13-25"), None);
    }

    #[test]
    fn test_feature_vector_order() {
        let tx = record("2024-03-16", "120", "Cash", None).parse().unwrap();
        let features = FeatureVector::from_transaction(&tx, 2);
        assert_eq!(features.to_array(), [120.0, 3.0, 16.0, 5.0, 1.0, 2.0]);
    }
}
