//! Expense dataset loading and aggregation.
//!
//! Rows are streamed from CSV one at a time. Rows that cannot be parsed are
//! logged and skipped; everything that loads is kept in file order and never
//! modified afterwards.

use crate::amount::Amount;
use crate::error::{AnalyzerError, Result};
use crate::transaction::{Transaction, TransactionRecord};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Headline figures for the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub transactions: usize,
    pub total: Amount,
    pub average: Amount,
}

/// One row of a category or payment-mode breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: usize,
    /// Percentage of all transactions, 0-100.
    pub percent: f64,
}

/// The loaded, read-only set of transactions.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDataset {
    transactions: Vec<Transaction>,
    skipped: usize,
}

impl ExpenseDataset {
    /// Opens and loads a CSV file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_csv(BufReader::new(file))?;
        debug!(
            "Loaded {} transactions from {} ({} skipped)",
            dataset.len(),
            path.display(),
            dataset.skipped
        );
        Ok(dataset)
    }

    /// Loads transactions from a CSV reader in streaming fashion.
    ///
    /// Invalid records are logged at warn level and skipped. Only I/O
    /// failures and an unreadable header abort the load.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        csv_reader.headers()?;

        let mut dataset = ExpenseDataset::default();
        for (row_idx, result) in csv_reader.deserialize::<TransactionRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match record.parse() {
                    Ok(tx) => dataset.transactions.push(tx),
                    Err(message) => {
                        let err = AnalyzerError::InvalidRecord {
                            row: row_num,
                            message,
                        };
                        warn!("{}", err);
                        dataset.skipped += 1;
                    }
                },
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    dataset.skipped += 1;
                }
            }
        }

        Ok(dataset)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Number of rows dropped while loading.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Count, total and mean of all amounts.
    ///
    /// Fails with `AmountOverflow` if the total leaves the decimal range.
    pub fn summary(&self) -> Result<Summary> {
        let total = Amount::try_sum(self.transactions.iter().map(Transaction::amount))
            .ok_or(AnalyzerError::AmountOverflow { count: self.len() })?;
        Ok(Summary {
            transactions: self.len(),
            total,
            average: Amount::mean_of(total, self.len()),
        })
    }

    /// The first `n` transactions.
    pub fn head(&self, n: usize) -> &[Transaction] {
        &self.transactions[..n.min(self.len())]
    }

    /// The last `n` transactions.
    pub fn tail(&self, n: usize) -> &[Transaction] {
        &self.transactions[self.len().saturating_sub(n)..]
    }

    /// Transaction counts per recorded category.
    pub fn category_breakdown(&self) -> Vec<Share> {
        self.breakdown(|tx| tx.category())
    }

    /// Transaction counts per payment mode, as written in the data.
    pub fn payment_mode_breakdown(&self) -> Vec<Share> {
        self.breakdown(|tx| tx.payment_mode())
    }

    /// Counts by label, ordered by count descending then label ascending.
    fn breakdown<'a, F>(&'a self, key: F) -> Vec<Share>
    where
        F: Fn(&'a Transaction) -> &'a str,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for tx in &self.transactions {
            *counts.entry(key(tx)).or_insert(0) += 1;
        }

        let total = self.len();
        let mut shares: Vec<Share> = counts
            .into_iter()
            .map(|(label, count)| Share {
                label: label.to_string(),
                count,
                percent: count as f64 * 100.0 / total as f64,
            })
            .collect();
        shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        shares
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(csv: &str) -> ExpenseDataset {
        ExpenseDataset::from_csv(Cursor::new(csv)).unwrap()
    }

    const SAMPLE: &str = r#"Date,Amount,Payment_Mode,Category
2024-01-05,80,Cash,Food
2024-01-06,2500,Card,Shopping
2024-02-10,1200,Rent,Bills
2024-02-11,60,Cash,Food
2024-03-01,450,Fuel,Transport"#;

    #[test]
    fn test_load_preserves_order() {
        let dataset = load(SAMPLE);
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.skipped(), 0);

        let amounts: Vec<String> = dataset
            .transactions()
            .iter()
            .map(|tx| tx.amount().to_string())
            .collect();
        assert_eq!(amounts, ["80.00", "2500.00", "1200.00", "60.00", "450.00"]);
    }

    #[test]
    fn test_summary() {
        let summary = load(SAMPLE).summary().unwrap();
        assert_eq!(summary.transactions, 5);
        assert_eq!(summary.total.to_string(), "4290.00");
        assert_eq!(summary.average.to_string(), "858.00");
    }

    #[test]
    fn test_summary_of_empty_dataset() {
        let summary = load("Date,Amount,Payment_Mode,Category\n").summary().unwrap();
        assert_eq!(summary.transactions, 0);
        assert_eq!(summary.total, Amount::ZERO);
        assert_eq!(summary.average, Amount::ZERO);
    }

    #[test]
    fn test_summary_overflow_is_an_error() {
        let csv = r#"Date,Amount,Payment_Mode,Category
2024-01-05,50000000000000000000000000000,Card,Shopping
2024-01-06,50000000000000000000000000000,Card,Shopping"#;

        let dataset = load(csv);
        assert_eq!(dataset.len(), 2);
        assert!(matches!(
            dataset.summary(),
            Err(AnalyzerError::AmountOverflow { count: 2 })
        ));
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let csv = r#"Date,Amount,Payment_Mode,Category
2024-01-05,80,Cash,Food
not-a-date,90,Cash,Food
2024-01-07,lots,Card,Shopping
2024-01-08,,UPI,Food
2024-01-09,40,UPI,Food"#;

        let dataset = load(csv);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.skipped(), 3);
    }

    #[test]
    fn test_extra_columns_and_whitespace() {
        let csv = r#"Transaction_ID, Date, Amount, Payment_Mode, Category, Note
T1, 2024-01-05, 80, Cash, Food, lunch
T2, 2024-01-06, 300, UPI, Others, gift"#;

        let dataset = load(csv);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.transactions()[1].payment_mode(), "UPI");
        assert_eq!(dataset.transactions()[1].category(), "Others");
    }

    #[test]
    fn test_missing_category_column() {
        let csv = "Date,Amount,Payment_Mode\n2024-01-05,80,Cash\n";
        let dataset = load(csv);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.transactions()[0].category(), "Unknown");
    }

    #[test]
    fn test_head_and_tail_clamp() {
        let dataset = load(SAMPLE);
        assert_eq!(dataset.head(2).len(), 2);
        assert_eq!(dataset.head(2)[0].amount().to_string(), "80.00");
        assert_eq!(dataset.tail(2)[1].amount().to_string(), "450.00");
        assert_eq!(dataset.head(50).len(), 5);
        assert_eq!(dataset.tail(50).len(), 5);
        assert!(dataset.tail(0).is_empty());
    }

    #[test]
    fn test_category_breakdown_ordering() {
        let shares = load(SAMPLE).category_breakdown();
        let labels: Vec<&str> = shares.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Food", "Bills", "Shopping", "Transport"]);
        assert_eq!(shares[0].count, 2);
        assert!((shares[0].percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_payment_mode_breakdown() {
        let shares = load(SAMPLE).payment_mode_breakdown();
        assert_eq!(shares[0].label, "Cash");
        assert_eq!(shares[0].count, 2);
        assert_eq!(shares.len(), 4);
    }
}
