//! CSV renderings of each analyzer view.
//!
//! Every writer emits a header row first. Amounts are written with exactly
//! 2 decimal places.

use crate::amount::Amount;
use crate::category::Category;
use crate::dataset::{ExpenseDataset, Share, Summary};
use crate::error::{AnalyzerError, Result};
use crate::models::{AnomalyDetector, MonthlyForecaster};
use crate::rules::CategoryRules;
use crate::transaction::Transaction;
use log::info;
use std::io::Write;

const TRANSACTION_HEADER: [&str; 8] = [
    "date",
    "amount",
    "payment_mode",
    "category",
    "month",
    "day",
    "weekday",
    "is_weekend",
];

fn transaction_fields(tx: &Transaction) -> Vec<String> {
    vec![
        tx.date().format("%Y-%m-%d").to_string(),
        tx.amount().to_string(),
        tx.payment_mode().to_string(),
        tx.category().to_string(),
        tx.month().to_string(),
        tx.day().to_string(),
        tx.weekday().to_string(),
        tx.is_weekend().to_string(),
    ]
}

/// Writes the headline metrics as `metric,value` rows.
pub fn write_summary<W: Write>(summary: &Summary, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["metric", "value"])?;
    csv_writer.write_record(["transactions", &summary.transactions.to_string()])?;
    csv_writer.write_record(["total", &summary.total.to_string()])?;
    csv_writer.write_record(["average", &summary.average.to_string()])?;

    csv_writer.flush()?;
    info!(
        "Total expense {} across {} transactions",
        summary.total.to_grouped_units(),
        summary.transactions
    );
    Ok(())
}

/// Writes transactions with their derived calendar fields.
pub fn write_transactions<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(TRANSACTION_HEADER)?;
    for tx in transactions {
        csv_writer.write_record(transaction_fields(tx))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes the rule-based category for a single transaction.
pub fn write_classification<W: Write>(
    amount: Amount,
    payment_mode: &str,
    category: Category,
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["amount", "payment_mode", "category"])?;
    csv_writer.write_record([amount.to_string(), payment_mode.to_string(), category.to_string()])?;

    csv_writer.flush()?;
    Ok(())
}

/// Writes every transaction with the category the rules assign to it.
///
/// Rows where the recorded category disagrees with the rules are counted and
/// logged at info level.
pub fn write_categorized<W: Write>(
    dataset: &ExpenseDataset,
    rules: &CategoryRules,
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = TRANSACTION_HEADER.to_vec();
    header.push("predicted_category");
    csv_writer.write_record(&header)?;

    let mut agreements = 0usize;
    for tx in dataset.transactions() {
        let predicted = rules.classify(tx.amount(), tx.payment_mode());
        if predicted.as_str().eq_ignore_ascii_case(tx.category()) {
            agreements += 1;
        }
        let mut fields = transaction_fields(tx);
        fields.push(predicted.to_string());
        csv_writer.write_record(&fields)?;
    }

    csv_writer.flush()?;
    info!(
        "Rules agree with recorded category on {} of {} transactions",
        agreements,
        dataset.len()
    );
    Ok(())
}

/// Writes predicted spend for each requested month.
pub fn write_forecast<M, W>(model: &M, months: &[u32], writer: W) -> Result<()>
where
    M: MonthlyForecaster + ?Sized,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["month", "predicted_amount"])?;
    for &month in months {
        let predicted = model.predict(month)?;
        let amount = Amount::from_f64(predicted).ok_or(AnalyzerError::InvalidPrediction {
            month,
            value: predicted,
        })?;
        csv_writer.write_record([month.to_string(), amount.to_string()])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes the anomaly verdict for every transaction, indexed from 0.
///
/// Returns the number of anomalies found.
pub fn write_anomalies<D, W>(dataset: &ExpenseDataset, model: &D, writer: W) -> Result<usize>
where
    D: AnomalyDetector + ?Sized,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["index", "date", "amount", "anomaly", "label"])?;
    let mut anomalies = 0;
    for (index, tx) in dataset.transactions().iter().enumerate() {
        let verdict = model.detect(tx.amount().to_f64());
        if verdict.code() < 0 {
            anomalies += 1;
        }
        csv_writer.write_record([
            index.to_string(),
            tx.date().format("%Y-%m-%d").to_string(),
            tx.amount().to_string(),
            verdict.code().to_string(),
            verdict.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(anomalies)
}

/// Writes a category breakdown with one-decimal percentages.
pub fn write_category_breakdown<W: Write>(shares: &[Share], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["category", "count", "percent"])?;
    for share in shares {
        csv_writer.write_record([
            share.label.clone(),
            share.count.to_string(),
            format!("{:.1}", share.percent),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes payment-mode usage counts.
pub fn write_payment_mode_breakdown<W: Write>(shares: &[Share], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["payment_mode", "count"])?;
    for share in shares {
        csv_writer.write_record([share.label.clone(), share.count.to_string()])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes a classifier's category code.
pub fn write_category_code<W: Write>(code: i64, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["category_code"])?;
    csv_writer.write_record([code.to_string()])?;

    csv_writer.flush()?;
    Ok(())
}

/// Writes named feature importances.
pub fn write_importances<W: Write>(importances: &[(&str, f64)], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["feature", "importance"])?;
    for (feature, importance) in importances {
        csv_writer.write_record([feature.to_string(), format!("{:.4}", importance)])?;
    }

    csv_writer.flush()?;
    Ok(())
}
