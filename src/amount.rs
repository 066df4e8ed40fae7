//! Decimal money type shown with 2 decimal places.
//!
//! Transaction amounts and category thresholds share this type so the
//! rule comparisons never go through floating point. Values keep the
//! precision they were parsed with; rounding happens only when formatting.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A currency-agnostic amount.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use expense_analyzer::Amount;
///
/// let amount = Amount::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
///
/// let precise = Amount::from_str("100.004").unwrap();
/// assert!(precise > Amount::from_units(100));
/// assert_eq!(precise.to_string(), "100.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Decimal places used when formatting.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Creates an amount from a whole number of currency units.
    pub fn from_units(units: i64) -> Self {
        Amount(Decimal::from(units))
    }

    /// Creates an amount from a float, as produced by model predictions.
    ///
    /// Returns `None` for NaN, infinite input, or a value beyond the decimal
    /// range (about ±7.9e28).
    pub fn from_f64(value: f64) -> Option<Self> {
        Decimal::from_f64_retain(value).map(Amount)
    }

    /// Lossy conversion for feeding external models.
    ///
    /// Yields NaN if the value has no `f64` form; detectors treat NaN as
    /// anomalous rather than as a zero amount.
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Sums amounts, returning `None` if the total overflows.
    pub fn try_sum<I: IntoIterator<Item = Amount>>(amounts: I) -> Option<Amount> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(a))
    }

    /// Divides by a count, returning zero for an empty set.
    pub fn mean_of(total: Amount, count: usize) -> Amount {
        if count == 0 {
            return Amount::ZERO;
        }
        Amount(total.0 / Decimal::from(count))
    }

    /// Formats with thousands separators and no fraction, e.g. `12,345`.
    pub fn to_grouped_units(&self) -> String {
        let rounded = self.0.round_dp(0);
        let digits = rounded.abs().trunc().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if rounded.is_sign_negative() && !rounded.is_zero() {
            grouped.insert(0, '-');
        }
        grouped
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed))?;
        Ok(Amount(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self.0.round_dp(Self::DISPLAY_SCALE);
        rounded.rescale(Self::DISPLAY_SCALE);
        write!(f, "{}", rounded)
    }
}
