//! Rule-based expense categorization.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. fuel / petrol / diesel payments are `Transport`
//! 2. electricity / rent / wifi payments are `Bills`
//! 3. `amount >= shopping_limit` is `Shopping`
//! 4. `amount <= food_limit` is `Food`
//! 5. anything else is `Others`
//!
//! Payment-mode checks always take precedence over the amount bands.

use crate::amount::Amount;
use crate::category::Category;
use crate::error::{AnalyzerError, Result};
use log::warn;

const TRANSPORT_MODES: [&str; 3] = ["fuel", "petrol", "diesel"];
const BILL_MODES: [&str; 3] = ["electricity", "rent", "wifi"];

/// Reference range for the food threshold.
pub const FOOD_LIMIT_RANGE: (i64, i64) = (50, 300);

/// Reference range for the shopping threshold.
pub const SHOPPING_LIMIT_RANGE: (i64, i64) = (1000, 5000);

/// Threshold configuration for the amount bands.
///
/// # Invariants
///
/// The bands are only unambiguous when `food_limit < shopping_limit`.
/// [`CategoryRules::classify`] does not check this; call
/// [`CategoryRules::validate`] to find out. With overlapping bands an amount
/// that satisfies both resolves to `Shopping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRules {
    /// Amounts at or below this are `Food`.
    pub food_limit: Amount,

    /// Amounts at or above this are `Shopping`.
    pub shopping_limit: Amount,
}

impl CategoryRules {
    pub fn new(food_limit: Amount, shopping_limit: Amount) -> Self {
        CategoryRules {
            food_limit,
            shopping_limit,
        }
    }

    /// Assigns a category to one transaction.
    pub fn classify(&self, amount: Amount, payment_mode: &str) -> Category {
        classify(amount, payment_mode, self.food_limit, self.shopping_limit)
    }

    /// Returns `AmbiguousThresholds` when `food_limit >= shopping_limit`.
    pub fn validate(&self) -> Result<()> {
        if self.food_limit >= self.shopping_limit {
            return Err(AnalyzerError::AmbiguousThresholds {
                food_limit: self.food_limit,
                shopping_limit: self.shopping_limit,
            });
        }
        Ok(())
    }

    /// Logs a warning for thresholds outside the reference ranges.
    ///
    /// Returns `true` when both thresholds are inside their range.
    pub fn check_reference_ranges(&self) -> bool {
        let mut in_range = true;
        if !within(self.food_limit, FOOD_LIMIT_RANGE) {
            warn!(
                "Food limit {} is outside the usual range {}..={}",
                self.food_limit, FOOD_LIMIT_RANGE.0, FOOD_LIMIT_RANGE.1
            );
            in_range = false;
        }
        if !within(self.shopping_limit, SHOPPING_LIMIT_RANGE) {
            warn!(
                "Shopping limit {} is outside the usual range {}..={}",
                self.shopping_limit, SHOPPING_LIMIT_RANGE.0, SHOPPING_LIMIT_RANGE.1
            );
            in_range = false;
        }
        in_range
    }

    /// Human-readable list of the active rules.
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!("Food <= {}", self.food_limit),
            format!("Shopping >= {}", self.shopping_limit),
            "Fuel / Petrol / Diesel -> Transport".to_string(),
            "Electricity / Rent / Wifi -> Bills".to_string(),
        ]
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        CategoryRules::new(Amount::from_units(100), Amount::from_units(2000))
    }
}

fn within(value: Amount, (low, high): (i64, i64)) -> bool {
    value >= Amount::from_units(low) && value <= Amount::from_units(high)
}

/// Maps an amount and payment label to a category.
///
/// Pure and total: zero or negative amounts simply take part in the numeric
/// comparisons, and unknown payment labels fall through to the amount bands.
pub fn classify(
    amount: Amount,
    payment_mode: &str,
    food_limit: Amount,
    shopping_limit: Amount,
) -> Category {
    let mode = payment_mode.to_lowercase();

    if TRANSPORT_MODES.contains(&mode.as_str()) {
        Category::Transport
    } else if BILL_MODES.contains(&mode.as_str()) {
        Category::Bills
    } else if amount >= shopping_limit {
        Category::Shopping
    } else if amount <= food_limit {
        Category::Food
    } else {
        Category::Others
    }
}
