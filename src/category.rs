//! The fixed set of expense categories the rule engine can assign.

use std::fmt;
use std::str::FromStr;

/// Classification label assigned to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Transport,
    Bills,
    Shopping,
    Food,
    Others,
}

impl Category {
    /// Every category, in rule-evaluation order.
    pub const ALL: [Category; 5] = [
        Category::Transport,
        Category::Bills,
        Category::Shopping,
        Category::Food,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Food => "Food",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown category '{}'", wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_through_from_str() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(&category.to_string()), Ok(category));
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(Category::from_str(" food "), Ok(Category::Food));
        assert_eq!(Category::from_str("BILLS"), Ok(Category::Bills));
        assert!(Category::from_str("Groceries").is_err());
    }
}
