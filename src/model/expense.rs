use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One shared expense: when, what for, how much and who paid.
///
/// `total` is kept as text because rows read back from the sheet carry whatever the sheet renders,
/// e.g. `12.50 USD`. Expenses entered by a user should be created with `Expense::validated`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    pub date: Option<NaiveDate>,
    pub category: String,
    pub total: String,
    pub paid_by: String,
}

impl Expense {
    /// Creates an expense from user input, applying the same rules as the entry form:
    /// `category` and `paid_by` are required and `total` must be a number greater than zero.
    pub fn validated(
        date: Option<NaiveDate>,
        category: impl Into<String>,
        total: impl Into<String>,
        paid_by: impl Into<String>,
    ) -> Result<Self, ExpenseError> {
        let expense = Self {
            date,
            category: category.into(),
            total: total.into(),
            paid_by: paid_by.into(),
        };
        if expense.category.trim().is_empty() {
            return Err(ExpenseError::new("category", "Required"));
        }
        match coerce_number(&expense.total) {
            Some(n) if n > Decimal::ZERO => {}
            _ => return Err(ExpenseError::new("total", "Must be greater than 0")),
        }
        if expense.paid_by.trim().is_empty() {
            return Err(ExpenseError::new("paid_by", "Required"));
        }
        Ok(expense)
    }

    /// The numeric value of `total`, coerced the way a unary plus would: surrounding whitespace is
    /// ignored and blank text is zero.
    pub fn total_value(&self) -> Result<Decimal, ExpenseError> {
        coerce_number(&self.total).ok_or_else(|| ExpenseError::new("total", "Must be a number"))
    }
}

/// An `Expense` read back from the sheet, along with its row number. `row_index` is the 1-based
/// sheet row number, which is always lower than the 0-based index of the `SUM` row.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpenseRow {
    pub row_index: usize,
    #[serde(flatten)]
    pub expense: Expense,
}

/// A rejected expense field.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExpenseError {
    field: &'static str,
    message: &'static str,
}

impl ExpenseError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }

    pub fn field(&self) -> &str {
        self.field
    }

    pub fn message(&self) -> &str {
        self.message
    }
}

impl Display for ExpenseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl StdError for ExpenseError {}

fn coerce_number(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    // Decimal::from_str accepts `_` as a digit separator
    if trimmed.contains('_') {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_ok() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16);
        let expense = Expense::validated(date, "Food", "20", "Alice").unwrap();
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.total_value().unwrap(), Decimal::from(20));
    }

    #[test]
    fn test_validated_requires_category() {
        let err = Expense::validated(None, " ", "20", "Alice").unwrap_err();
        assert_eq!(err.field(), "category");
        assert_eq!(err.message(), "Required");
    }

    #[test]
    fn test_validated_requires_payer() {
        let err = Expense::validated(None, "Food", "20", "").unwrap_err();
        assert_eq!(err.field(), "paid_by");
    }

    #[test]
    fn test_validated_total_must_be_positive() {
        for total in ["0", "-5", "", "abc", "12 USD"] {
            let err = Expense::validated(None, "Food", total, "Alice").unwrap_err();
            assert_eq!(err.to_string(), "total: Must be greater than 0", "{total}");
        }
    }

    #[test]
    fn test_total_value_coercion() {
        let mut expense = Expense::default();
        assert_eq!(expense.total_value().unwrap(), Decimal::ZERO);
        expense.total = " 12.50 ".into();
        assert_eq!(expense.total_value().unwrap(), Decimal::new(1250, 2));
        expense.total = "1e3".into();
        assert_eq!(expense.total_value().unwrap(), Decimal::from(1000));
        expense.total = "12.50 USD".into();
        assert!(expense.total_value().is_err());
    }

    #[test]
    fn test_total_with_underscores_is_not_a_number() {
        for total in ["1_000", "_5", "5_", "1e1_0"] {
            let expense = Expense {
                total: total.into(),
                ..Expense::default()
            };
            assert!(expense.total_value().is_err(), "{total}");
            assert!(
                Expense::validated(None, "Food", total, "Alice").is_err(),
                "{total}"
            );
        }
    }
}
