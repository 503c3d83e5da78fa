//! Converts between sheet rows and expenses.
//!
//! Decoding reads an `Expense` out of a row of text cells. Encoding turns a new `Expense` into the
//! ten cells of the expenses sheet layout, including the formulas that split the total between
//! the two members of the household and derive the month and year of the date.

use crate::model::{cell, CellValue, ColumnIndexes, Expense, ExpenseError, ExtendedValue};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;

/// Date layouts a date cell may be rendered in, tried in order. Month-first wins over day-first
/// for slash-separated dates.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%Y. %m. %d.",
    "%Y.%m.%d",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%a %b %d %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// The number of cells `encode` produces for one row.
pub const ENCODED_WIDTH: usize = 10;

/// Reads the expense fields out of `row`. Missing cells read as empty text and an empty or
/// unrecognized date cell reads as `None`.
pub fn decode(row: &[String], columns: &ColumnIndexes) -> Expense {
    Expense {
        date: parse_date(cell(row, columns.date)),
        category: cell(row, columns.category).to_string(),
        total: cell(row, columns.total).to_string(),
        paid_by: cell(row, columns.paid_by).to_string(),
    }
}

/// Parses the rendered text of a date cell.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Local).date_naive());
    }
    let date = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
                .map(|dt| dt.date())
        })?;
    Some(widen_two_digit_year(date))
}

/// `10/16/26` parses as the year 26, read it as 2026 instead (and `10/16/96` as 1996).
fn widen_two_digit_year(date: NaiveDate) -> NaiveDate {
    let year = date.year();
    if !(0..100).contains(&year) {
        return date;
    }
    let century = if year < 50 { 2000 } else { 1900 };
    date.with_year(century + year).unwrap_or(date)
}

/// Encodes `expense` into the cells of sheet row `row_number` (1-based, as in `A10`):
///
/// | A    | B        | C     | D       | E          | F      | G | H | I              | J             |
/// |------|----------|-------|---------|------------|--------|---|---|----------------|---------------|
/// | date | category | total | paid by | `=C{n}/2`  | `=E{n}`|   |   | `=MONTH(A{n})` | `=YEAR(A{n})` |
///
/// A missing date is replaced by `today`.
///
/// # Errors
/// Returns an error if the total is not a number.
pub fn encode(
    expense: &Expense,
    row_number: usize,
    today: NaiveDate,
) -> Result<Vec<CellValue>, ExpenseError> {
    let total = expense.total_value()?.to_f64().unwrap_or_default();
    Ok(vec![
        CellValue::Date(expense.date.unwrap_or(today)),
        CellValue::from(expense.category.as_str()),
        CellValue::Number(total),
        CellValue::from(expense.paid_by.as_str()),
        CellValue::Text(format!("=C{row_number}/2")),
        CellValue::Text(format!("=E{row_number}")),
        CellValue::from(""),
        CellValue::from(""),
        CellValue::Text(format!("=MONTH(A{row_number})")),
        CellValue::Text(format!("=YEAR(A{row_number})")),
    ])
}

/// Projects encoded cells into their wire form.
pub fn project(cells: &[CellValue]) -> Vec<ExtendedValue> {
    cells.iter().map(CellValue::to_extended_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::COLUMNS;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode() {
        let expense = decode(&row(&["2026-10-16", "Food", "12.50 USD", "Alice"]), &COLUMNS);
        assert_eq!(expense.date, Some(date(2026, 10, 16)));
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.total, "12.50 USD");
        assert_eq!(expense.paid_by, "Alice");
    }

    #[test]
    fn test_decode_empty_date_and_short_row() {
        let expense = decode(&row(&["", "Food"]), &COLUMNS);
        assert_eq!(expense.date, None);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.total, "");
        assert_eq!(expense.paid_by, "");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Some(date(2026, 10, 16));
        for text in [
            "2026-10-16",
            "10/16/2026",
            "2026/10/16",
            "2026. 10. 16.",
            "2026.10.16",
            "16.10.2026",
            "Oct 16, 2026",
            "October 16, 2026",
            "Fri Oct 16 2026",
            "2026-10-16 13:45:00",
            "10/16/2026 8:05:00",
            " 2026-10-16 ",
        ] {
            assert_eq!(parse_date(text), expected, "{text}");
        }
    }

    #[test]
    fn test_parse_date_two_digit_year() {
        assert_eq!(parse_date("10/1/25"), Some(date(2025, 10, 1)));
    }

    #[test]
    fn test_parse_date_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("13/45/2026"), None);
    }

    #[test]
    fn test_encode_layout() {
        let expense = Expense::validated(Some(date(2026, 10, 16)), "Food", "20", "Alice").unwrap();
        let cells = encode(&expense, 10, date(2000, 1, 1)).unwrap();
        assert_eq!(cells.len(), ENCODED_WIDTH);
        assert_eq!(cells[0], CellValue::Date(date(2026, 10, 16)));
        assert_eq!(cells[1], CellValue::from("Food"));
        assert_eq!(cells[2], CellValue::Number(20.0));
        assert_eq!(cells[3], CellValue::from("Alice"));
        assert_eq!(cells[4], CellValue::from("=C10/2"));
        assert_eq!(cells[5], CellValue::from("=E10"));
        assert_eq!(cells[6], CellValue::from(""));
        assert_eq!(cells[7], CellValue::from(""));
        assert_eq!(cells[8], CellValue::from("=MONTH(A10)"));
        assert_eq!(cells[9], CellValue::from("=YEAR(A10)"));
    }

    #[test]
    fn test_encode_defaults_date_to_today() {
        let expense = Expense::validated(None, "Food", "7.5", "Bob").unwrap();
        let cells = encode(&expense, 3, date(2026, 2, 1)).unwrap();
        assert_eq!(cells[0], CellValue::Date(date(2026, 2, 1)));
        assert_eq!(cells[2], CellValue::Number(7.5));
    }

    #[test]
    fn test_encode_rejects_non_numeric_total() {
        let expense = Expense {
            total: "a lot".into(),
            ..Expense::default()
        };
        assert!(encode(&expense, 3, date(2026, 2, 1)).is_err());
    }

    #[test]
    fn test_project() {
        let expense = Expense::validated(Some(date(1970, 1, 1)), "Food", "20", "Alice").unwrap();
        let values = project(&encode(&expense, 10, date(2000, 1, 1)).unwrap());
        assert_eq!(values[0], ExtendedValue::NumberValue(25569.0));
        assert_eq!(values[1], ExtendedValue::StringValue("Food".into()));
        assert_eq!(values[2], ExtendedValue::NumberValue(20.0));
        assert_eq!(values[4], ExtendedValue::FormulaValue("=C10/2".into()));
        assert_eq!(values[6], ExtendedValue::StringValue(String::new()));
        assert_eq!(values[8], ExtendedValue::FormulaValue("=MONTH(A10)".into()));
    }
}
