//! Values written into sheet cells and their tagged wire form.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// `NaiveDate::num_days_from_ce` of 1899-12-30, the day Google Sheets counts dates from.
const SERIAL_EPOCH_DAYS_FROM_CE: i32 = 693_594;

/// A value destined for one cell of a new row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// A calendar date as seen in the local timezone of whoever entered it.
    Date(NaiveDate),
    Number(f64),
    /// Plain text, or a formula when it starts with `=`.
    Text(String),
}

impl CellValue {
    /// Projects the cell into the value the sheet stores when a user types it:
    /// - a date becomes its serial number,
    /// - a number passes through,
    /// - text starting with `=` is a formula,
    /// - anything else is a string.
    pub fn to_extended_value(&self) -> ExtendedValue {
        match self {
            CellValue::Date(date) => ExtendedValue::NumberValue(f64::from(serial_number(*date))),
            CellValue::Number(n) => ExtendedValue::NumberValue(*n),
            CellValue::Text(s) if s.starts_with('=') => ExtendedValue::FormulaValue(s.clone()),
            CellValue::Text(s) => ExtendedValue::StringValue(s.clone()),
        }
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// The `ExtendedValue` of the Sheets API, limited to the kinds this program writes. Serializes to
/// `{"numberValue": 20.0}`, `{"stringValue": "Food"}` or `{"formulaValue": "=C10/2"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtendedValue {
    NumberValue(f64),
    StringValue(String),
    FormulaValue(String),
}

/// The spreadsheet serial number of `date`: whole days since 1899-12-30.
pub fn serial_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - SERIAL_EPOCH_DAYS_FROM_CE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serial_number() {
        assert_eq!(serial_number(date(1899, 12, 30)), 0);
        assert_eq!(serial_number(date(1899, 12, 31)), 1);
        assert_eq!(serial_number(date(1970, 1, 1)), 25569);
        assert_eq!(serial_number(date(2000, 1, 1)), 36526);
    }

    #[test]
    fn test_date_projects_to_serial_number() {
        let cell = CellValue::Date(date(1970, 1, 2));
        assert_eq!(cell.to_extended_value(), ExtendedValue::NumberValue(25570.0));
    }

    #[test]
    fn test_three_way_tagging() {
        assert_eq!(
            CellValue::from("=C10/2").to_extended_value(),
            ExtendedValue::FormulaValue("=C10/2".into())
        );
        assert_eq!(
            CellValue::from("Food").to_extended_value(),
            ExtendedValue::StringValue("Food".into())
        );
        assert_eq!(
            CellValue::from("").to_extended_value(),
            ExtendedValue::StringValue(String::new())
        );
        assert_eq!(
            CellValue::from(12.5).to_extended_value(),
            ExtendedValue::NumberValue(12.5)
        );
    }

    #[test]
    fn test_wire_form() {
        let json = serde_json::to_value(ExtendedValue::FormulaValue("=E3".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "formulaValue": "=E3" }));
        let json = serde_json::to_value(ExtendedValue::StringValue("Bob".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "stringValue": "Bob" }));
        let json = serde_json::to_value(ExtendedValue::NumberValue(20.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "numberValue": 20.0 }));
    }
}
