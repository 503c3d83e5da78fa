//! Derives everything the expenses view shows from the raw cells of the expenses range.
//!
//! The sheet looks like this (0-based row indexes on the left):
//!
//! ```text
//! 0    Date        Category   Total      Paid by   ...   <- header
//! 1    2026-10-01  Food       12.50 USD  Alice
//! ...                                                    <- data region
//! S-1                                                    <- spacer row new expenses go above
//! S    SUM                    =SUM(...)                  <- sentinel row
//! ```

use crate::codec;
use crate::error::SyncError;
use crate::model::{cell, ColumnIndexes, ExpenseRow, RawTable, Stat, COLUMNS};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// The first-column text of the row that holds the column totals.
pub const SUM_MARKER: &str = "SUM";

/// How the digits of a total are turned into a number for the monthly aggregate.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalExtraction {
    /// Drop every character that is not an ASCII digit and read the rest as an integer, so
    /// `12.50 USD` counts as `1250`. Only exact for currencies written without minor units.
    #[default]
    DigitsOnly,
}

serde_plain::derive_display_from_serialize!(TotalExtraction);

impl TotalExtraction {
    fn extract(&self, text: &str) -> u64 {
        match self {
            TotalExtraction::DigitsOnly => text
                .chars()
                .filter_map(|c| c.to_digit(10))
                .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d))),
        }
    }
}

/// Everything derived from one successful read of the expenses range.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ParsedTable {
    /// 0-based index of the `SUM` row.
    pub sum_row_index: usize,
    /// The most recent expenses, oldest first.
    pub rows: Vec<ExpenseRow>,
    pub categories: Vec<Stat>,
    pub paid_bys: Vec<Stat>,
    /// For each category, who paid for it and how often.
    pub paid_bys_by_category: BTreeMap<String, Vec<Stat>>,
    pub currency: String,
    pub current_month_total: u64,
}

/// Parses `raw` into a `ParsedTable` showing the last `rows_limit` expenses and the total of the
/// month `today` falls in.
///
/// # Errors
/// Returns `SyncError::MissingSentinel` if there is no `SUM` row. Nothing is returned in that case.
pub fn parse(raw: &RawTable, rows_limit: usize, today: NaiveDate) -> Result<ParsedTable, SyncError> {
    let sum_row_index = find_sum_row_index(raw)?;
    let data = data_region(raw, sum_row_index);
    let rows = recent_rows(raw, sum_row_index, rows_limit, &COLUMNS);
    let currency = infer_currency(&rows);
    Ok(ParsedTable {
        sum_row_index,
        categories: count_occurrences(data, COLUMNS.category),
        paid_bys: count_occurrences(data, COLUMNS.paid_by),
        paid_bys_by_category: paid_bys_by_category(data, &COLUMNS),
        current_month_total: monthly_total(
            data,
            today.year(),
            today.month0(),
            &COLUMNS,
            TotalExtraction::DigitsOnly,
        ),
        rows,
        currency,
    })
}

/// Finds the first row whose first cell is exactly `SUM`.
pub fn find_sum_row_index(raw: &RawTable) -> Result<usize, SyncError> {
    raw.iter()
        .position(|row| cell(row, 0) == SUM_MARKER)
        .ok_or(SyncError::MissingSentinel)
}

/// The rows strictly between the header and the `SUM` row.
pub fn data_region(raw: &RawTable, sum_row_index: usize) -> &[Vec<String>] {
    raw.get(1..sum_row_index).unwrap_or_default()
}

/// Counts how many rows carry each non-empty value of `column`. Values are compared exactly and
/// the result is ordered by name.
pub fn count_occurrences(rows: &[Vec<String>], column: usize) -> Vec<Stat> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in rows.iter().map(|row| cell(row, column)) {
        if !value.is_empty() {
            *counts.entry(value).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(name, count)| Stat::new(name, count))
        .collect()
}

/// Counts the payers of each category. Rows missing either value are skipped.
pub fn paid_bys_by_category(
    rows: &[Vec<String>],
    columns: &ColumnIndexes,
) -> BTreeMap<String, Vec<Stat>> {
    let mut grouped: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for row in rows {
        let category = cell(row, columns.category);
        let paid_by = cell(row, columns.paid_by);
        if !category.is_empty() && !paid_by.is_empty() {
            *grouped
                .entry(category)
                .or_default()
                .entry(paid_by)
                .or_default() += 1;
        }
    }
    grouped
        .into_iter()
        .map(|(category, payers)| {
            let payers = payers
                .into_iter()
                .map(|(name, count)| Stat::new(name, count))
                .collect();
            (category.to_string(), payers)
        })
        .collect()
}

/// Decodes the last `limit` rows before the spacer row that precedes `SUM`. When the data region
/// is shorter than that, the window starts right after the header instead.
pub fn recent_rows(
    raw: &RawTable,
    sum_row_index: usize,
    limit: usize,
    columns: &ColumnIndexes,
) -> Vec<ExpenseRow> {
    let start = sum_row_index.saturating_sub(limit.saturating_add(1)).max(1);
    let end = sum_row_index.saturating_sub(1);
    raw.get(start..end)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, row)| ExpenseRow {
            row_index: start + 1 + i,
            expense: codec::decode(row, columns),
        })
        .collect()
}

/// Sums the totals of the rows dated in `year` and the 0-based `month0`. Undated rows are
/// skipped.
pub fn monthly_total(
    rows: &[Vec<String>],
    year: i32,
    month0: u32,
    columns: &ColumnIndexes,
    extraction: TotalExtraction,
) -> u64 {
    trace!("Summing the totals of {year}-{:02} with {extraction}", month0 + 1);
    rows.iter()
        .filter(|row| {
            codec::parse_date(cell(row, columns.date))
                .is_some_and(|d| d.year() == year && d.month0() == month0)
        })
        .map(|row| extraction.extract(cell(row, columns.total)))
        .fold(0u64, u64::saturating_add)
}

/// Takes the currency from the first row's total, e.g. `USD` from `42.00 USD`: the text after
/// the last space, provided it is not empty and holds no whitespace. Other rows are not checked.
pub fn infer_currency(rows: &[ExpenseRow]) -> String {
    rows.first()
        .and_then(|row| row.expense.total.rsplit_once(' '))
        .map(|(_, suffix)| suffix)
        .filter(|suffix| !suffix.is_empty() && !suffix.chars().any(char::is_whitespace))
        .map(|suffix| suffix.trim().to_string())
        .unwrap_or_default()
}
