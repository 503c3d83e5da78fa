//! Types that represent the core data model, such as `Expense`, `ExpenseRow` and `Stat`.
mod cell;
mod expense;
mod stat;

pub use cell::{serial_number, CellValue, ExtendedValue};
pub use expense::{Expense, ExpenseError, ExpenseRow};
pub use stat::{most_frequent, sort_for_display, Stat};

/// The cells of a spreadsheet range exactly as the values API returns them: rows of text cells.
/// Rows may be ragged because the API drops trailing empty cells.
pub type RawTable = Vec<Vec<String>>;

/// Where each expense field lives within a row of the expenses sheet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ColumnIndexes {
    pub date: usize,
    pub category: usize,
    pub total: usize,
    pub paid_by: usize,
}

/// The column layout of the shared expenses sheet: `A` date, `B` category, `C` total, `D` payer.
pub const COLUMNS: ColumnIndexes = ColumnIndexes {
    date: 0,
    category: 1,
    total: 2,
    paid_by: 3,
};

/// Returns the text of the cell at `column`, or the empty string when the row is too short.
pub(crate) fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or_default()
}
