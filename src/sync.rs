//! The sync gateway: reads the expenses range and adds new expense rows.
//!
//! A new expense goes into the spacer row right above `SUM`. One batch update inserts a blank row
//! there, which pushes the spacer and `SUM` down, and then writes the encoded cells into it. The
//! service applies both or neither.

use crate::api::{
    BatchUpdateRequest, CellData, Dimension, DimensionRange, GridCoordinate,
    InsertDimensionRequest, Request, RowData, Sheet, UpdateCellsRequest,
};
use crate::codec;
use crate::error::SyncError;
use crate::model::{Expense, ExtendedValue, RawTable};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Limits the cell write to the values so that the formatting inherited from the row above stays.
const USER_ENTERED_VALUE: &str = "userEnteredValue";

/// What happened to a submitted expense.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Submit {
    /// The row was inserted and written.
    Submitted,
    /// Nothing was sent because there is no access token or the `SUM` row is not known yet.
    NotReady,
}

/// Reads `range` from `sheet` with `token`.
pub async fn fetch_range(
    sheet: &mut dyn Sheet,
    token: &str,
    range: &str,
) -> Result<RawTable, SyncError> {
    sheet.get(token, range).await
}

/// Returns the token and `SUM` row index when both are available. A `SUM` row at index 0 leaves
/// no room for data and counts as unknown.
pub fn ready(token: Option<&str>, sum_row_index: Option<usize>) -> Option<(&str, usize)> {
    match (token, sum_row_index) {
        (Some(token), Some(sum_row_index)) if !token.is_empty() && sum_row_index > 0 => {
            Some((token, sum_row_index))
        }
        _ => None,
    }
}

/// Adds `expense` as a new row above the spacer row that precedes `SUM`.
///
/// When `token` or `sum_row_index` is missing this returns `Submit::NotReady` without making any
/// request.
///
/// # Errors
/// - `SyncError::InvalidExpense` if the total is not a number.
/// - `SyncError::WriteFailed` if the service rejects the batch update.
pub async fn submit_expense(
    sheet: &mut dyn Sheet,
    token: Option<&str>,
    sheet_id: i64,
    sum_row_index: Option<usize>,
    expense: &Expense,
    today: NaiveDate,
) -> Result<Submit, SyncError> {
    let Some((token, sum_row_index)) = ready(token, sum_row_index) else {
        debug!("Not submitting the expense, the access token or SUM row is not known yet");
        return Ok(Submit::NotReady);
    };
    let insert_row_index = sum_row_index - 1;
    let cells = codec::encode(expense, insert_row_index + 1, today)?;
    let request = insert_expense_request(sheet_id, sum_row_index, codec::project(&cells));
    sheet.batch_update(token, &request).await?;
    info!(
        "Added {} {} paid by {} at row {}",
        expense.category,
        expense.total,
        expense.paid_by,
        insert_row_index + 1
    );
    Ok(Submit::Submitted)
}

/// Builds the two-step batch update that inserts a blank row at `sum_row_index - 1` and fills it
/// with `values` from column `A`.
pub fn insert_expense_request(
    sheet_id: i64,
    sum_row_index: usize,
    values: Vec<ExtendedValue>,
) -> BatchUpdateRequest {
    let insert_row_index = sum_row_index.saturating_sub(1);
    BatchUpdateRequest {
        requests: vec![
            Request::InsertDimension(InsertDimensionRequest {
                range: Some(DimensionRange {
                    sheet_id,
                    dimension: Some(Dimension::Rows),
                    start_index: grid_index(insert_row_index),
                    end_index: grid_index(sum_row_index),
                }),
                inherit_from_before: Some(true),
            }),
            Request::UpdateCells(UpdateCellsRequest {
                rows: vec![RowData {
                    values: values
                        .into_iter()
                        .map(|user_entered_value| CellData { user_entered_value })
                        .collect(),
                }],
                fields: USER_ENTERED_VALUE.to_string(),
                start: GridCoordinate {
                    sheet_id,
                    row_index: grid_index(insert_row_index),
                    column_index: 0,
                },
            }),
        ],
    }
}

fn grid_index(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
