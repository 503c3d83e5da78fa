//! Implements the `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without using Google Sheets.

use crate::api::{
    BatchUpdateRequest, Dimension, InsertDimensionRequest, Request, Sheet, UpdateCellsRequest,
};
use crate::error::SyncError;
use crate::model::{ExtendedValue, RawTable};
use anyhow::Context;
use chrono::{Days, NaiveDate};
use std::io::Cursor;
use tracing::debug;

/// An implementation of the `Sheet` trait that does not use Google sheets. It holds one range in
/// memory and applies batch updates to it the way the sheet would, except that formulas are kept
/// as text instead of being evaluated.
pub struct TestSheet {
    data: RawTable,
    /// Columns formatted as dates: numbers written there are shown as `YYYY-MM-DD`.
    date_columns: Vec<usize>,
}

impl TestSheet {
    /// Create a new `TestSheet` holding `data`, with the first column formatted as dates.
    pub fn new(data: RawTable) -> Self {
        Self {
            data,
            date_columns: vec![0],
        }
    }

    pub fn data(&self) -> &RawTable {
        &self.data
    }

    fn insert_rows(&mut self, start: usize, end: usize) {
        let at = start.min(self.data.len());
        for _ in start..end {
            self.data.insert(at, Vec::new());
        }
    }

    fn update_cells(&mut self, request: &UpdateCellsRequest) {
        let start_row = index(request.start.row_index);
        let start_column = index(request.start.column_index);
        for (r, row) in request.rows.iter().enumerate() {
            let row_index = start_row + r;
            if self.data.len() <= row_index {
                self.data.resize(row_index + 1, Vec::new());
            }
            for (c, cell) in row.values.iter().enumerate() {
                let column_index = start_column + c;
                let text = self.render(column_index, &cell.user_entered_value);
                let target = &mut self.data[row_index];
                if target.len() <= column_index {
                    target.resize(column_index + 1, String::new());
                }
                target[column_index] = text;
            }
        }
    }

    fn render(&self, column_index: usize, value: &ExtendedValue) -> String {
        match value {
            ExtendedValue::NumberValue(n) if self.date_columns.contains(&column_index) => {
                serial_to_date(*n)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| n.to_string())
            }
            ExtendedValue::NumberValue(n) => n.to_string(),
            ExtendedValue::StringValue(s) | ExtendedValue::FormulaValue(s) => s.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn get(&mut self, _token: &str, range: &str) -> Result<RawTable, SyncError> {
        debug!("Reading {range} from the in-memory sheet");
        Ok(self.data.clone())
    }

    async fn batch_update(
        &mut self,
        _token: &str,
        request: &BatchUpdateRequest,
    ) -> Result<(), SyncError> {
        for request in &request.requests {
            match request {
                Request::InsertDimension(InsertDimensionRequest {
                    range: Some(range), ..
                }) if range.dimension == Some(Dimension::Rows) => {
                    self.insert_rows(index(range.start_index), index(range.end_index))
                }
                Request::InsertDimension(_) => {}
                Request::UpdateCells(update) => self.update_cells(update),
            }
        }
        Ok(())
    }
}

impl Default for TestSheet {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::new(load_csv(EXPENSE_DATA).unwrap_or_default())
    }
}

/// Grid indexes are `i64` on the wire. Negative ones clamp to 0.
fn index(value: i64) -> usize {
    usize::try_from(value).unwrap_or_default()
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let days = u64::try_from(serial.trunc() as i64).ok()?;
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> crate::Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("Unable to read the seed data")?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Seed expense data. The empty row above `SUM` is where new expenses are inserted.
const EXPENSE_DATA: &str = r##"Date,Category,Total,Paid by,Alice,Bob,,,Month,Year
2025-09-28,Groceries,"12,480 Ft",Alice,"6,240 Ft","6,240 Ft",,,9,2025
2025-10-02,Utilities,"18,900 Ft",Bob,"9,450 Ft","9,450 Ft",,,10,2025
2025-10-05,Groceries,"9,315 Ft",Alice,"4,658 Ft","4,658 Ft",,,10,2025
2025-10-09,Restaurants,"15,200 Ft",Bob,"7,600 Ft","7,600 Ft",,,10,2025
2025-10-12,Groceries,"7,850 Ft",Bob,"3,925 Ft","3,925 Ft",,,10,2025
2025-10-14,Transport,"4,500 Ft",Alice,"2,250 Ft","2,250 Ft",,,10,2025
,,,,,,,,,
SUM,,"68,245 Ft",,"34,123 Ft","34,123 Ft",,,,
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CellData, DimensionRange, GridCoordinate, RowData};
    use crate::table;

    #[test]
    fn test_seed_data_parses() {
        let sheet = TestSheet::default();
        assert_eq!(table::find_sum_row_index(sheet.data()).unwrap(), 8);
        assert_eq!(sheet.data()[2][2], "18,900 Ft");
    }

    #[test]
    fn test_serial_to_date() {
        assert_eq!(serial_to_date(25569.0), NaiveDate::from_ymd_opt(1970, 1, 1));
        assert_eq!(serial_to_date(-1.0), None);
    }

    #[tokio::test]
    async fn test_batch_update_inserts_and_writes() {
        let mut sheet = TestSheet::new(vec![
            vec!["Date".to_string()],
            vec![],
            vec!["SUM".to_string()],
        ]);
        let request = BatchUpdateRequest {
            requests: vec![
                Request::InsertDimension(InsertDimensionRequest {
                    range: Some(DimensionRange {
                        sheet_id: 0,
                        dimension: Some(Dimension::Rows),
                        start_index: 1,
                        end_index: 2,
                    }),
                    inherit_from_before: Some(true),
                }),
                Request::UpdateCells(UpdateCellsRequest {
                    rows: vec![RowData {
                        values: vec![
                            CellData {
                                user_entered_value: ExtendedValue::NumberValue(25569.0),
                            },
                            CellData {
                                user_entered_value: ExtendedValue::StringValue("Food".into()),
                            },
                            CellData {
                                user_entered_value: ExtendedValue::NumberValue(20.0),
                            },
                        ],
                    }],
                    fields: "userEnteredValue".into(),
                    start: GridCoordinate {
                        sheet_id: 0,
                        row_index: 1,
                        column_index: 0,
                    },
                }),
            ],
        };
        sheet.batch_update("tok", &request).await.unwrap();
        let data = sheet.get("tok", "A:J").await.unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data[1], vec!["1970-01-01", "Food", "20"]);
        assert!(data[2].is_empty());
        assert_eq!(data[3][0], "SUM");
    }
}
