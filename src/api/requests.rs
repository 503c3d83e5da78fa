//! The subset of the `spreadsheets.batchUpdate` request body used to add an expense row.
//!
//! Row and coordinate types come from `sheets::types`. The cell types are our own:
//! `sheets::types::ExtendedValue` always serializes `boolValue` and drops empty strings, and the
//! API rejects a cell value with more than one kind set.

use crate::model::ExtendedValue;
use serde::{Deserialize, Serialize};
pub use sheets::types::{Dimension, DimensionRange, GridCoordinate, InsertDimensionRequest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

/// A single operation of a batch update. Serializes as `{"insertDimension": {...}}` etc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    InsertDimension(InsertDimensionRequest),
    UpdateCells(UpdateCellsRequest),
}

/// Writes `rows` starting at `start`, touching only the cell parts named in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCellsRequest {
    pub rows: Vec<RowData>,
    pub fields: String,
    pub start: GridCoordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowData {
    pub values: Vec<CellData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub user_entered_value: ExtendedValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_batch_update() {
        let request = BatchUpdateRequest {
            requests: vec![
                Request::InsertDimension(InsertDimensionRequest {
                    range: Some(DimensionRange {
                        sheet_id: 7,
                        dimension: Some(Dimension::Rows),
                        start_index: 4,
                        end_index: 5,
                    }),
                    inherit_from_before: Some(true),
                }),
                Request::UpdateCells(UpdateCellsRequest {
                    rows: vec![RowData {
                        values: vec![
                            CellData {
                                user_entered_value: ExtendedValue::StringValue("Food".into()),
                            },
                            CellData {
                                user_entered_value: ExtendedValue::StringValue(String::new()),
                            },
                        ],
                    }],
                    fields: "userEnteredValue".into(),
                    start: GridCoordinate {
                        sheet_id: 7,
                        row_index: 4,
                        column_index: 0,
                    },
                }),
            ],
        };
        let expected = json!({
            "requests": [
                {
                    "insertDimension": {
                        "range": {
                            "sheetId": 7,
                            "dimension": "ROWS",
                            "startIndex": 4,
                            "endIndex": 5
                        },
                        "inheritFromBefore": true
                    }
                },
                {
                    "updateCells": {
                        "rows": [{ "values": [
                            { "userEnteredValue": { "stringValue": "Food" } },
                            { "userEnteredValue": { "stringValue": "" } }
                        ] }],
                        "fields": "userEnteredValue",
                        "start": { "sheetId": 7, "rowIndex": 4 }
                    }
                }
            ]
        });
        assert_eq!(serde_json::to_value(&request).unwrap(), expected);
    }

    #[test]
    fn test_sheets_extended_value_sets_two_kinds() {
        let value = sheets::types::ExtendedValue {
            bool_value: false,
            error_value: None,
            formula_value: String::new(),
            number_value: 0.0,
            string_value: "Food".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({ "boolValue": false, "stringValue": "Food" })
        );
    }
}
