mod api;
pub mod args;
mod book;
pub mod codec;
pub mod commands;
mod config;
mod error;
pub mod model;
mod session;
pub mod sync;
pub mod table;
#[cfg(test)]
mod test;
mod utils;

pub use api::{
    BatchUpdateRequest, CellData, Dimension, DimensionRange, GridCoordinate, GoogleSheet,
    InsertDimensionRequest, Mode, Request, RowData, Sheet, TestSheet, UpdateCellsRequest,
};
pub use book::{BookSettings, ExpenseBook};
pub use config::Config;
pub use error::{Error, Result, SyncError};
pub use model::{Expense, ExpenseError, ExpenseRow, Stat};
pub use session::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use sync::Submit;
pub use table::{ParsedTable, TotalExtraction};
