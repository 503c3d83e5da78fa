//! The spreadsheet service seen through the two calls this program makes: read a range and apply
//! a batch update.

mod requests;
mod sheet;
mod sheet_test_client;

use crate::error::SyncError;
use crate::model::RawTable;
use crate::Config;
pub use requests::{
    BatchUpdateRequest, CellData, Dimension, DimensionRange, GridCoordinate,
    InsertDimensionRequest, Request, RowData, UpdateCellsRequest,
};
pub use sheet::GoogleSheet;
pub use sheet_test_client::TestSheet;

/// Where the Google Sheets v4 REST API lives.
pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com";

/// Setting this environment variable to anything non-empty runs the program against an in-memory
/// sheet instead of Google.
pub const TEST_MODE_ENV: &str = "EXPENSES_IN_TEST_MODE";

/// Whether to talk to Google or to an in-memory stand-in.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Google,
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// One spreadsheet. The access token is passed on each call because it can be replaced or
/// cleared between calls.
#[async_trait::async_trait]
pub trait Sheet: Send {
    /// Reads `range` (A1 notation), row by row.
    ///
    /// # Errors
    /// - `SyncError::ReauthRequired` when the service answers 401.
    /// - `SyncError::FetchFailed` for any other non-success status.
    async fn get(&mut self, token: &str, range: &str) -> Result<RawTable, SyncError>;

    /// Applies all `request.requests` atomically.
    ///
    /// # Errors
    /// - `SyncError::WriteFailed` for any non-success status.
    async fn batch_update(
        &mut self,
        token: &str,
        request: &BatchUpdateRequest,
    ) -> Result<(), SyncError>;
}

/// Creates the `Sheet` for the spreadsheet in `config`.
pub fn sheet(config: &Config, mode: Mode) -> Box<dyn Sheet> {
    match mode {
        Mode::Google => Box::new(GoogleSheet::new(config.spreadsheet_id())),
        Mode::Test => Box::new(TestSheet::default()),
    }
}
