//! Error types.
//!
//! Application plumbing (configuration, files, the command line) uses `anyhow`. The sync gateway
//! and the table parser surface a `SyncError` instead, so that callers can tell a needed re-login
//! apart from every other failure.

use crate::model::ExpenseError;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// A failure of the read or write pipeline.
#[derive(Debug)]
pub enum SyncError {
    /// The spreadsheet service answered a read with HTTP 401. The access token must be discarded
    /// and the user must log in again.
    ReauthRequired,
    /// A read returned a non-success status other than 401.
    FetchFailed(u16),
    /// No row of the fetched range has `SUM` in its first column.
    MissingSentinel,
    /// The batch update returned a non-success status.
    WriteFailed(u16),
    /// The expense could not be encoded into sheet cells.
    InvalidExpense(ExpenseError),
    /// The request never produced an HTTP status, or its body could not be read.
    Transport(anyhow::Error),
}

impl SyncError {
    pub fn is_reauth_required(&self) -> bool {
        matches!(self, SyncError::ReauthRequired)
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::ReauthRequired => write!(f, "Error 401 during expenses loading"),
            SyncError::FetchFailed(status) => {
                write!(f, "Error {status} during expenses loading")
            }
            SyncError::MissingSentinel => write!(f, "Can't find the SUM row."),
            SyncError::WriteFailed(_) => write!(f, "Error occurred. Try again."),
            SyncError::InvalidExpense(e) => write!(f, "Invalid expense: {e}"),
            SyncError::Transport(e) => write!(f, "{e:#}"),
        }
    }
}

impl StdError for SyncError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SyncError::InvalidExpense(e) => Some(e),
            SyncError::Transport(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(value: reqwest::Error) -> Self {
        SyncError::Transport(value.into())
    }
}

impl From<ExpenseError> for SyncError {
    fn from(value: ExpenseError) -> Self {
        SyncError::InvalidExpense(value)
    }
}
