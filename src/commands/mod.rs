//! Command handlers for the expenses CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod init;
mod list;
mod login;
mod stats;

use crate::api::Mode;
use crate::session::TokenStore;
use crate::{Config, ExpenseBook, Result};
use anyhow::bail;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use init::init;
pub use list::{list, ListOutput};
pub use login::{login, logout};
pub use stats::{stats, StatsOutput};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Creates the book for `config` and loads it.
///
/// # Errors
/// - When no access token is stored.
/// - When loading fails. A rejected token has been removed by then.
async fn loaded_book(config: &Config, mode: Mode) -> Result<ExpenseBook> {
    if config.token_store().get().await.is_none() {
        bail!("You are not logged in, run 'expenses login' first");
    }
    let mut book = ExpenseBook::from_config(config, mode);
    if let Err(e) = book.refetch().await {
        let hint = if book.is_relogin_needed() {
            "The access token has expired, run 'expenses login' again"
        } else {
            "Unable to load the expenses"
        };
        return Err(anyhow::Error::new(e).context(hint));
    }
    Ok(book)
}
