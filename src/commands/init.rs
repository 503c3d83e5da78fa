use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its secrets subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `expenses_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/expenses`
/// - `sheet_url` - The URL of the Google Sheet holding the expenses.
/// - `sheet_id`, `range`, `rows_limit` - Overrides for the defaults, see `Config::create`.
///
/// # Errors
/// - Returns an error if the URL is invalid or any file operations fail.
pub async fn init(
    expenses_home: &Path,
    sheet_url: &str,
    sheet_id: Option<i64>,
    range: Option<&str>,
    rows_limit: Option<usize>,
) -> Result<Out<()>> {
    let config = Config::create(expenses_home, sheet_url, sheet_id, range, rows_limit)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the expenses directory and config at '{}'",
        config.root().display()
    )
    .into())
}
