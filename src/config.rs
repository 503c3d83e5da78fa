//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSES_HOME/config.json` and names the spreadsheet, the
//! tab inside it and the range holding the expenses table. The access token lives next to it in
//! `$EXPENSES_HOME/.secrets`.

use crate::session::FileTokenStore;
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "expenses";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const CONFIG_JSON: &str = "config.json";
const DEFAULT_RANGE: &str = "A:J";
const DEFAULT_ROWS_LIMIT: usize = 3;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSES_HOME` and from there it loads `$EXPENSES_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    spreadsheet_id: String,
}

impl Config {
    /// Creates the data directory, its secrets subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/expenses`
    /// - `sheet_url` - The URL of the Google Sheet, e.g.
    ///   https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX/edit#gid=0
    /// - `sheet_id` - The numeric id of the tab. Taken from the `gid` of `sheet_url` when `None`,
    ///   and `0` (the first tab) when the URL has no `gid` either.
    /// - `range` - The A1 range of the expenses table, `A:J` when `None`.
    /// - `rows_limit` - How many recent expenses to show, 3 when `None`.
    ///
    /// # Errors
    /// - Returns an error if the URL is not a Google Sheets URL or if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        sheet_url: &str,
        sheet_id: Option<i64>,
        range: Option<&str>,
        rows_limit: Option<usize>,
    ) -> Result<Self> {
        let spreadsheet_id = extract_spreadsheet_id(sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: sheet_url.to_string(),
            sheet_id: sheet_id
                .or_else(|| extract_sheet_id(sheet_url))
                .unwrap_or_default(),
            range: range.unwrap_or(DEFAULT_RANGE).to_string(),
            rows_limit: rows_limit.unwrap_or(DEFAULT_ROWS_LIMIT),
        };
        config_file.validate()?;

        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expenses home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        let config_path = root.join(CONFIG_JSON);
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            spreadsheet_id,
        })
    }

    /// This will
    /// - validate that `expenses_home` and its config file exist
    /// - load and validate the config file
    /// - validate that the secrets directory exists
    pub async fn load(expenses_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = expenses_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The expenses home directory is missing, run 'expenses init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        let secrets = root.join(SECRETS);
        if !secrets.is_dir() {
            bail!("The secrets directory is missing '{}'", secrets.display())
        }

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            spreadsheet_id,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn sheet_url(&self) -> &str {
        &self.config_file.sheet_url
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn sheet_id(&self) -> i64 {
        self.config_file.sheet_id
    }

    pub fn range(&self) -> &str {
        &self.config_file.range
    }

    pub fn rows_limit(&self) -> usize {
        self.config_file.rows_limit
    }

    /// The link that opens the expenses tab in a browser.
    pub fn spreadsheet_url(&self) -> String {
        spreadsheet_url(self.spreadsheet_id(), self.sheet_id())
    }

    /// The store holding the access token, inside the secrets directory.
    pub fn token_store(&self) -> FileTokenStore {
        FileTokenStore::new(&self.secrets)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expenses",
///   "config_version": 1,
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL/edit#gid=0",
///   "sheet_id": 0,
///   "range": "Expenses!A:J",
///   "rows_limit": 3
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expenses"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL to the Google Sheet
    sheet_url: String,

    /// The numeric id (`gid`) of the tab that holds the expenses
    #[serde(default)]
    sheet_id: i64,

    /// The A1 range that is read, from the header row down past the `SUM` row
    #[serde(default = "default_range")]
    range: String,

    /// How many recent expenses are shown
    #[serde(default = "default_rows_limit")]
    rows_limit: usize,
}

fn default_range() -> String {
    DEFAULT_RANGE.to_string()
}

fn default_rows_limit() -> usize {
    DEFAULT_ROWS_LIMIT
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or fails validation
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path.as_ref()).await?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            self.app_name
        );
        ensure!(
            self.rows_limit > 0,
            "Invalid rows_limit in config file: it must be at least 1"
        );
        ensure!(
            !self.range.trim().is_empty(),
            "Invalid range in config file: it must not be empty"
        );
        Ok(())
    }
}

/// Builds the browser link to tab `sheet_id` of spreadsheet `spreadsheet_id`.
pub fn spreadsheet_url(spreadsheet_id: &str, sheet_id: i64) -> String {
    format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}/edit?gid={sheet_id}#gid={sheet_id}")
}

/// Extracts the spreadsheet ID from a Google Sheets URL
///
/// # Arguments
/// * `url` - The Google Sheets URL (e.g., "https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...")
///
/// # Returns
/// The spreadsheet ID or an error if the URL format is invalid.
fn extract_spreadsheet_id(url: &str) -> Result<&str> {
    // URL format: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...
    // or: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID?foo=bar
    let parts: Vec<&str> = url.split('/').collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "d" && i + 1 < parts.len() {
            let id_part = parts[i + 1];
            let id = id_part
                .split('?')
                .next()
                .unwrap_or(id_part)
                .split('#')
                .next()
                .unwrap_or(id_part);
            if !id.is_empty() {
                return Ok(id);
            }
        }
    }
    Err(anyhow::anyhow!(
        "Invalid Google Sheets URL format. Expected: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    ))
}

/// Extracts the tab id from the `gid` query parameter or `#gid=` fragment of a sheet URL.
fn extract_sheet_id(url: &str) -> Option<i64> {
    let url = Url::parse(url).ok()?;
    let from_query = url
        .query_pairs()
        .find(|(k, _)| k == "gid")
        .and_then(|(_, v)| v.parse().ok());
    from_query.or_else(|| {
        url.fragment()?
            .split('&')
            .find_map(|pair| pair.strip_prefix("gid="))
            .and_then(|v| v.parse().ok())
    })
}
