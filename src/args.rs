//! These structs provide the CLI interface for the expenses CLI.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: A command-line tool for recording shared expenses in a Google Sheet.
///
/// The sheet holds one row per expense, a spacer row and a `SUM` row below them. This program
/// shows the most recent expenses along with the total of the current month, and adds new
/// expenses right above the spacer row so that the sums keep working.
///
/// You need an OAuth access token for the Google Sheets API with the spreadsheets scope. Store it
/// with `expenses login`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. Get the URL of the spreadsheet (open the tab
    /// that holds the expenses so that the URL ends with its `gid`) and pass it as --sheet-url.
    Init(InitArgs),
    /// Store the access token used for every request.
    Login(LoginArgs),
    /// Remove the stored access token.
    Logout,
    /// Show the most recent expenses and the total of the current month.
    List,
    /// Add an expense above the SUM row.
    Add(AddArgs),
    /// Show the categories and payers, most used first.
    Stats,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration and the access token are held. Defaults to
    /// ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, expenses_home: PathBuf) -> Self {
        Self {
            log_level,
            expenses_home: expenses_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }
}

/// (Not shown): Args for the `expenses init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of your Google sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX/edit#gid=0
    #[arg(long)]
    sheet_url: String,

    /// The numeric id of the tab holding the expenses. Defaults to the `gid` in --sheet-url.
    #[arg(long)]
    sheet_id: Option<i64>,

    /// The A1 range holding the expenses table, e.g. 'Expenses!A:J'. Defaults to A:J.
    #[arg(long)]
    range: Option<String>,

    /// How many recent expenses to show. Defaults to 3.
    #[arg(long)]
    rows_limit: Option<usize>,
}

impl InitArgs {
    pub fn new(sheet_url: impl Into<String>) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            sheet_id: None,
            range: None,
            rows_limit: None,
        }
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn sheet_id(&self) -> Option<i64> {
        self.sheet_id
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    pub fn rows_limit(&self) -> Option<usize> {
        self.rows_limit
    }
}

/// (Not shown): Args for the `expenses login` command.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    /// The OAuth access token.
    #[arg(long, env = "EXPENSES_ACCESS_TOKEN", hide_env_values = true)]
    token: String,
}

impl LoginArgs {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// (Not shown): Args for the `expenses add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the money was spent on.
    #[arg(long)]
    category: String,

    /// How much was spent, e.g. 12.5
    #[arg(long)]
    total: String,

    /// Who paid. Defaults to whoever paid for this category most often.
    #[arg(long)]
    paid_by: Option<String>,

    /// When the money was spent, as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl AddArgs {
    pub fn new(
        category: impl Into<String>,
        total: impl Into<String>,
        paid_by: Option<String>,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            category: category.into(),
            total: total.into(),
            paid_by,
            date,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn total(&self) -> &str {
        &self.total
    }

    pub fn paid_by(&self) -> Option<&str> {
        self.paid_by.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default expenses home directory. If you continue using the program right now, \
                you may have problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "expenses",
            "--expenses-home",
            "/tmp/exp",
            "--log-level",
            "debug",
            "add",
            "--category",
            "Food",
            "--total",
            "12.5",
            "--date",
            "2026-10-16",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert_eq!(args.common().expenses_home().path(), Path::new("/tmp/exp"));
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        assert_eq!(add.category(), "Food");
        assert_eq!(add.total(), "12.5");
        assert_eq!(add.paid_by(), None);
        assert_eq!(add.date(), NaiveDate::from_ymd_opt(2026, 10, 16));
    }

    #[test]
    fn test_parse_init() {
        let args = Args::try_parse_from([
            "expenses",
            "init",
            "--sheet-url",
            "https://docs.google.com/spreadsheets/d/abc/edit#gid=3",
            "--rows-limit",
            "5",
        ])
        .unwrap();
        let Command::Init(init) = args.command() else {
            panic!("expected init, got {:?}", args.command());
        };
        assert_eq!(init.rows_limit(), Some(5));
        assert_eq!(init.sheet_id(), None);
        assert_eq!(init.range(), None);
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let result = Args::try_parse_from([
            "expenses", "add", "--category", "Food", "--total", "1", "--date", "16/10/2026",
        ]);
        assert!(result.is_err());
    }
}
