//! The expense book: what a user of the spreadsheet sees and does.
//!
//! `ExpenseBook` keeps the last successfully parsed table together with the state of the most
//! recent read and write, so that a front end can render it without knowing about the gateway.

use crate::api::{self, Mode, Sheet};
use crate::error::SyncError;
use crate::model::{most_frequent, Expense, ExpenseRow, Stat};
use crate::session::TokenStore;
use crate::sync::{self, Submit};
use crate::table::{self, ParsedTable};
use crate::Config;
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Where in the spreadsheet the expenses live and how many of them to show.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookSettings {
    pub sheet_id: i64,
    pub range: String,
    pub rows_limit: usize,
}

impl From<&Config> for BookSettings {
    fn from(config: &Config) -> Self {
        Self {
            sheet_id: config.sheet_id(),
            range: config.range().to_string(),
            rows_limit: config.rows_limit(),
        }
    }
}

pub struct ExpenseBook {
    sheet: Box<dyn Sheet>,
    tokens: Box<dyn TokenStore>,
    settings: BookSettings,
    table: ParsedTable,
    sum_row_index: Option<usize>,
    is_loading: bool,
    is_relogin_needed: bool,
    error: Option<String>,
    is_creating: bool,
    create_error: Option<String>,
    today: Option<NaiveDate>,
}

impl ExpenseBook {
    pub fn new(
        sheet: Box<dyn Sheet>,
        tokens: Box<dyn TokenStore>,
        settings: BookSettings,
    ) -> Self {
        Self {
            sheet,
            tokens,
            settings,
            table: ParsedTable::default(),
            sum_row_index: None,
            is_loading: false,
            is_relogin_needed: false,
            error: None,
            is_creating: false,
            create_error: None,
            today: None,
        }
    }

    /// Creates a book for the spreadsheet in `config`, with the token kept in its secrets
    /// directory.
    pub fn from_config(config: &Config, mode: Mode) -> Self {
        Self::new(
            api::sheet(config, mode),
            Box::new(config.token_store()),
            BookSettings::from(config),
        )
    }

    /// Pins the date used for the monthly total and for undated expenses.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Reads the expenses range again and replaces the table with the result.
    ///
    /// Does nothing when there is no access token. When the token is rejected it is removed from
    /// the store and `is_relogin_needed` is set. On any failure the previously loaded table is
    /// kept and `error` describes what went wrong.
    pub async fn refetch(&mut self) -> Result<(), SyncError> {
        let Some(token) = self.tokens.get().await else {
            debug!("Not loading expenses, there is no access token");
            return Ok(());
        };
        self.error = None;
        self.is_relogin_needed = false;
        self.is_loading = true;
        let result = self.load(&token).await;
        self.is_loading = false;

        match result {
            Ok(parsed) => {
                debug!(
                    "Loaded {} recent expenses, SUM is at row index {}",
                    parsed.rows.len(),
                    parsed.sum_row_index
                );
                self.sum_row_index = Some(parsed.sum_row_index);
                self.table = parsed;
                Ok(())
            }
            Err(e) => {
                warn!("Unable to load expenses: {e}");
                if e.is_reauth_required() {
                    self.is_relogin_needed = true;
                    if let Err(clear) = self.tokens.clear().await {
                        warn!("Unable to clear the rejected access token: {clear:#}");
                    }
                }
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn load(&mut self, token: &str) -> Result<ParsedTable, SyncError> {
        let raw = sync::fetch_range(self.sheet.as_mut(), token, &self.settings.range).await?;
        table::parse(&raw, self.settings.rows_limit, self.today())
    }

    /// Adds `expense` to the spreadsheet and, once it is written, reads the table again.
    ///
    /// Returns `Submit::NotReady` without sending anything until a token is stored and the table
    /// has been loaded. A failed refresh after a successful write is reported through `error`
    /// and does not fail the write.
    pub async fn create_expense(&mut self, expense: &Expense) -> Result<Submit, SyncError> {
        self.create_error = None;
        self.is_creating = true;
        let token = self.tokens.get().await;
        let today = self.today();
        let result = sync::submit_expense(
            self.sheet.as_mut(),
            token.as_deref(),
            self.settings.sheet_id,
            self.sum_row_index,
            expense,
            today,
        )
        .await;
        self.is_creating = false;

        match result {
            Ok(Submit::Submitted) => {
                info!("Expense saved, reloading the expenses");
                if let Err(e) = self.refetch().await {
                    debug!("The reload after saving failed: {e}");
                }
                Ok(Submit::Submitted)
            }
            Ok(Submit::NotReady) => Ok(Submit::NotReady),
            Err(e) => {
                self.create_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The payer to offer for a new expense in `category`: whoever paid for it most often, or
    /// whoever paid most often overall when the category is new.
    pub fn suggested_payer(&self, category: &str) -> Option<&str> {
        self.table
            .paid_bys_by_category
            .get(category)
            .and_then(|payers| most_frequent(payers))
            .or_else(|| most_frequent(&self.table.paid_bys))
            .map(|stat| stat.name.as_str())
    }

    /// E.g. `October total: 68,245 Ft`.
    pub fn month_total_text(&self) -> String {
        let month = self.today().format("%B");
        let total = format_num::format_num!(",.0f", self.table.current_month_total as f64);
        format!("{month} total: {total} {}", self.table.currency)
            .trim_end()
            .to_string()
    }

    pub fn rows(&self) -> &[ExpenseRow] {
        &self.table.rows
    }

    pub fn categories(&self) -> &[Stat] {
        &self.table.categories
    }

    pub fn paid_bys(&self) -> &[Stat] {
        &self.table.paid_bys
    }

    pub fn paid_bys_by_category(&self) -> &BTreeMap<String, Vec<Stat>> {
        &self.table.paid_bys_by_category
    }

    pub fn currency(&self) -> &str {
        &self.table.currency
    }

    pub fn current_month_total(&self) -> u64 {
        self.table.current_month_total
    }

    pub fn sum_row_index(&self) -> Option<usize> {
        self.sum_row_index
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_relogin_needed(&self) -> bool {
        self.is_relogin_needed
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_creating(&self) -> bool {
        self.is_creating
    }

    pub fn create_error(&self) -> Option<&str> {
        self.create_error.as_deref()
    }
}
