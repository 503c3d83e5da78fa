use crate::api::Mode;
use crate::commands::{loaded_book, Out};
use crate::model::Expense;
use crate::sync::Submit;
use crate::{Config, Result};
use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;

/// Handles `expenses add`: validates the expense and adds it above the `SUM` row.
///
/// When `paid_by` is `None` the payer is whoever paid for `category` most often.
///
/// # Errors
/// - When the expense is invalid, e.g. the total is not a positive number.
/// - When loading the sheet or writing the row fails.
pub async fn add(
    config: &Config,
    mode: Mode,
    category: &str,
    total: &str,
    paid_by: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<Out<Expense>> {
    let mut book = loaded_book(config, mode).await?;
    let paid_by = match paid_by {
        Some(p) => p.to_string(),
        None => book
            .suggested_payer(category)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("There is no one to suggest as payer, pass --paid-by"))?,
    };
    let expense = Expense::validated(date, category, total, paid_by)?;
    match book
        .create_expense(&expense)
        .await
        .context("Unable to add the expense")?
    {
        Submit::Submitted => {}
        Submit::NotReady => bail!("The sheet is not loaded, nothing was added"),
    }
    if let Some(e) = book.error() {
        bail!("The expense was added but reloading failed: {e}");
    }
    Ok(Out::new(
        format!(
            "Added {} {} paid by {}\n{}",
            expense.category,
            expense.total,
            expense.paid_by,
            book.month_total_text()
        ),
        expense,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_add_suggests_payer() {
        let env = TestEnv::new().await;
        let out = add(&env.config(), Mode::Test, "Groceries", "1500", None, None)
            .await
            .unwrap();
        let expense = out.structure().unwrap();
        assert_eq!(expense.paid_by, "Alice");
        assert!(out.message().starts_with("Added Groceries 1500 paid by Alice"));
    }

    #[tokio::test]
    async fn test_add_invalid_total() {
        let env = TestEnv::new().await;
        let err = add(&env.config(), Mode::Test, "Groceries", "0", Some("Bob"), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "total: Must be greater than 0");
    }

    #[tokio::test]
    async fn test_add_unknown_category_uses_top_payer() {
        let env = TestEnv::new().await;
        let date = NaiveDate::from_ymd_opt(2025, 10, 20);
        let out = add(&env.config(), Mode::Test, "Rent", "250000", None, date)
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().paid_by, "Alice");
    }
}
