use crate::api::Mode;
use crate::commands::{loaded_book, Out};
use crate::model::ExpenseRow;
use crate::{Config, Result};
use serde::Serialize;

/// The recent expenses and the month total, as shown by `expenses list`.
#[derive(Debug, Clone, Serialize)]
pub struct ListOutput {
    pub rows: Vec<ExpenseRow>,
    pub month_total: String,
    pub spreadsheet_url: String,
}

/// Handles `expenses list`.
pub async fn list(config: &Config, mode: Mode) -> Result<Out<ListOutput>> {
    let book = loaded_book(config, mode).await?;
    let output = ListOutput {
        rows: book.rows().to_vec(),
        month_total: book.month_total_text(),
        spreadsheet_url: config.spreadsheet_url(),
    };
    Ok(Out::new(render(&output), output))
}

fn render(output: &ListOutput) -> String {
    let mut lines = Vec::with_capacity(output.rows.len() + 2);
    if output.rows.is_empty() {
        lines.push("No expenses yet".to_string());
    }
    for row in &output.rows {
        let date = row
            .expense
            .date
            .map(|d| d.format("%a %b %d %Y").to_string())
            .unwrap_or_default();
        lines.push(format!(
            "{:>4}  {date:<15}  {:<16}  {:>14}  {}",
            row.row_index, row.expense.category, row.expense.total, row.expense.paid_by
        ));
    }
    lines.push(output.month_total.clone());
    lines.push(output.spreadsheet_url.clone());
    lines.join("\n")
}
