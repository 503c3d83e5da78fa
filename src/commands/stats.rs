use crate::api::Mode;
use crate::commands::{loaded_book, Out};
use crate::model::{sort_for_display, Stat};
use crate::{Config, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Categories and payers, most used first.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    pub categories: Vec<Stat>,
    pub paid_bys: Vec<Stat>,
    pub paid_bys_by_category: BTreeMap<String, Vec<Stat>>,
}

/// Handles `expenses stats`.
pub async fn stats(config: &Config, mode: Mode) -> Result<Out<StatsOutput>> {
    let book = loaded_book(config, mode).await?;
    let mut output = StatsOutput {
        categories: book.categories().to_vec(),
        paid_bys: book.paid_bys().to_vec(),
        paid_bys_by_category: book.paid_bys_by_category().clone(),
    };
    sort_for_display(&mut output.categories);
    sort_for_display(&mut output.paid_bys);
    for payers in output.paid_bys_by_category.values_mut() {
        sort_for_display(payers);
    }

    let mut message = String::from("Categories:");
    for stat in &output.categories {
        let payers = output
            .paid_bys_by_category
            .get(&stat.name)
            .map(|payers| {
                payers
                    .iter()
                    .map(|p| format!("{} {}", p.name, p.count))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        message.push_str(&format!("\n  {} ({}): {payers}", stat.name, stat.count));
    }
    message.push_str("\nPaid by:");
    for stat in &output.paid_bys {
        message.push_str(&format!("\n  {} ({})", stat.name, stat.count));
    }
    Ok(Out::new(message, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_stats() {
        let env = TestEnv::new().await;
        let out = stats(&env.config(), Mode::Test).await.unwrap();
        let output = out.structure().unwrap();

        assert_eq!(output.categories[0], Stat::new("Groceries", 3));
        assert_eq!(
            output.paid_bys,
            vec![Stat::new("Alice", 3), Stat::new("Bob", 3)]
        );
        assert_eq!(
            output.paid_bys_by_category["Groceries"],
            vec![Stat::new("Alice", 2), Stat::new("Bob", 1)]
        );
        assert!(out.message().contains("Groceries (3): Alice 2, Bob 1"));
    }
}
