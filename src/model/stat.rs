use serde::{Deserialize, Serialize};

/// How many data rows carry a given value in one column, e.g. a category or a payer.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Stat {
    pub name: String,
    pub count: usize,
}

impl Stat {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Orders stats the way they are offered to the user: most used first, then by name.
pub fn sort_for_display(stats: &mut [Stat]) {
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
}

/// The most used entry, ties going to the alphabetically first name.
pub fn most_frequent(stats: &[Stat]) -> Option<&Stat> {
    stats
        .iter()
        .min_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)))
}
