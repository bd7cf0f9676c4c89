use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the `sales` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub customer_id: String,
    pub amount: f64,
    pub sale_date: NaiveDate,
}

impl Sale {
    pub fn new(customer_id: impl Into<String>, amount: f64, sale_date: NaiveDate) -> Self {
        Self {
            customer_id: customer_id.into(),
            amount,
            sale_date,
        }
    }
}

/// Output row of the top-customers query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSpend {
    pub customer_id: String,
    pub total_spend: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stdev: f64,
}

/// Group name to number of members, ordered by name.
pub type CraftCounts = BTreeMap<String, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextSummary {
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub column: String,
    pub count: usize,
    /// Upper bound on matches given the scanned text.
    pub max_possible: usize,
}
