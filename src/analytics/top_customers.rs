//! Top customers by total spend over a half-open date range.

use crate::domain::model::{CustomerSpend, Sale};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// `SELECT customer_id, SUM(amount) ... GROUP BY customer_id ORDER BY 2 DESC LIMIT n`
/// over sales with `start <= sale_date < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopCustomersQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Non-positive limits select nothing.
    pub limit: i64,
}

impl TopCustomersQuery {
    pub fn new(start: NaiveDate, end: NaiveDate, limit: i64) -> Self {
        Self { start, end, limit }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// True when no date satisfies `start <= date < end`.
    pub fn is_empty_range(&self) -> bool {
        self.start >= self.end
    }

    /// Runs the query. Equal totals are ordered by ascending customer id.
    pub fn execute<'a, I>(&self, sales: I) -> Vec<CustomerSpend>
    where
        I: IntoIterator<Item = &'a Sale>,
    {
        if self.limit <= 0 || self.is_empty_range() {
            return Vec::new();
        }

        let mut totals: HashMap<&str, f64> = HashMap::new();
        for sale in sales {
            if self.contains(sale.sale_date) {
                *totals.entry(sale.customer_id.as_str()).or_insert(0.0) += sale.amount;
            }
        }

        let mut rows: Vec<CustomerSpend> = totals
            .into_iter()
            .map(|(customer_id, total_spend)| CustomerSpend {
                customer_id: customer_id.to_string(),
                total_spend,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_spend
                .total_cmp(&a.total_spend)
                .then_with(|| a.customer_id.cmp(&b.customer_id))
        });
        rows.truncate(usize::try_from(self.limit).unwrap_or(usize::MAX));

        tracing::debug!(
            "Top customers in [{}, {}): {} rows (limit {})",
            self.start,
            self.end,
            rows.len(),
            self.limit
        );
        rows
    }

    /// The equivalent SQL statement with parameters inlined.
    pub fn to_sql(&self) -> String {
        format!(
            "SELECT customer_id, SUM(amount) AS total_spend\n\
             FROM sales\n\
             WHERE sale_date >= '{}' AND sale_date < '{}'\n\
             GROUP BY customer_id\n\
             ORDER BY total_spend DESC\n\
             LIMIT {};",
            self.start,
            self.end,
            self.limit.max(0)
        )
    }
}

/// Checks the ordering, limit and uniqueness guarantees of a query result.
pub fn verify_top_customers(rows: &[CustomerSpend], limit: i64) -> Result<()> {
    let max_len = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
    if rows.len() > max_len {
        return Err(EtlError::verification(
            "top customers",
            format!("{} rows exceed limit {}", rows.len(), limit),
        ));
    }

    for pair in rows.windows(2) {
        if pair[0].total_spend < pair[1].total_spend {
            return Err(EtlError::verification(
                "top customers",
                format!(
                    "rows out of order: {} ({}) before {} ({})",
                    pair[0].customer_id, pair[0].total_spend, pair[1].customer_id, pair[1].total_spend
                ),
            ));
        }
    }

    let mut seen = std::collections::HashSet::new();
    for row in rows {
        if !seen.insert(row.customer_id.as_str()) {
            return Err(EtlError::verification(
                "top customers",
                format!("duplicate customer id {}", row.customer_id),
            ));
        }
    }

    Ok(())
}
