use chrono::{Days, NaiveDate};
use datafun_analytics::analytics::verify_top_customers;
use datafun_analytics::{Sale, TopCustomersQuery};
use proptest::prelude::*;
use std::collections::HashMap;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Whole cents over a handful of customers, so sums stay exact and ids repeat.
fn sale_strategy() -> impl Strategy<Value = Sale> {
    (0u32..12, 0u32..100_000, 0u64..60).prop_map(|(customer, cents, day)| {
        Sale::new(
            format!("C{}", customer),
            f64::from(cents) / 100.0,
            base_date() + Days::new(day),
        )
    })
}

fn sales_strategy() -> impl Strategy<Value = Vec<Sale>> {
    prop::collection::vec(sale_strategy(), 0..80)
}

/// Ranges from empty to a month long; limits include zero and negatives.
fn query_strategy() -> impl Strategy<Value = TopCustomersQuery> {
    (0u64..60, 0u64..30, -2i64..13).prop_map(|(offset, length, limit)| {
        let start = base_date() + Days::new(offset);
        TopCustomersQuery::new(start, start + Days::new(length), limit)
    })
}

fn expected_totals(sales: &[Sale], query: &TopCustomersQuery) -> HashMap<String, f64> {
    let mut totals = HashMap::new();
    for sale in sales.iter().filter(|s| query.contains(s.sale_date)) {
        *totals.entry(sale.customer_id.clone()).or_insert(0.0) += sale.amount;
    }
    totals
}

proptest! {
    /// Never more rows than a non-negative limit allows.
    #[test]
    fn rows_never_exceed_limit(sales in sales_strategy(), query in query_strategy()) {
        let rows = query.execute(&sales);
        prop_assert!(rows.len() as i64 <= query.limit.max(0));
        prop_assert!(verify_top_customers(&rows, query.limit).is_ok());
        if query.limit > 0 {
            prop_assert_eq!(rows.len(), expected_totals(&sales, &query).len().min(query.limit as usize));
        }
    }

    /// Totals never increase down the list; equal totals go by customer id.
    #[test]
    fn rows_are_ordered_by_total_then_id(sales in sales_strategy(), query in query_strategy()) {
        let rows = query.execute(&sales);
        for pair in rows.windows(2) {
            prop_assert!(pair[0].total_spend >= pair[1].total_spend);
            if pair[0].total_spend == pair[1].total_spend {
                prop_assert!(pair[0].customer_id < pair[1].customer_id);
            }
        }
    }

    /// Every listed customer has at least one sale inside the range.
    #[test]
    fn rows_only_list_customers_with_sales_in_range(
        sales in sales_strategy(),
        query in query_strategy(),
    ) {
        for row in query.execute(&sales) {
            prop_assert!(sales
                .iter()
                .any(|s| s.customer_id == row.customer_id && query.contains(s.sale_date)));
        }
    }

    /// Each total is the sum of that customer's amounts inside the range.
    #[test]
    fn totals_match_in_range_sums(sales in sales_strategy(), query in query_strategy()) {
        let totals = expected_totals(&sales, &query);
        for row in query.execute(&sales) {
            let expected = totals[&row.customer_id];
            prop_assert!((row.total_spend - expected).abs() < 1e-6,
                "{} totalled {} but expected {}", row.customer_id, row.total_spend, expected);
        }
    }
}

#[test]
fn test_documented_example() {
    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    let sales = vec![
        Sale::new("C1", 10.0, day(1)),
        Sale::new("C1", 5.0, day(2)),
        Sale::new("C2", 20.0, day(1)),
    ];

    let rows = TopCustomersQuery::new(day(1), day(3), 1).execute(&sales);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].customer_id, "C2");
    assert_eq!(rows[0].total_spend, 20.0);
}
