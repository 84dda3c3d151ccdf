//! Property-based tests for the report aggregator.
//!
//! Bucket shapes, date-filter containment and running-total continuity are
//! checked over random order and customer histories.

use chrono::{Datelike, Days, NaiveDate, TimeZone, Utc, Weekday};
use proptest::prelude::*;
use shopdesk_core::money::Money;
use shopdesk_core::report::{
    aggregate_growth, aggregate_sales, CustomerEvent, DateRange, Period, ReportQuery,
};
use shopdesk_core::types::{Order, OrderStatus, ShippingAddress};

// =============================================================================
// Generators
// =============================================================================

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn days_back(back: u64) -> NaiveDate {
    as_of().checked_sub_days(Days::new(back)).unwrap()
}

fn order_on(date: NaiveDate, cents: i64) -> Order {
    Order {
        id: None,
        customer_id: "c1".to_string(),
        items: Vec::new(),
        shipping_address: ShippingAddress::default(),
        payment_method: "Credit Card".to_string(),
        payment_received: true,
        total_price: Money::from_cents(cents),
        status: OrderStatus::Delivered,
        created_at: Some(
            Utc.with_ymd_and_hms(date.year(), date.month(), date.day(), 12, 0, 0)
                .unwrap(),
        ),
    }
}

/// Up to 60 orders spread over the last ~2 years.
fn arb_orders() -> impl Strategy<Value = Vec<Order>> {
    proptest::collection::vec((0u64..800, 0i64..100_000), 0..60).prop_map(|rows| {
        rows.into_iter()
            .map(|(back, cents)| order_on(days_back(back), cents))
            .collect()
    })
}

fn arb_events() -> impl Strategy<Value = Vec<CustomerEvent>> {
    proptest::collection::vec((0u64..800, any::<bool>()), 0..80).prop_map(|rows| {
        rows.into_iter()
            .map(|(back, joined)| {
                if joined {
                    CustomerEvent::joined(days_back(back))
                } else {
                    CustomerEvent::churned(days_back(back))
                }
            })
            .collect()
    })
}

fn arb_period() -> impl Strategy<Value = Period> {
    prop_oneof![
        Just(Period::Daily),
        Just(Period::Weekly),
        Just(Period::Monthly),
        Just(Period::All),
    ]
}

fn arb_range() -> impl Strategy<Value = DateRange> {
    (0u64..800, 0u64..800).prop_map(|(a, b)| DateRange::new(days_back(a), days_back(b)))
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Monthly reports always have 12 chronologically increasing buckets.
    #[test]
    fn prop_monthly_has_twelve_ordered_buckets(orders in arb_orders()) {
        let report = aggregate_sales(&orders, &ReportQuery::new(Period::Monthly, as_of()));
        prop_assert_eq!(report.buckets.len(), 12);
        for pair in report.buckets.windows(2) {
            prop_assert!(pair[0].window_end < pair[1].window_start);
            prop_assert_eq!(pair[0].window_end.succ_opt(), Some(pair[1].window_start));
        }
        prop_assert_eq!(report.buckets[0].window_start.day(), 1);
    }

    /// Weekly buckets always start on Sunday and end on Saturday.
    #[test]
    fn prop_weekly_buckets_run_sunday_to_saturday(back in 0u64..3000) {
        let query = ReportQuery::new(Period::Weekly, days_back(back));
        let report = aggregate_sales::<Order>(&[], &query);
        prop_assert_eq!(report.buckets.len(), 12);
        for bucket in &report.buckets {
            prop_assert_eq!(bucket.window_start.weekday(), Weekday::Sun);
            prop_assert_eq!(bucket.window_end.weekday(), Weekday::Sat);
        }
        prop_assert!(report.buckets[11].window_end >= query.as_of);
    }

    /// Every counted order lies inside the date filter and a bucket window.
    #[test]
    fn prop_date_filter_containment(
        orders in arb_orders(),
        period in arb_period(),
        range in arb_range(),
    ) {
        let query = ReportQuery::new(period, as_of()).with_range(range);
        let report = aggregate_sales(&orders, &query);

        let expected = orders
            .iter()
            .filter_map(|o| o.created_at.map(|at| at.date_naive()))
            .filter(|d| range.contains(*d))
            .filter(|d| report.buckets.iter().any(|b| b.window_start <= *d && *d <= b.window_end))
            .count() as u64;

        prop_assert_eq!(report.summary.total_orders, expected);
        let bucket_orders: u64 = report.buckets.iter().map(|b| b.orders).sum();
        prop_assert_eq!(bucket_orders, expected);
    }

    /// The average never divides by zero and matches revenue / orders.
    #[test]
    fn prop_average_is_guarded(orders in arb_orders(), period in arb_period()) {
        let report = aggregate_sales(&orders, &ReportQuery::new(period, as_of()));
        for bucket in &report.buckets {
            if bucket.orders == 0 {
                prop_assert!(bucket.average_order_value.is_zero());
            } else {
                prop_assert_eq!(
                    bucket.average_order_value,
                    Money::average(bucket.revenue, bucket.orders)
                );
            }
        }
    }

    /// Each bucket starts where the previous one ended.
    #[test]
    fn prop_growth_running_total_is_continuous(
        events in arb_events(),
        period in arb_period(),
        seed in proptest::option::of(0u64..5000),
    ) {
        let report = aggregate_growth(&events, &ReportQuery::new(period, as_of()), seed);
        for pair in report.buckets.windows(2) {
            prop_assert_eq!(pair[0].total_at_end, pair[1].total_at_start);
        }
        if let (Some(seed), Some(first)) = (seed, report.buckets.first()) {
            prop_assert_eq!(first.total_at_start, seed);
        }
        for bucket in &report.buckets {
            let expected = (bucket.total_at_start + bucket.new_customers)
                .saturating_sub(bucket.churned_customers);
            prop_assert_eq!(bucket.total_at_end, expected);
        }
    }

    /// Summary totals are the sums of the bucket columns.
    #[test]
    fn prop_growth_summary_matches_buckets(events in arb_events(), period in arb_period()) {
        let report = aggregate_growth(&events, &ReportQuery::new(period, as_of()), None);
        let new: u64 = report.buckets.iter().map(|b| b.new_customers).sum();
        let churned: u64 = report.buckets.iter().map(|b| b.churned_customers).sum();
        prop_assert_eq!(report.summary.total_new_customers, new);
        prop_assert_eq!(report.summary.total_churned_customers, churned);
        if let Some(last) = report.buckets.last() {
            prop_assert_eq!(report.summary.current_total, last.total_at_end);
        }
    }
}
