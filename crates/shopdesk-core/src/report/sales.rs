//! Sales report: revenue and order counts per window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{bucket_index, windows, Period, ReportQuery};
use crate::money::Money;
use crate::types::Order;

/// A record the sales report can aggregate.
pub trait SalesRecord {
    /// Calendar date (UTC) the sale happened on; undated records are skipped.
    fn sale_date(&self) -> Option<NaiveDate>;

    /// Amount the sale contributes to revenue.
    fn sale_amount(&self) -> Money;
}

impl SalesRecord for Order {
    fn sale_date(&self) -> Option<NaiveDate> {
        self.created_at.map(|at| at.date_naive())
    }

    fn sale_amount(&self) -> Money {
        self.total_price
    }
}

/// One row of the sales table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesBucket {
    pub label: String,
    #[ts(as = "String")]
    pub window_start: NaiveDate,
    #[ts(as = "String")]
    pub window_end: NaiveDate,
    pub revenue: Money,
    pub orders: u64,
    pub average_order_value: Money,
}

/// Totals over every bucketed record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesSummary {
    pub total_revenue: Money,
    pub total_orders: u64,
    pub average_order_value: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesReport {
    pub period: Period,
    pub buckets: Vec<SalesBucket>,
    pub summary: SalesSummary,
}

/// Aggregates sales into the query's windows.
///
/// Records outside the date filter or outside every window are ignored.
/// Empty input yields zeroed buckets (none for `all`), never an error.
pub fn aggregate_sales<R: SalesRecord>(records: &[R], query: &ReportQuery) -> SalesReport {
    let dated: Vec<(NaiveDate, Money)> = records
        .iter()
        .filter_map(|r| r.sale_date().map(|d| (d, r.sale_amount())))
        .filter(|(d, _)| query.admits(*d))
        .collect();

    let windows = windows(query, dated.iter().map(|(d, _)| *d));

    let mut totals = vec![(Money::zero(), 0u64); windows.len()];
    for (date, amount) in &dated {
        if let Some(i) = bucket_index(&windows, *date) {
            totals[i].0 += *amount;
            totals[i].1 += 1;
        }
    }

    let buckets: Vec<SalesBucket> = windows
        .into_iter()
        .zip(totals)
        .map(|(window, (revenue, orders))| SalesBucket {
            label: window.label,
            window_start: window.start,
            window_end: window.end,
            revenue,
            orders,
            average_order_value: Money::average(revenue, orders),
        })
        .collect();

    let total_revenue: Money = buckets.iter().map(|b| b.revenue).sum();
    let total_orders: u64 = buckets.iter().map(|b| b.orders).sum();

    SalesReport {
        period: query.period,
        summary: SalesSummary {
            total_revenue,
            total_orders,
            average_order_value: Money::average(total_revenue, total_orders),
        },
        buckets,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DateRange;
    use crate::types::{OrderStatus, ShippingAddress};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(y: i32, m: u32, d: u32, cents: i64) -> Order {
        Order {
            id: None,
            customer_id: "c1".to_string(),
            items: Vec::new(),
            shipping_address: ShippingAddress::default(),
            payment_method: "Credit Card".to_string(),
            payment_received: true,
            total_price: Money::from_cents(cents),
            status: OrderStatus::Delivered,
            created_at: Some(Utc.with_ymd_and_hms(y, m, d, 15, 45, 0).unwrap()),
        }
    }

    #[test]
    fn test_monthly_sales() {
        let orders = vec![
            order(2026, 10, 1, 10000),
            order(2026, 10, 18, 5000),
            order(2026, 9, 30, 2500),
            order(2024, 1, 1, 99900), // outside every window
        ];
        let query = ReportQuery::new(Period::Monthly, date(2026, 10, 18));
        let report = aggregate_sales(&orders, &query);

        assert_eq!(report.buckets.len(), 12);
        let october = &report.buckets[11];
        assert_eq!(october.label, "October 2026");
        assert_eq!(october.orders, 2);
        assert_eq!(october.revenue.amount(), dec!(150));
        assert_eq!(october.average_order_value.amount(), dec!(75));
        assert_eq!(report.buckets[10].orders, 1);

        assert_eq!(report.summary.total_orders, 3);
        assert_eq!(report.summary.total_revenue.amount(), dec!(175));
        assert_eq!(report.summary.average_order_value.to_string(), "$58.33");
    }

    #[test]
    fn test_empty_input_gives_zeroed_buckets() {
        let query = ReportQuery::new(Period::Daily, date(2026, 10, 18));
        let report = aggregate_sales::<Order>(&[], &query);

        assert_eq!(report.buckets.len(), 30);
        assert!(report.buckets.iter().all(|b| b.orders == 0 && b.revenue.is_zero()));
        assert!(report.buckets.iter().all(|b| b.average_order_value.is_zero()));
        assert_eq!(report.summary, SalesSummary::default());

        let all = aggregate_sales::<Order>(&[], &ReportQuery::new(Period::All, date(2026, 10, 18)));
        assert!(all.buckets.is_empty());
    }

    #[test]
    fn test_date_filter_narrows_records() {
        let orders = vec![
            order(2026, 10, 1, 10000),
            order(2026, 10, 10, 2000),
            order(2026, 10, 18, 5000),
        ];
        let query = ReportQuery::new(Period::Daily, date(2026, 10, 18))
            .with_range(DateRange::new(date(2026, 10, 10), date(2026, 10, 5)));
        let report = aggregate_sales(&orders, &query);

        assert_eq!(report.summary.total_orders, 1);
        assert_eq!(report.summary.total_revenue.amount(), dec!(20));
    }

    #[test]
    fn test_all_period_spans_records() {
        let orders = vec![order(2025, 3, 2, 1000), order(2026, 10, 1, 3000)];
        let query = ReportQuery::new(Period::All, date(2026, 10, 18));
        let report = aggregate_sales(&orders, &query);

        assert_eq!(report.buckets.len(), 1);
        assert_eq!(report.buckets[0].orders, 2);
        assert_eq!(report.buckets[0].window_start, date(2025, 3, 2));
    }

    #[test]
    fn test_undated_orders_are_skipped() {
        let mut undated = order(2026, 10, 1, 10000);
        undated.created_at = None;
        let query = ReportQuery::new(Period::Monthly, date(2026, 10, 18));
        let report = aggregate_sales(&[undated], &query);
        assert_eq!(report.summary.total_orders, 0);
    }
}
