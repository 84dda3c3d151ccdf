//! CSV export of report tables.
//!
//! Writes into an in-memory buffer; saving the bytes is the caller's job.
//! Amounts and rates are written with two decimals and no currency symbol.

use csv::Writer;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CoreError, CoreResult};
use crate::money::DISPLAY_DECIMALS;
use crate::report::{GrowthReport, SalesReport};

fn two_places(value: Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointNearestEven);
    format!("{:.prec$}", rounded, prec = DISPLAY_DECIMALS as usize)
}

fn finish(writer: Writer<Vec<u8>>) -> CoreResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Export(e.to_string()))
}

fn export_err(err: csv::Error) -> CoreError {
    CoreError::Export(err.to_string())
}

/// Sales table: one header row, one row per bucket.
pub fn sales_report_csv(report: &SalesReport) -> CoreResult<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record([
            "period",
            "window_start",
            "window_end",
            "revenue",
            "orders",
            "average_order_value",
        ])
        .map_err(export_err)?;

    for bucket in &report.buckets {
        writer
            .write_record([
                bucket.label.clone(),
                bucket.window_start.to_string(),
                bucket.window_end.to_string(),
                two_places(bucket.revenue.amount()),
                bucket.orders.to_string(),
                two_places(bucket.average_order_value.amount()),
            ])
            .map_err(export_err)?;
    }

    finish(writer)
}

/// Growth table: one header row, one row per bucket.
pub fn growth_report_csv(report: &GrowthReport) -> CoreResult<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record([
            "period",
            "window_start",
            "window_end",
            "new_customers",
            "churned_customers",
            "total_at_start",
            "total_at_end",
            "growth_rate",
        ])
        .map_err(export_err)?;

    for bucket in &report.buckets {
        writer
            .write_record([
                bucket.label.clone(),
                bucket.window_start.to_string(),
                bucket.window_end.to_string(),
                bucket.new_customers.to_string(),
                bucket.churned_customers.to_string(),
                bucket.total_at_start.to_string(),
                bucket.total_at_end.to_string(),
                two_places(bucket.growth_rate),
            ])
            .map_err(export_err)?;
    }

    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::report::{aggregate_growth, aggregate_sales, CustomerEvent, Period, ReportQuery};
    use crate::types::{Order, OrderStatus, ShippingAddress};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_sales_csv() {
        let order = Order {
            id: None,
            customer_id: "c1".to_string(),
            items: Vec::new(),
            shipping_address: ShippingAddress::default(),
            payment_method: "Cash".to_string(),
            payment_received: true,
            total_price: Money::from_cents(10000),
            status: OrderStatus::Completed,
            created_at: Some(Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()),
        };
        let mut smaller = order.clone();
        smaller.total_price = Money::from_cents(5000);
        let orders = vec![order.clone(), order, smaller];
        let report = aggregate_sales(&orders, &ReportQuery::new(Period::All, as_of()));
        let csv = sales_report_csv(&report).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "period,window_start,window_end,revenue,orders,average_order_value"
        );
        assert_eq!(lines[1], "All time,2026-10-18,2026-10-18,250.00,3,83.33");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_growth_csv() {
        let events = vec![CustomerEvent::joined(as_of())];
        let report = aggregate_growth(&events, &ReportQuery::new(Period::Monthly, as_of()), Some(3));
        let csv = growth_report_csv(&report).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(
            lines[12],
            "October 2026,2026-10-01,2026-10-31,1,0,3,4,33.33"
        );
    }
}
