//! # Dashboard Stats
//!
//! The home page's stat cards and stock alerts.
//!
//! ## Windows
//! ```text
//!     previous window            current window
//!   ├──────────────────────┤├──────────────────────┤
//!   as_of − 2n + 1          as_of − n + 1          as_of
//! ```

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::report::DateRange;
use crate::types::{Order, Product};
use crate::LOW_STOCK_THRESHOLD;

/// Percent change from `previous` to `current`; zero when `previous` is zero.
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use shopdesk_core::dashboard::change_percent;
///
/// assert_eq!(change_percent(dec!(120), dec!(100)), dec!(20));
/// assert_eq!(change_percent(dec!(5), dec!(0)), dec!(0));
/// ```
pub fn change_percent(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    (current - previous) * Decimal::ONE_HUNDRED / previous.abs()
}

/// One stat card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatCard {
    pub title: String,
    #[ts(type = "number")]
    pub value: Decimal,
    #[ts(type = "number")]
    pub previous: Decimal,
    #[ts(type = "number")]
    pub change_percent: Decimal,
}

impl StatCard {
    fn new(title: &str, value: Decimal, previous: Decimal) -> Self {
        StatCard {
            title: title.to_string(),
            value,
            previous,
            change_percent: change_percent(value, previous),
        }
    }

    /// Whether the card shows growth (green) rather than decline.
    pub fn is_positive(&self) -> bool {
        !self.change_percent.is_sign_negative() || self.change_percent.is_zero()
    }
}

/// A product running low on stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LowStockAlert {
    #[ts(optional)]
    pub product_id: Option<String>,
    pub name: String,
    pub sku: String,
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub window_days: u32,
    pub total_sales: StatCard,
    pub total_orders: StatCard,
    pub total_items: StatCard,
    pub total_revenue: StatCard,
    pub items_in_stock: i64,
    pub low_stock: Vec<LowStockAlert>,
}

#[derive(Default)]
struct WindowTotals {
    sales: Money,
    orders: u64,
    items: u64,
}

impl WindowTotals {
    fn add(&mut self, order: &Order) {
        self.sales += order.total_price;
        self.orders += 1;
        self.items += order.items.iter().map(|i| u64::from(i.quantity)).sum::<u64>();
    }
}

impl DashboardStats {
    /// Computes the cards for the `window_days` ending on `as_of`.
    ///
    /// A `window_days` of zero is treated as one day.
    pub fn compute(
        orders: &[Order],
        products: &[Product],
        as_of: NaiveDate,
        window_days: u32,
    ) -> DashboardStats {
        let window_days = window_days.max(1);
        let span = u64::from(window_days);

        let current_start = as_of
            .checked_sub_days(Days::new(span - 1))
            .unwrap_or(NaiveDate::MIN);
        let current = DateRange::new(current_start, as_of);
        let previous = current_start
            .pred_opt()
            .map(|prev_end| {
                let prev_start = prev_end
                    .checked_sub_days(Days::new(span - 1))
                    .unwrap_or(NaiveDate::MIN);
                DateRange::new(prev_start, prev_end)
            });

        let mut now = WindowTotals::default();
        let mut before = WindowTotals::default();
        let mut revenue = Money::zero();
        let mut revenue_before_window = Money::zero();

        for order in orders {
            let date = order.created_at.map(|at| at.date_naive());

            if order.payment_received {
                revenue += order.total_price;
                if date.is_some_and(|d| d < current_start) {
                    revenue_before_window += order.total_price;
                }
            }

            match date {
                Some(d) if current.contains(d) => now.add(order),
                Some(d) if previous.is_some_and(|p| p.contains(d)) => before.add(order),
                _ => {}
            }
        }

        let low_stock = products
            .iter()
            .filter(|p| p.stock <= LOW_STOCK_THRESHOLD)
            .map(|p| LowStockAlert {
                product_id: p.id.clone(),
                name: p.name.clone(),
                sku: p.sku.clone(),
                stock: p.stock,
            })
            .collect();

        DashboardStats {
            window_days,
            total_sales: StatCard::new("Total Sales", now.sales.amount(), before.sales.amount()),
            total_orders: StatCard::new(
                "Total Orders",
                Decimal::from(now.orders),
                Decimal::from(before.orders),
            ),
            total_items: StatCard::new(
                "Total Items",
                Decimal::from(now.items),
                Decimal::from(before.items),
            ),
            total_revenue: StatCard::new(
                "Total Revenue",
                revenue.amount(),
                revenue_before_window.amount(),
            ),
            items_in_stock: products.iter().map(|p| p.stock.max(0)).sum(),
            low_stock,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
