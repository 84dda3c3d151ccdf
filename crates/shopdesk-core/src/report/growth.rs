//! # Customer Growth Report
//!
//! Tracks the running customer count through the report windows.
//!
//! ## Running Total
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  seed = explicit seed, or joins − churns before the first window        │
//! │                                                                         │
//! │  bucket 0:  start = seed                                                │
//! │             end   = start + new − churned   (floored at 0)              │
//! │  bucket n:  start = end of bucket n−1                                   │
//! │                                                                         │
//! │  growth rate = start > 0 ? (end − start) / start × 100 : 0              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{bucket_index, windows, Period, ReportQuery};
use crate::types::{Customer, CustomerStatus};

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum CustomerEventKind {
    Joined,
    Churned,
}

/// A dated change to the customer count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerEvent {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub kind: CustomerEventKind,
}

impl CustomerEvent {
    pub fn joined(date: NaiveDate) -> Self {
        CustomerEvent {
            date,
            kind: CustomerEventKind::Joined,
        }
    }

    pub fn churned(date: NaiveDate) -> Self {
        CustomerEvent {
            date,
            kind: CustomerEventKind::Churned,
        }
    }
}

/// Derives growth events from customer records.
///
/// Every customer with a `createdAt` joins on that date; an Inactive
/// customer with a `deactivatedAt` churns on that date.
pub fn customer_events(customers: &[Customer]) -> Vec<CustomerEvent> {
    let mut events = Vec::with_capacity(customers.len());
    for customer in customers {
        if let Some(at) = customer.created_at {
            events.push(CustomerEvent::joined(at.date_naive()));
        }
        if customer.status == CustomerStatus::Inactive {
            if let Some(at) = customer.deactivated_at {
                events.push(CustomerEvent::churned(at.date_naive()));
            }
        }
    }
    events
}

// =============================================================================
// Report Types
// =============================================================================

/// One row of the growth table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GrowthBucket {
    pub label: String,
    #[ts(as = "String")]
    pub window_start: NaiveDate,
    #[ts(as = "String")]
    pub window_end: NaiveDate,
    pub new_customers: u64,
    pub churned_customers: u64,
    pub total_at_start: u64,
    pub total_at_end: u64,
    /// Percent change over the window; negative when churn outpaced joins,
    /// zero when the window started with no customers.
    #[ts(type = "number")]
    pub growth_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GrowthSummary {
    pub total_new_customers: u64,
    pub total_churned_customers: u64,
    /// Arithmetic mean of the bucket growth rates.
    #[ts(type = "number")]
    pub average_growth_rate: Decimal,
    pub current_total: u64,
    /// Churned / total at end of the latest bucket, as a percentage.
    #[ts(type = "number")]
    pub latest_churn_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GrowthReport {
    pub period: Period,
    pub buckets: Vec<GrowthBucket>,
    pub summary: GrowthSummary,
}

// =============================================================================
// Aggregation
// =============================================================================

/// `part / whole × 100`, or zero when `whole` is zero.
fn percent_of(part: Decimal, whole: u64) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    part * Decimal::ONE_HUNDRED / Decimal::from(whole)
}

/// Aggregates customer events into the query's windows.
///
/// ## Seed
/// `seed` sets the customer count at the start of the first window. When
/// `None`, it is derived from the (filtered) events before that window.
pub fn aggregate_growth(
    events: &[CustomerEvent],
    query: &ReportQuery,
    seed: Option<u64>,
) -> GrowthReport {
    let admitted: Vec<&CustomerEvent> = events.iter().filter(|e| query.admits(e.date)).collect();
    let windows = windows(query, admitted.iter().map(|e| e.date));

    let mut counts = vec![(0u64, 0u64); windows.len()];
    let mut prior_joins = 0u64;
    let mut prior_churns = 0u64;
    let first_start = windows.first().map(|w| w.start);

    for event in &admitted {
        match bucket_index(&windows, event.date) {
            Some(i) => match event.kind {
                CustomerEventKind::Joined => counts[i].0 += 1,
                CustomerEventKind::Churned => counts[i].1 += 1,
            },
            None if first_start.is_some_and(|s| event.date < s) => match event.kind {
                CustomerEventKind::Joined => prior_joins += 1,
                CustomerEventKind::Churned => prior_churns += 1,
            },
            None => {}
        }
    }

    let mut running = seed.unwrap_or_else(|| prior_joins.saturating_sub(prior_churns));

    let buckets: Vec<GrowthBucket> = windows
        .into_iter()
        .zip(counts)
        .map(|(window, (new_customers, churned_customers))| {
            let total_at_start = running;
            let total_at_end = total_at_start
                .saturating_add(new_customers)
                .saturating_sub(churned_customers);
            running = total_at_end;

            let change = Decimal::from(total_at_end) - Decimal::from(total_at_start);
            GrowthBucket {
                label: window.label,
                window_start: window.start,
                window_end: window.end,
                new_customers,
                churned_customers,
                total_at_start,
                total_at_end,
                growth_rate: percent_of(change, total_at_start),
            }
        })
        .collect();

    let average_growth_rate = if buckets.is_empty() {
        Decimal::ZERO
    } else {
        buckets.iter().map(|b| b.growth_rate).sum::<Decimal>() / Decimal::from(buckets.len())
    };

    let latest_churn_rate = buckets.last().map_or(Decimal::ZERO, |b| {
        percent_of(Decimal::from(b.churned_customers), b.total_at_end)
    });

    GrowthReport {
        period: query.period,
        summary: GrowthSummary {
            total_new_customers: buckets.iter().map(|b| b.new_customers).sum(),
            total_churned_customers: buckets.iter().map(|b| b.churned_customers).sum(),
            average_growth_rate,
            current_total: running,
            latest_churn_rate,
        },
        buckets,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
