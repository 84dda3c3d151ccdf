//! # Report Aggregator
//!
//! Buckets time-stamped records into calendar windows and aggregates them.
//!
//! ## Bucketing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Period     Buckets   Window                 Label                     │
//! │  ─────────  ───────   ────────────────────   ────────────────────────  │
//! │  daily      30        one calendar day       2026-10-18                │
//! │  weekly     12        Sunday .. Saturday     2026-10-18 to 2026-10-24  │
//! │  monthly    12        1st .. last of month   October 2026              │
//! │  all        0 or 1    earliest .. latest     All time                  │
//! │                                                                         │
//! │  Trailing windows end on `as_of` (the caller's "today").               │
//! │  Buckets are ordered oldest → newest and never overlap.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pipeline
//! ```text
//!   records ──► date filter ──► windows(query) ──► assign to bucket ──► fold
//!                (inclusive)                         (binary search)
//! ```
//!
//! The kernel never reads the clock: `as_of` is always supplied. All dates
//! are UTC calendar dates and every window is inclusive on both ends.

pub mod growth;
pub mod sales;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

pub use growth::{
    aggregate_growth, customer_events, CustomerEvent, CustomerEventKind, GrowthBucket,
    GrowthReport, GrowthSummary,
};
pub use sales::{aggregate_sales, SalesBucket, SalesRecord, SalesReport, SalesSummary};

/// Number of buckets in a daily report.
pub const DAILY_BUCKETS: u64 = 30;

/// Number of buckets in a weekly report.
pub const WEEKLY_BUCKETS: u64 = 12;

/// Number of buckets in a monthly report.
pub const MONTHLY_BUCKETS: i32 = 12;

/// Label of the single `all` bucket when no date filter is set.
pub const ALL_TIME_LABEL: &str = "All time";

// =============================================================================
// Period
// =============================================================================

/// Report granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
    All,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::All => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Period::Daily),
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            "all" | "all-time" => Ok(Period::All),
            other => Err(ValidationError::InvalidFormat {
                field: "period".to_string(),
                reason: format!(
                    "unknown period '{}'. Valid options: daily, weekly, monthly, all",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    start: NaiveDate,
    #[ts(as = "String")]
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range; a reversed pair is swapped rather than rejected.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            DateRange { start: a, end: b }
        } else {
            DateRange { start: b, end: a }
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// =============================================================================
// Report Query
// =============================================================================

/// What to aggregate: granularity, optional date filter, and "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportQuery {
    pub period: Period,
    #[ts(optional)]
    pub range: Option<DateRange>,
    #[ts(as = "String")]
    pub as_of: NaiveDate,
}

impl ReportQuery {
    pub fn new(period: Period, as_of: NaiveDate) -> Self {
        ReportQuery {
            period,
            range: None,
            as_of,
        }
    }

    /// Narrows the records to an inclusive date range.
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Whether a record dated `date` passes the date filter.
    pub fn admits(&self, date: NaiveDate) -> bool {
        self.range.map_or(true, |r| r.contains(date))
    }
}

// =============================================================================
// Windows
// =============================================================================

/// One report bucket's calendar window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    fn new(label: String, start: NaiveDate, end: NaiveDate) -> Self {
        Window { label, start, end }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn range_label(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}

/// First day of the month `offset` months before the month of `date`.
fn month_start_back(date: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 - offset;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Builds the ordered, non-overlapping windows for a query.
///
/// `dates` are the (already filtered) record dates; only the `all` period
/// looks at them, to span earliest..latest when no range is given.
pub fn windows<I>(query: &ReportQuery, dates: I) -> Vec<Window>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let as_of = query.as_of;

    match query.period {
        Period::Daily => (0..DAILY_BUCKETS)
            .rev()
            .filter_map(|back| as_of.checked_sub_days(Days::new(back)))
            .map(|day| Window::new(day.format("%Y-%m-%d").to_string(), day, day))
            .collect(),

        Period::Weekly => {
            let into_week = u64::from(as_of.weekday().num_days_from_sunday());
            let Some(current_start) = as_of.checked_sub_days(Days::new(into_week)) else {
                return Vec::new();
            };
            (0..WEEKLY_BUCKETS)
                .rev()
                .filter_map(|back| {
                    let start = current_start.checked_sub_days(Days::new(back * 7))?;
                    let end = start.checked_add_days(Days::new(6))?;
                    Some(Window::new(range_label(start, end), start, end))
                })
                .collect()
        }

        Period::Monthly => (0..MONTHLY_BUCKETS)
            .rev()
            .filter_map(|back| {
                let start = month_start_back(as_of, back)?;
                let end = month_start_back(as_of, back - 1)?.pred_opt()?;
                Some(Window::new(start.format("%B %Y").to_string(), start, end))
            })
            .collect(),

        Period::All => match query.range {
            Some(range) => vec![Window::new(
                range_label(range.start, range.end),
                range.start,
                range.end,
            )],
            None => {
                let mut dates = dates.into_iter();
                let Some(first) = dates.next() else {
                    return Vec::new();
                };
                let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
                vec![Window::new(ALL_TIME_LABEL.to_string(), start, end)]
            }
        },
    }
}

/// Finds the bucket a date belongs to, if any.
///
/// `windows` must be sorted and non-overlapping, as [`windows`] returns them.
pub fn bucket_index(windows: &[Window], date: NaiveDate) -> Option<usize> {
    let index = windows.partition_point(|w| w.end < date);
    windows
        .get(index)
        .filter(|w| w.contains(date))
        .map(|_| index)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_parse_and_display() {
        assert_eq!("weekly".parse::<Period>().unwrap(), Period::Weekly);
        assert_eq!("MONTH".parse::<Period>().unwrap(), Period::Monthly);
        assert_eq!(Period::All.to_string(), "all");
        assert!("yearly".parse::<Period>().is_err());
    }

    #[test]
    fn test_reversed_range_is_swapped() {
        let range = DateRange::new(date(2026, 10, 31), date(2026, 10, 1));
        assert_eq!(range.start(), date(2026, 10, 1));
        assert_eq!(range.end(), date(2026, 10, 31));
        assert!(range.contains(date(2026, 10, 31)));
        assert!(!range.contains(date(2026, 11, 1)));
    }

    #[test]
    fn test_daily_windows() {
        let query = ReportQuery::new(Period::Daily, date(2026, 10, 18));
        let windows = windows(&query, std::iter::empty());

        assert_eq!(windows.len(), 30);
        assert_eq!(windows[0].start, date(2026, 9, 19));
        assert_eq!(windows[29].label, "2026-10-18");
    }

    #[test]
    fn test_weekly_windows_start_on_sunday() {
        // 2026-10-18 is a Sunday; 2026-10-21 a Wednesday.
        let query = ReportQuery::new(Period::Weekly, date(2026, 10, 21));
        let windows = windows(&query, std::iter::empty());

        assert_eq!(windows.len(), 12);
        let last = &windows[11];
        assert_eq!(last.start, date(2026, 10, 18));
        assert_eq!(last.end, date(2026, 10, 24));
        assert_eq!(last.label, "2026-10-18 to 2026-10-24");
        assert_eq!(windows[0].start, date(2026, 8, 2));
    }

    #[test]
    fn test_monthly_windows_cross_year() {
        let query = ReportQuery::new(Period::Monthly, date(2026, 2, 10));
        let windows = windows(&query, std::iter::empty());

        assert_eq!(windows.len(), 12);
        assert_eq!(windows[0].label, "March 2025");
        assert_eq!(windows[0].end, date(2025, 3, 31));
        assert_eq!(windows[10].label, "January 2026");
        assert_eq!(windows[11].start, date(2026, 2, 1));
        assert_eq!(windows[11].end, date(2026, 2, 28));
        assert!(windows.windows(2).all(|w| w[0].end < w[1].start));
    }

    #[test]
    fn test_all_windows() {
        let query = ReportQuery::new(Period::All, date(2026, 10, 18));
        assert!(windows(&query, std::iter::empty()).is_empty());

        let spanned = windows(&query, vec![date(2026, 5, 3), date(2025, 1, 9), date(2026, 2, 1)]);
        assert_eq!(spanned.len(), 1);
        assert_eq!(spanned[0].label, ALL_TIME_LABEL);
        assert_eq!(spanned[0].start, date(2025, 1, 9));
        assert_eq!(spanned[0].end, date(2026, 5, 3));

        let ranged = query.with_range(DateRange::new(date(2026, 1, 1), date(2026, 3, 31)));
        let ranged = windows(&ranged, std::iter::empty());
        assert_eq!(ranged[0].label, "2026-01-01 to 2026-03-31");
    }

    #[test]
    fn test_bucket_index() {
        let query = ReportQuery::new(Period::Monthly, date(2026, 10, 18));
        let windows = windows(&query, std::iter::empty());

        assert_eq!(bucket_index(&windows, date(2026, 10, 31)), Some(11));
        assert_eq!(bucket_index(&windows, date(2025, 11, 1)), Some(0));
        assert_eq!(bucket_index(&windows, date(2025, 10, 31)), None);
        assert_eq!(bucket_index(&windows, date(2026, 11, 1)), None);
    }
}
