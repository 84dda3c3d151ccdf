//! # Discount Rules
//!
//! Status derivation and application of discount codes.
//!
//! ## Status Timeline
//! ```text
//!        start_date                      end_date
//!            │                               │
//!  Scheduled │            Active             │  Expired
//!  ──────────┼───────────────────────────────┼──────────►  time
//!            │   (Expired early once         │
//!            │    usage_count ≥ max_uses)    │
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Discount, DiscountStatus, DiscountValueType, Percentage};

/// Result of applying a discount to a purchase amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountOutcome {
    pub code: String,
    pub original_amount: Money,
    pub discount_amount: Money,
    pub final_amount: Money,
}

impl Discount {
    /// Whether the usage limit has been reached.
    pub fn is_exhausted(&self) -> bool {
        match self.max_uses {
            Some(max) => self.usage_count.unwrap_or(0) >= max,
            None => false,
        }
    }

    /// Derives the status at `now` from the window and usage limit.
    ///
    /// The stored `status` field is what the backend last saw; this is the
    /// authoritative answer for a given instant.
    pub fn status_at(&self, now: DateTime<Utc>) -> DiscountStatus {
        if now < self.start_date {
            DiscountStatus::Scheduled
        } else if now > self.end_date || self.is_exhausted() {
            DiscountStatus::Expired
        } else {
            DiscountStatus::Active
        }
    }

    /// The amount this discount takes off `amount`, capped at `amount`.
    fn reduction(&self, amount: Money) -> Money {
        let raw = match self.value_type {
            DiscountValueType::Percentage => amount.percentage(Percentage::new(self.value)),
            DiscountValueType::Fixed => Money::from_decimal(self.value.max(Decimal::ZERO)),
        };
        raw.min(amount)
    }

    /// Applies the discount to a purchase amount.
    ///
    /// ## Errors
    /// - `CoreError::DiscountNotActive` outside the window or once exhausted
    /// - `CoreError::MinimumPurchaseNotMet` below `minPurchaseAmount`
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use rust_decimal_macros::dec;
    /// use shopdesk_core::money::Money;
    /// use shopdesk_core::types::{Discount, DiscountStatus, DiscountType, DiscountValueType};
    ///
    /// let discount = Discount {
    ///     id: None,
    ///     code: "WELCOME10".to_string(),
    ///     discount_type: DiscountType::DiscountCode,
    ///     value: dec!(10),
    ///     value_type: DiscountValueType::Percentage,
    ///     min_purchase_amount: None,
    ///     max_uses: None,
    ///     usage_count: None,
    ///     start_date: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
    ///     end_date: Utc.with_ymd_and_hms(2026, 10, 31, 0, 0, 0).unwrap(),
    ///     status: DiscountStatus::Active,
    ///     description: None,
    /// };
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
    /// let outcome = discount.apply(Money::from_cents(5000), now).unwrap();
    /// assert_eq!(outcome.final_amount.to_string(), "$45.00");
    /// ```
    pub fn apply(&self, amount: Money, now: DateTime<Utc>) -> CoreResult<DiscountOutcome> {
        let status = self.status_at(now);
        if status != DiscountStatus::Active {
            return Err(CoreError::DiscountNotActive {
                code: self.code.clone(),
                status,
            });
        }

        if let Some(minimum) = self.min_purchase_amount {
            if amount < minimum {
                return Err(CoreError::MinimumPurchaseNotMet {
                    code: self.code.clone(),
                    minimum,
                    amount,
                });
            }
        }

        let discount_amount = self.reduction(amount);
        Ok(DiscountOutcome {
            code: self.code.clone(),
            original_amount: amount,
            discount_amount,
            final_amount: amount.saturating_sub(discount_amount),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
