//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Pricing chains percentages:                                            │
//! │    base × 20% profit × 18% GST × 2% Cess ...                            │
//! │    Rounding each step to cents compounds the bias.                      │
//! │                                                                         │
//! │  OUR SOLUTION: Exact Decimal, Round Only For Display                    │
//! │    All arithmetic stays exact in `rust_decimal::Decimal`                │
//! │    Two-decimal rounding happens in `rounded()` / `Display` only         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopdesk_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//!
//! let doubled = price * 2u32;                  // $21.98
//! let total = price + Money::from_cents(500);  // $15.99
//! assert_eq!(total.to_string(), "$15.99");
//!
//! // Live form input is clamped, never rejected
//! assert!(Money::parse_input("abc").is_zero());
//! assert!(Money::from_input(-5.0).is_zero());
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Percentage;

/// Decimal places used when presenting money.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value as an exact decimal.
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact for the percentages the pricing engine
///   applies; sign allows refunds and discount deltas
/// - **Single field tuple struct**: zero-cost abstraction over Decimal
/// - **Serialized as a JSON number**: the REST API speaks plain numbers
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.base_price ──► price_with_profit ──► final_price               │
/// │                                                  │                      │
/// │                                                  ▼                      │
/// │  OrderItem.price × quantity ──► Order.total_price ──► Sales report      │
/// │                                                                         │
/// │  Discount.value / min_purchase_amount ──► Discount::apply               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Creates a Money value from an exact decimal.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use shopdesk_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Creates a Money value from a raw float typed into a form.
    ///
    /// ## Clamping Rules
    /// - NaN, infinite or unrepresentable → zero
    /// - Negative → zero
    ///
    /// The pricing calculator runs on every keystroke, so half-typed input
    /// must produce a number rather than an error.
    pub fn from_input(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Money::zero();
        }
        Money(Decimal::from_f64(value).unwrap_or(Decimal::ZERO))
    }

    /// Parses form text into Money using the same clamping as `from_input`.
    ///
    /// ## Example
    /// ```rust
    /// use shopdesk_core::money::Money;
    ///
    /// assert_eq!(Money::parse_input(" 12.50 ").to_string(), "$12.50");
    /// assert!(Money::parse_input("").is_zero());
    /// assert!(Money::parse_input("-3").is_zero());
    /// ```
    pub fn parse_input(text: &str) -> Self {
        let text = text.trim();
        let parsed = text
            .parse::<Decimal>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().and_then(Decimal::from_f64));

        match parsed {
            Some(amount) if amount.is_sign_positive() => Money(amount),
            _ => Money::zero(),
        }
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the given percentage of this amount, exactly.
    ///
    /// ## Example
    /// ```rust
    /// use shopdesk_core::money::Money;
    /// use shopdesk_core::types::Percentage;
    ///
    /// let price = Money::from_cents(12000); // $120.00
    /// let gst = price.percentage(Percentage::from_input(18.0));
    /// assert_eq!(gst.to_string(), "$21.60");
    /// ```
    pub fn percentage(&self, rate: Percentage) -> Money {
        Money(self.0.saturating_mul(rate.value()) / Decimal::ONE_HUNDRED)
    }

    /// Divides a total evenly over `count` items.
    ///
    /// Returns zero when `count` is zero; averages never divide by zero.
    pub fn average(total: Money, count: u64) -> Money {
        if count == 0 {
            return Money::zero();
        }
        Money(total.0 / Decimal::from(count))
    }

    /// Subtracts, flooring the result at zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        if other.0 >= self.0 {
            Money::zero()
        } else {
            Money(self.0 - other.0)
        }
    }

    /// Returns the value rounded to two decimals (presentation only).
    ///
    /// Uses Bankers Rounding (midpoint to even) so repeated display rounding
    /// does not drift in one direction.
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Returns the value as f64 (charts and ratios only, never arithmetic).
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the value rounded to two decimals with a dollar sign.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(
            f,
            "{}${:.prec$}",
            sign,
            rounded.abs(),
            prec = DISPLAY_DECIMALS as usize
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
