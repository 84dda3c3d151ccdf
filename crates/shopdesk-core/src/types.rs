//! # Domain Types
//!
//! Core domain types shared by the kernels and the resource store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  base_price     │   │  customer_id    │   │  status         │       │
//! │  │  profit %       │   │  items[]        │   │  created_at     │       │
//! │  │  taxes[]        │   │  total_price    │   │  deactivated_at │       │
//! │  │  final_price    │   │  created_at     │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Discount     │   │   Percentage    │   │      Tax        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code, value    │   │  Decimal ≥ 0    │   │  name           │       │
//! │  │  start..end     │   │  20 = 20%       │   │  percentage     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The REST backend is document-oriented: ids arrive as `_id` and fields are
//! camelCase. Ids are `None` until the backend has assigned one.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A non-negative percentage (`18` means 18%).
///
/// ## Why Not f64?
/// Percentages multiply money; keeping them decimal keeps every tax amount
/// exact until display.
///
/// Deserialization goes through [`Percentage::new`], so a negative value
/// from the backend also becomes 0%.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(from = "Decimal", into = "Decimal")]
#[ts(export)]
pub struct Percentage(#[ts(type = "number")] Decimal);

impl Percentage {
    /// Creates a percentage, clamping negatives to zero.
    pub fn new(value: Decimal) -> Self {
        if value.is_sign_negative() {
            Percentage::zero()
        } else {
            Percentage(value)
        }
    }

    /// Creates a percentage from a raw float typed into a form.
    ///
    /// NaN, infinite and negative values become 0%.
    pub fn from_input(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Percentage::zero();
        }
        Percentage(Decimal::from_f64(value).unwrap_or(Decimal::ZERO))
    }

    /// Parses form text into a percentage using the same clamping rules.
    pub fn parse_input(text: &str) -> Self {
        let text = text.trim();
        text.parse::<Decimal>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().and_then(Decimal::from_f64))
            .map(Percentage::new)
            .unwrap_or_default()
    }

    /// Returns the percentage value (20 for 20%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(Decimal::ZERO)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Percentage {
    fn from(value: Decimal) -> Self {
        Percentage::new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Tax
// =============================================================================

/// A named tax applied on top of the price with profit.
///
/// Duplicate names are allowed; each entry is applied on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tax {
    /// Display name, e.g. "GST".
    pub name: String,

    /// Rate as a percentage of the price with profit.
    pub percentage: Percentage,
}

impl Tax {
    /// Creates a tax entry.
    pub fn new(name: impl Into<String>, percentage: Percentage) -> Self {
        Tax {
            name: name.into(),
            percentage,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Whether a product is published or kept as a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ProductStatus {
    /// Visible in the storefront.
    Live,
    /// Draft, not yet published.
    #[default]
    Saved,
}

/// A catalog product.
///
/// ## Authoritative vs Derived Pricing
/// `base_price`, `profit_percentage` and `taxes` are the source of truth.
/// `price_with_profit` and `final_price` are persisted for display only and
/// are always recomputed by [`Product::apply_pricing`] before saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Backend-assigned identifier.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    /// Image URL.
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Cost price before profit and tax.
    pub base_price: Money,

    /// Profit markup on the base price (may exceed 100).
    pub profit_percentage: Percentage,

    /// Derived: base price plus profit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price_with_profit: Option<Money>,

    /// Taxes applied on the price with profit, in display order.
    #[serde(default)]
    pub taxes: Vec<Tax>,

    /// Derived: price with profit plus all taxes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub final_price: Option<Money>,

    /// Units in stock.
    #[serde(default)]
    pub stock: i64,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    #[serde(default)]
    pub status: ProductStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub dimensions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub weight: Option<String>,
}

// =============================================================================
// Order
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
    Refunded,
    Completed,
    /// Draft order saved from the order form.
    Saved,
}

/// A line in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    /// Product id.
    #[serde(rename = "product", alias = "productId")]
    pub product_id: String,

    /// Product name at time of ordering.
    pub name: String,

    pub quantity: u32,

    /// Unit price at time of ordering (the product's final price).
    pub price: Money,
}

impl OrderItem {
    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// Where an order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Customer id.
    #[serde(rename = "customer", alias = "customerId")]
    pub customer_id: String,

    #[serde(rename = "orderItems", alias = "items", default)]
    pub items: Vec<OrderItem>,

    #[serde(default)]
    pub shipping_address: ShippingAddress,

    /// Free-form payment method label, e.g. "Credit Card".
    #[serde(default)]
    pub payment_method: String,

    #[serde(default)]
    pub payment_received: bool,

    /// Order total; the value the sales report aggregates.
    pub total_price: Money,

    #[serde(default)]
    pub status: OrderStatus,

    /// Backend-assigned creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>", optional)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Sum of `price × quantity` over all items.
    ///
    /// The order form keeps `total_price` equal to this while editing.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Whether a customer account is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
}

/// A store customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "customerName", alias = "name")]
    pub name: String,

    pub user_name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub address: Option<String>,

    #[serde(default)]
    pub status: CustomerStatus,

    /// When the customer joined (counts as "new" in growth reports).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>", optional)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the customer became Inactive (counts as "churn").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>", optional)]
    pub deactivated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Discount
// =============================================================================

/// Kind of discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiscountType {
    /// A single shared code.
    #[default]
    DiscountCode,
    /// A batch of coupon codes.
    CouponCodes,
}

/// How `Discount::value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DiscountValueType {
    /// `value` is a percentage of the purchase.
    #[default]
    Percentage,
    /// `value` is a fixed amount off.
    Fixed,
}

/// Lifecycle status of a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DiscountStatus {
    #[default]
    Active,
    Expired,
    Scheduled,
}

/// A discount or coupon definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Discount {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub code: String,

    #[serde(rename = "type", default)]
    pub discount_type: DiscountType,

    /// Percentage or fixed amount, per `value_type`.
    #[ts(type = "number")]
    pub value: Decimal,

    #[serde(default)]
    pub value_type: DiscountValueType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub min_purchase_amount: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub max_uses: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub usage_count: Option<u32>,

    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,

    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,

    #[serde(default)]
    pub status: DiscountStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
}

// =============================================================================
// Staff User
// =============================================================================

/// An authenticated staff member, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_verified: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
