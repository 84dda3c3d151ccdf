//! # shopdesk-core: Pure Business Logic for ShopDesk
//!
//! The pricing engine, the report aggregator and the domain model of the
//! ShopDesk back office. Everything here is a pure function of its inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ShopDesk Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Admin Dashboard (UI)                         │   │
//! │  │   Products ──► Orders ──► Customers ──► Discounts ──► Reports  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                shopdesk-client (Resource Store)                 │   │
//! │  │    ApiClient, EntityCache, AppState, config                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shopdesk-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │  report   │  │   types   │  │ validation│  │   │
//! │  │   │ Breakdown │  │  Sales    │  │  Product  │  │   rules   │  │   │
//! │  │   │ Calculator│  │  Growth   │  │   Order   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Customer, Discount, etc.)
//! - [`money`] - Exact decimal Money type
//! - [`pricing`] - Base price + profit + taxes → final price
//! - [`report`] - Sales and customer-growth aggregation over time windows
//! - [`discount`] - Discount status and application rules
//! - [`dashboard`] - Home page stat cards
//! - [`export`] - CSV export of report tables
//! - [`error`] - Domain error types
//! - [`validation`] - Form validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output; "today" is always a parameter
//! 2. **No I/O**: network and file system access is FORBIDDEN here
//! 3. **Decimal Money**: exact arithmetic, rounded only for display
//! 4. **Clamp, Don't Fail**: malformed form numbers become zero, kernels never error
//!
//! ## Example Usage
//!
//! ```rust
//! use shopdesk_core::money::Money;
//! use shopdesk_core::pricing::PriceCalculator;
//! use shopdesk_core::types::{Percentage, Tax};
//!
//! let mut calc = PriceCalculator::default(); // 20% profit
//! calc.set_base_price(Money::parse_input("100"));
//! calc.add_tax(Tax::new("GST", Percentage::from_input(18.0))).unwrap();
//!
//! assert_eq!(calc.breakdown().final_price.to_string(), "$141.60");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dashboard;
pub mod discount;
pub mod error;
pub mod export;
pub mod money;
pub mod pricing;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use dashboard::DashboardStats;
pub use discount::DiscountOutcome;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{compute_price, PriceBreakdown, PriceCalculator};
pub use report::{Period, ReportQuery};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Profit percentage a new product draft starts with.
pub const DEFAULT_PROFIT_PERCENTAGE: u32 = 20;

/// Products at or below this stock level raise a low-stock alert.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Maximum quantity of a single order line.
///
/// ## Business Reason
/// Catches typos like 1000 instead of 10 before the order is submitted.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Maximum SKU length.
pub const MAX_SKU_LENGTH: usize = 50;

/// Maximum length of product and customer names.
pub const MAX_NAME_LENGTH: usize = 200;
