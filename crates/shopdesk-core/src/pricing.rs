//! # Pricing Engine
//!
//! Derives a product's selling price from its cost, markup and taxes.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Price Calculation                                │
//! │                                                                         │
//! │  base_price ──────┐                                                     │
//! │                   ├──► profit_amount = base × profit% / 100             │
//! │  profit % ────────┘            │                                        │
//! │                                ▼                                        │
//! │                   price_with_profit = base + profit_amount              │
//! │                                │                                        │
//! │  taxes[i] ─────────────────────┼──► tax_i = price_with_profit × tax_i%  │
//! │                                │       (each on the same base,          │
//! │                                │        never compounded)               │
//! │                                ▼                                        │
//! │                   final_price = price_with_profit + Σ tax_i             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every tax is computed against `price_with_profit`, so the order of the tax
//! rows never changes the final price. The engine has no failure mode: inputs
//! arrive already clamped as [`Money`] and [`Percentage`].
//!
//! ## Example
//! ```rust
//! use shopdesk_core::money::Money;
//! use shopdesk_core::pricing::compute_price;
//! use shopdesk_core::types::{Percentage, Tax};
//!
//! let taxes = vec![
//!     Tax::new("GST", Percentage::from_input(18.0)),
//!     Tax::new("Cess", Percentage::from_input(2.0)),
//! ];
//! let price = compute_price(Money::from_cents(10000), Percentage::from_input(20.0), &taxes);
//!
//! assert_eq!(price.price_with_profit.to_string(), "$120.00");
//! assert_eq!(price.total_tax.to_string(), "$24.00");
//! assert_eq!(price.final_price.to_string(), "$144.00");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Percentage, Product, Tax};
use crate::validation::{validate_tax, ValidationResult};
use crate::DEFAULT_PROFIT_PERCENTAGE;

// =============================================================================
// Price Breakdown
// =============================================================================

/// One tax row of a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxAmount {
    pub name: String,
    pub percentage: Percentage,
    pub amount: Money,
}

/// Result of a pricing run. All amounts are exact; round only for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceBreakdown {
    pub base_price: Money,
    pub profit_amount: Money,
    pub price_with_profit: Money,
    /// Per-tax amounts in the same order as the input rows.
    pub tax_amounts: Vec<TaxAmount>,
    pub total_tax: Money,
    pub final_price: Money,
}

/// Computes the full price breakdown.
///
/// Total and side-effect free. A negative base price is treated as zero;
/// `Percentage` is never negative.
pub fn compute_price(base_price: Money, profit: Percentage, taxes: &[Tax]) -> PriceBreakdown {
    let base_price = if base_price.is_negative() {
        Money::zero()
    } else {
        base_price
    };
    let profit_amount = base_price.percentage(profit);
    let price_with_profit = base_price + profit_amount;

    let tax_amounts: Vec<TaxAmount> = taxes
        .iter()
        .map(|tax| TaxAmount {
            name: tax.name.clone(),
            percentage: tax.percentage,
            amount: price_with_profit.percentage(tax.percentage),
        })
        .collect();

    let total_tax: Money = tax_amounts.iter().map(|t| t.amount).sum();

    PriceBreakdown {
        base_price,
        profit_amount,
        price_with_profit,
        tax_amounts,
        total_tax,
        final_price: price_with_profit + total_tax,
    }
}

impl Product {
    /// Recomputes the derived price fields from the authoritative ones.
    ///
    /// Called before every create/update so persisted `priceWithProfit` and
    /// `finalPrice` always match `basePrice`, `profitPercentage` and `taxes`.
    pub fn apply_pricing(&mut self) -> PriceBreakdown {
        let breakdown = compute_price(self.base_price, self.profit_percentage, &self.taxes);
        self.price_with_profit = Some(breakdown.price_with_profit);
        self.final_price = Some(breakdown.final_price);
        breakdown
    }
}

// =============================================================================
// Price Calculator
// =============================================================================

/// Editable pricing state behind the product form.
///
/// Every mutator recomputes the breakdown before returning, so
/// [`PriceCalculator::breakdown`] is never stale.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product Form                                                           │
/// │                                                                         │
/// │  types "100" in Base Price ──► set_base_price(parse_input("100"))       │
/// │  types "abc"               ──► set_base_price(0)      (clamped)         │
/// │  clicks Add Tax            ──► add_tax(GST, 18)  ──► breakdown updated  │
/// │  clicks ✕ on a tax row     ──► remove_tax(i)     ──► breakdown updated  │
/// │  clicks Save               ──► into_product_fields / apply_pricing      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCalculator {
    base_price: Money,
    profit_percentage: Percentage,
    taxes: Vec<Tax>,
    breakdown: PriceBreakdown,
}

impl Default for PriceCalculator {
    /// A fresh draft: zero cost, the default 20% markup, no taxes.
    fn default() -> Self {
        PriceCalculator::new(
            Money::zero(),
            Percentage::new(DEFAULT_PROFIT_PERCENTAGE.into()),
            Vec::new(),
        )
    }
}

impl PriceCalculator {
    /// Creates a calculator with the given inputs, already computed.
    pub fn new(base_price: Money, profit_percentage: Percentage, taxes: Vec<Tax>) -> Self {
        let breakdown = compute_price(base_price, profit_percentage, &taxes);
        PriceCalculator {
            base_price,
            profit_percentage,
            taxes,
            breakdown,
        }
    }

    /// Loads an existing product into the form.
    pub fn from_product(product: &Product) -> Self {
        PriceCalculator::new(
            product.base_price,
            product.profit_percentage,
            product.taxes.clone(),
        )
    }

    fn recompute(&mut self) {
        self.breakdown = compute_price(self.base_price, self.profit_percentage, &self.taxes);
    }

    pub fn set_base_price(&mut self, base_price: Money) {
        self.base_price = if base_price.is_negative() {
            Money::zero()
        } else {
            base_price
        };
        self.recompute();
    }

    pub fn set_profit_percentage(&mut self, profit: Percentage) {
        self.profit_percentage = profit;
        self.recompute();
    }

    /// Appends a tax row.
    ///
    /// ## Errors
    /// `ValidationError::Required` if the name is blank; the breakdown is
    /// left unchanged.
    pub fn add_tax(&mut self, tax: Tax) -> ValidationResult<()> {
        validate_tax(&tax)?;
        self.taxes.push(Tax {
            name: tax.name.trim().to_string(),
            percentage: tax.percentage,
        });
        self.recompute();
        Ok(())
    }

    /// Removes the tax row at `index`. Out-of-range indices are ignored.
    pub fn remove_tax(&mut self, index: usize) -> Option<Tax> {
        if index >= self.taxes.len() {
            return None;
        }
        let removed = self.taxes.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Replaces every tax row at once.
    ///
    /// ## Errors
    /// Rejects the whole list if any row has a blank name.
    pub fn set_taxes(&mut self, taxes: Vec<Tax>) -> ValidationResult<()> {
        if let Some(bad) = taxes.iter().find(|t| t.name.trim().is_empty()) {
            return Err(ValidationError::InvalidFormat {
                field: "taxes".to_string(),
                reason: format!("tax with {} has no name", bad.percentage),
            });
        }
        self.taxes = taxes;
        self.recompute();
        Ok(())
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn profit_percentage(&self) -> Percentage {
        self.profit_percentage
    }

    pub fn taxes(&self) -> &[Tax] {
        &self.taxes
    }

    /// The current, always up-to-date breakdown.
    pub fn breakdown(&self) -> &PriceBreakdown {
        &self.breakdown
    }

    /// Writes the inputs and derived prices into a product.
    pub fn apply_to(&self, product: &mut Product) {
        product.base_price = self.base_price;
        product.profit_percentage = self.profit_percentage;
        product.taxes = self.taxes.clone();
        product.price_with_profit = Some(self.breakdown.price_with_profit);
        product.final_price = Some(self.breakdown.final_price);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
