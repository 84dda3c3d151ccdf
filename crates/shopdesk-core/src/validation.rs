//! # Validation Module
//!
//! Input validation for the back-office forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form (live input)                                            │
//! │  ├── Numbers clamped by Money::parse_input / Percentage::parse_input   │
//! │  └── Pricing recomputed on every change, never rejected                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store (before any request)                                   │
//! │  └── THIS MODULE: required fields, formats, date windows               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST backend                                                 │
//! │  └── Uniqueness, referential checks                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopdesk_core::validation::{validate_sku, validate_quantity};
//!
//! validate_sku("MOUSE-01").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Customer, Discount, DiscountValueType, Order, Product, Tax};
use crate::{MAX_ITEM_QUANTITY, MAX_NAME_LENGTH, MAX_SKU_LENGTH};

use rust_decimal::Decimal;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a text field is present after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most `MAX_SKU_LENGTH` characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use shopdesk_core::validation::validate_sku;
///
/// assert!(validate_sku("MOUSE-01").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if sku.len() > MAX_SKU_LENGTH {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LENGTH,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (product, customer).
///
/// ## Rules
/// - Must not be empty
/// - At most `MAX_NAME_LENGTH` characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Only the shape is checked: one `@`, a non-empty local part and a dotted
/// domain. Deliverability is the backend's concern.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a tax row from the product form.
///
/// Rows without a name are rejected; the percentage is already clamped.
pub fn validate_tax(tax: &Tax) -> ValidationResult<()> {
    validate_required("tax name", &tax.name)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_ITEM_QUANTITY`
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: format!("cannot exceed {}", MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates that a money amount is not negative. Zero is allowed.
///
/// ## Example
/// ```rust
/// use shopdesk_core::money::Money;
/// use shopdesk_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("price", Money::from_cents(0)).is_ok());
/// assert!(validate_non_negative("price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a product before it is created or updated.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_name("name", &product.name)?;
    validate_sku(&product.sku)?;
    validate_non_negative("basePrice", product.base_price)?;

    if product.stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    product.taxes.iter().try_for_each(validate_tax)
}

/// Validates a customer before it is created or updated.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    validate_name("customerName", &customer.name)?;
    validate_required("userName", &customer.user_name)?;
    validate_email(&customer.email)
}

/// Validates an order before it is created or updated.
///
/// ## Rules
/// - A customer must be selected
/// - At least one item, each with a product and a valid quantity
/// - No negative prices or totals
pub fn validate_order(order: &Order) -> ValidationResult<()> {
    validate_required("customer", &order.customer_id)?;

    if order.items.is_empty() {
        return Err(ValidationError::required("orderItems"));
    }

    for item in &order.items {
        validate_required("product", &item.product_id)?;
        validate_quantity(item.quantity)?;
        validate_non_negative("price", item.price)?;
    }

    validate_non_negative("totalPrice", order.total_price)
}

/// Validates a discount before it is created or updated.
///
/// ## Rules
/// - A code is required
/// - The value is not negative; percentage discounts are at most 100
/// - The validity window does not end before it starts
pub fn validate_discount(discount: &Discount) -> ValidationResult<()> {
    validate_required("code", &discount.code)?;

    if discount.value.is_sign_negative() && !discount.value.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: "value".to_string(),
        });
    }

    if discount.value_type == DiscountValueType::Percentage
        && discount.value > Decimal::ONE_HUNDRED
    {
        return Err(ValidationError::InvalidFormat {
            field: "value".to_string(),
            reason: "percentage cannot exceed 100".to_string(),
        });
    }

    if let Some(minimum) = discount.min_purchase_amount {
        validate_non_negative("minPurchaseAmount", minimum)?;
    }

    if discount.end_date < discount.start_date {
        return Err(ValidationError::InvalidWindow {
            field: "discount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CustomerStatus, DiscountStatus, DiscountType, OrderItem, OrderStatus, Percentage,
        ProductStatus, ShippingAddress,
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn product() -> Product {
        Product {
            id: None,
            name: "Gaming Mouse".to_string(),
            image: String::new(),
            brand: "Acme".to_string(),
            category: "Peripherals".to_string(),
            description: String::new(),
            base_price: Money::from_cents(10000),
            profit_percentage: Percentage::from_input(20.0),
            price_with_profit: None,
            taxes: vec![Tax::new("GST", Percentage::from_input(18.0))],
            final_price: None,
            stock: 5,
            sku: "MOUSE-01".to_string(),
            status: ProductStatus::Saved,
            dimensions: None,
            weight: None,
        }
    }

    fn discount() -> Discount {
        Discount {
            id: None,
            code: "WELCOME10".to_string(),
            discount_type: DiscountType::DiscountCode,
            value: dec!(10),
            value_type: DiscountValueType::Percentage,
            min_purchase_amount: None,
            max_uses: None,
            usage_count: None,
            start_date: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2026, 10, 31, 0, 0, 0).unwrap(),
            status: DiscountStatus::Active,
            description: None,
        }
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("MOUSE-01").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Gaming Mouse").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("asha@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("asha").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("asha@example").is_err());
        assert!(validate_email("a b@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&product()).is_ok());

        let mut unnamed_tax = product();
        unnamed_tax.taxes.push(Tax::new(" ", Percentage::from_input(2.0)));
        assert!(matches!(
            validate_product(&unnamed_tax),
            Err(ValidationError::Required { .. })
        ));

        let mut negative_stock = product();
        negative_stock.stock = -1;
        assert!(validate_product(&negative_stock).is_err());
    }

    #[test]
    fn test_validate_customer() {
        let customer = Customer {
            id: None,
            name: "Asha".to_string(),
            user_name: "asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            address: None,
            status: CustomerStatus::Active,
            created_at: None,
            deactivated_at: None,
        };
        assert!(validate_customer(&customer).is_ok());

        let bad_email = Customer {
            email: "nope".to_string(),
            ..customer
        };
        assert!(validate_customer(&bad_email).is_err());
    }

    #[test]
    fn test_validate_order() {
        let mut order = Order {
            id: None,
            customer_id: "c1".to_string(),
            items: vec![OrderItem {
                product_id: "p1".to_string(),
                name: "Mouse".to_string(),
                quantity: 2,
                price: Money::from_cents(1999),
            }],
            shipping_address: ShippingAddress::default(),
            payment_method: "Credit Card".to_string(),
            payment_received: false,
            total_price: Money::from_cents(3998),
            status: OrderStatus::Pending,
            created_at: None,
        };
        assert!(validate_order(&order).is_ok());

        order.items[0].quantity = 0;
        assert!(validate_order(&order).is_err());

        order.items.clear();
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(&discount()).is_ok());

        let mut reversed = discount();
        std::mem::swap(&mut reversed.start_date, &mut reversed.end_date);
        assert!(matches!(
            validate_discount(&reversed),
            Err(ValidationError::InvalidWindow { .. })
        ));

        let mut too_much = discount();
        too_much.value = dec!(150);
        assert!(validate_discount(&too_much).is_err());

        too_much.value_type = DiscountValueType::Fixed;
        assert!(validate_discount(&too_much).is_ok());
    }
}
