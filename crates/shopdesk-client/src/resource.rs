//! REST resources: which entity lives under which path.

use serde::de::DeserializeOwned;
use serde::Serialize;
use shopdesk_core::types::{Customer, Discount, Order, Product};
use shopdesk_core::validation::{
    validate_customer, validate_discount, validate_order, validate_product, ValidationResult,
};

/// An entity the backend exposes as `/{PATH}` and `/{PATH}/{id}`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable singular name, used in errors and logs.
    const NAME: &'static str;

    /// Collection path segment.
    const PATH: &'static str;

    /// Backend id, `None` until created.
    fn id(&self) -> Option<&str>;

    /// Form-level checks run before any request.
    fn validate(&self) -> ValidationResult<()>;

    /// Recomputes derived fields before the entity is sent to the backend.
    fn prepare(&mut self) {}
}

impl Resource for Product {
    const NAME: &'static str = "Product";
    const PATH: &'static str = "products";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> ValidationResult<()> {
        validate_product(self)
    }

    /// Persisted prices always match basePrice, profitPercentage and taxes.
    fn prepare(&mut self) {
        self.apply_pricing();
    }
}

impl Resource for Customer {
    const NAME: &'static str = "Customer";
    const PATH: &'static str = "customers";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> ValidationResult<()> {
        validate_customer(self)
    }
}

impl Resource for Order {
    const NAME: &'static str = "Order";
    const PATH: &'static str = "orders";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> ValidationResult<()> {
        validate_order(self)
    }

    /// The submitted total is the sum of the line items.
    fn prepare(&mut self) {
        self.total_price = self.items_total();
    }
}

impl Resource for Discount {
    const NAME: &'static str = "Discount";
    const PATH: &'static str = "discounts";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> ValidationResult<()> {
        validate_discount(self)
    }
}
