//! Store operations against an in-memory backend.
//!
//! Covers cache semantics of create/update/delete, error surfacing and
//! recovery, pricing recomputation and validation before any request.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use serde_json::Value;
use shopdesk_client::{
    AppState, Backend, ClientError, ClientResult, ReportSettings, Resource, Session, StoreEvent,
};
use shopdesk_core::money::Money;
use shopdesk_core::types::{
    Customer, CustomerStatus, Order, OrderItem, OrderStatus, Percentage, Product, ProductStatus,
    ShippingAddress, Tax,
};

// =============================================================================
// In-memory Backend
// =============================================================================

/// Stores entities as JSON per collection path and assigns numeric ids.
#[derive(Default)]
struct MemoryBackend {
    tables: Mutex<HashMap<&'static str, Vec<Value>>>,
    next_id: AtomicU64,
    requests: AtomicUsize,
    fail_next: Mutex<Option<(u16, String)>>,
}

impl MemoryBackend {
    fn fail_next(&self, status: u16, message: &str) {
        *self.fail_next.lock().unwrap() = Some((status, message.to_string()));
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn stored(&self, path: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self) -> ClientResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.fail_next.lock().unwrap().take() {
            Some((status, message)) => Err(ClientError::Http { status, message }),
            None => Ok(()),
        }
    }

    fn not_found<T: Resource>(id: &str) -> ClientError {
        ClientError::NotFound {
            resource: T::NAME.to_string(),
            id: id.to_string(),
        }
    }
}

fn id_of(value: &Value) -> Option<&str> {
    value.get("_id").and_then(Value::as_str)
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list<T: Resource>(&self, _token: Option<&str>) -> ClientResult<Vec<T>> {
        self.check()?;
        self.stored(T::PATH)
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(ClientError::from))
            .collect()
    }

    async fn get<T: Resource>(&self, id: &str, _token: Option<&str>) -> ClientResult<T> {
        self.check()?;
        let value = self
            .stored(T::PATH)
            .into_iter()
            .find(|v| id_of(v) == Some(id))
            .ok_or_else(|| Self::not_found::<T>(id))?;
        Ok(serde_json::from_value(value)?)
    }

    async fn create<T: Resource>(&self, item: &T, _token: Option<&str>) -> ClientResult<T> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut value = serde_json::to_value(item)?;
        value["_id"] = Value::String(id.to_string());
        self.tables
            .lock()
            .unwrap()
            .entry(T::PATH)
            .or_default()
            .push(value.clone());
        Ok(serde_json::from_value(value)?)
    }

    async fn update<T: Resource>(
        &self,
        id: &str,
        item: &T,
        _token: Option<&str>,
    ) -> ClientResult<T> {
        self.check()?;
        let mut value = serde_json::to_value(item)?;
        value["_id"] = Value::String(id.to_string());
        let mut tables = self.tables.lock().unwrap();
        let slot = tables
            .entry(T::PATH)
            .or_default()
            .iter_mut()
            .find(|v| id_of(v) == Some(id))
            .ok_or_else(|| Self::not_found::<T>(id))?;
        *slot = value.clone();
        drop(tables);
        Ok(serde_json::from_value(value)?)
    }

    async fn delete<T: Resource>(&self, id: &str, _token: Option<&str>) -> ClientResult<()> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(T::PATH).or_default();
        let before = rows.len();
        rows.retain(|v| id_of(v) != Some(id));
        if rows.len() == before {
            return Err(Self::not_found::<T>(id));
        }
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

async fn signed_in() -> AppState<MemoryBackend> {
    let state = AppState::new(MemoryBackend::default(), ReportSettings::default());
    state.sign_in(Session::from_token("test-token")).await;
    state
}

fn product(name: &str, sku: &str) -> Product {
    Product {
        id: None,
        name: name.to_string(),
        image: String::new(),
        brand: "Acme".to_string(),
        category: "Kitchen".to_string(),
        description: String::new(),
        base_price: Money::parse_input("100"),
        profit_percentage: Percentage::from_input(20.0),
        price_with_profit: None,
        taxes: vec![
            Tax::new("GST", Percentage::from_input(18.0)),
            Tax::new("Cess", Percentage::from_input(2.0)),
        ],
        final_price: None,
        stock: 25,
        sku: sku.to_string(),
        status: ProductStatus::Live,
        dimensions: None,
        weight: None,
    }
}

fn customer(name: &str) -> Customer {
    Customer {
        id: None,
        name: name.to_string(),
        user_name: name.to_lowercase(),
        email: format!("{}@shop.test", name.to_lowercase()),
        phone: None,
        address: None,
        status: CustomerStatus::Active,
        created_at: None,
        deactivated_at: None,
    }
}

fn order(customer_id: &str) -> Order {
    Order {
        id: None,
        customer_id: customer_id.to_string(),
        items: vec![
            OrderItem {
                product_id: "1".to_string(),
                name: "Mug".to_string(),
                quantity: 2,
                price: Money::from_cents(14400),
            },
            OrderItem {
                product_id: "2".to_string(),
                name: "Plate".to_string(),
                quantity: 1,
                price: Money::from_cents(550),
            },
        ],
        shipping_address: ShippingAddress::default(),
        payment_method: "Cash".to_string(),
        payment_received: false,
        total_price: Money::zero(),
        status: OrderStatus::Pending,
        created_at: None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_create_product_recomputes_pricing_before_persist() {
    let state = signed_in().await;

    let created = state.create_product(&product("Mug", "MUG-1")).await.unwrap();

    assert_eq!(created.id.as_deref(), Some("1"));
    assert_eq!(created.price_with_profit, Some(Money::from_cents(12000)));
    assert_eq!(created.final_price, Some(Money::from_cents(14400)));

    let stored = state.backend().stored("products");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["finalPrice"].as_f64(), Some(144.0));

    let cache = state.snapshot::<Product>().await;
    assert_eq!(cache.items, vec![created]);
    assert!(cache.success);
    assert!(cache.error.is_none());
}

#[tokio::test]
async fn test_save_product_updates_stale_prices() {
    let state = signed_in().await;
    let mut saved = state.save_product(&product("Mug", "MUG-1")).await.unwrap();

    saved.base_price = Money::parse_input("200");
    let updated = state.save_product(&saved).await.unwrap();

    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.final_price, Some(Money::from_cents(28800)));
    assert_eq!(state.snapshot::<Product>().await.items.len(), 1);
}

#[tokio::test]
async fn test_update_replaces_list_entry_and_selection() {
    let state = signed_in().await;
    let asha = state.create_customer(&customer("Asha")).await.unwrap();
    state.create_customer(&customer("Ben")).await.unwrap();
    let id = asha.id.clone().unwrap();
    state.get_customer(&id).await.unwrap();

    let mut renamed = asha.clone();
    renamed.name = "Asha Rao".to_string();
    state.update_customer(&renamed).await.unwrap();

    let cache = state.snapshot::<Customer>().await;
    assert_eq!(cache.items.len(), 2);
    assert_eq!(cache.items[0].name, "Asha Rao");
    assert_eq!(
        cache.selected.as_ref().map(|c| c.name.as_str()),
        Some("Asha Rao")
    );
}

#[tokio::test]
async fn test_delete_removes_from_cache() {
    let state = signed_in().await;
    let asha = state.create_customer(&customer("Asha")).await.unwrap();
    let ben = state.create_customer(&customer("Ben")).await.unwrap();

    state.delete_customer(asha.id.as_deref().unwrap()).await.unwrap();

    let cache = state.snapshot::<Customer>().await;
    assert_eq!(cache.items, vec![ben]);
    assert_eq!(state.backend().stored("customers").len(), 1);
}

#[tokio::test]
async fn test_fetch_replaces_collection() {
    let state = signed_in().await;
    state.create_product(&product("Mug", "MUG-1")).await.unwrap();
    state.create_product(&product("Plate", "PLT-1")).await.unwrap();

    state.sign_out().await;
    state.sign_in(Session::from_token("test-token")).await;
    assert!(state.snapshot::<Product>().await.items.is_empty());

    let products = state.fetch_products().await.unwrap();
    assert_eq!(products.len(), 2);
    let cache = state.snapshot::<Product>().await;
    assert_eq!(cache.items.len(), 2);
    assert!(!cache.loading);
    assert!(!cache.success);
}

#[tokio::test]
async fn test_backend_error_message_is_surfaced_then_cleared() {
    let state = signed_in().await;
    state.create_product(&product("Mug", "MUG-1")).await.unwrap();

    state.backend().fail_next(400, "SKU already exists");
    let err = state
        .create_product(&product("Mug 2", "MUG-1"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "SKU already exists");

    let cache = state.snapshot::<Product>().await;
    assert_eq!(cache.error.as_deref(), Some("SKU already exists"));
    assert_eq!(cache.items.len(), 1);
    assert!(!cache.loading);
    assert!(!cache.success);

    state.create_product(&product("Mug 2", "MUG-2")).await.unwrap();
    let cache = state.snapshot::<Product>().await;
    assert!(cache.error.is_none());
    assert_eq!(cache.items.len(), 2);
}

#[tokio::test]
async fn test_validation_runs_before_any_request() {
    let state = signed_in().await;

    let err = state.create_product(&product("", "MUG-1")).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let mut empty_order = order("c1");
    empty_order.items.clear();
    let err = state.create_order(&empty_order).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    assert_eq!(state.backend().requests(), 0);
    assert!(state.snapshot::<Product>().await.error.is_some());
}

#[tokio::test]
async fn test_order_total_follows_items() {
    let state = signed_in().await;

    let created = state.create_order(&order("c1")).await.unwrap();

    assert_eq!(created.total_price, Money::from_cents(29350));
    assert_eq!(created.items.len(), 2);
}

#[tokio::test]
async fn test_update_without_id_is_rejected() {
    let state = signed_in().await;

    let err = state.update_customer(&customer("Asha")).await.unwrap_err();

    assert!(matches!(err, ClientError::MissingId("Customer")));
    assert_eq!(state.backend().requests(), 0);
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let state = signed_in().await;

    let err = state.get_order("404").await.unwrap_err();

    assert_eq!(err.to_string(), "Order 404 not found");
    assert_eq!(
        state.snapshot::<Order>().await.error.as_deref(),
        Some("Order 404 not found")
    );
}

#[tokio::test]
async fn test_signed_out_store_sends_nothing() {
    let state = AppState::new(MemoryBackend::default(), ReportSettings::default());

    let err = state.create_customer(&customer("Asha")).await.unwrap_err();

    assert!(matches!(err, ClientError::NotAuthenticated));
    assert_eq!(state.backend().requests(), 0);
}

#[tokio::test]
async fn test_subscribers_see_changes() {
    let state = signed_in().await;
    let mut events = state.subscribe();

    let created = state.create_customer(&customer("Asha")).await.unwrap();
    state.backend().fail_next(500, "Server Error");
    let _ = state.fetch_customers().await;
    state
        .delete_customer(created.id.as_deref().unwrap())
        .await
        .unwrap();

    assert_eq!(
        events.recv().await.unwrap(),
        StoreEvent::Created {
            resource: "Customer",
            id: Some("1".to_string())
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        StoreEvent::Failed {
            resource: "Customer",
            message: "Server Error".to_string()
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        StoreEvent::Deleted {
            resource: "Customer",
            id: "1".to_string()
        }
    );
}

#[tokio::test]
async fn test_reports_over_fetched_orders() {
    use chrono::{NaiveDate, TimeZone, Utc};
    use shopdesk_core::report::{Period, ReportQuery};

    let state = signed_in().await;
    let mut first = order("c1");
    first.created_at = Some(Utc.with_ymd_and_hms(2026, 10, 2, 9, 0, 0).unwrap());
    let mut second = order("c2");
    second.created_at = Some(Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap());
    state.create_order(&first).await.unwrap();
    state.create_order(&second).await.unwrap();

    let as_of = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let report = state
        .sales_report(&ReportQuery::new(Period::Weekly, as_of))
        .await;

    assert_eq!(report.buckets.len(), 12);
    assert_eq!(report.summary.total_orders, 2);
    assert_eq!(report.summary.total_revenue, Money::from_cents(58700));
    assert_eq!(report.summary.average_order_value.amount(), dec!(293.50));
}
