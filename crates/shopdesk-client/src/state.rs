//! # Application State
//!
//! The resource store behind the admin dashboard: the signed-in session, one
//! [`EntityCache`] per resource, and a change feed for the UI.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Operation (create/update)                      │
//! │                                                                         │
//! │  form entity                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  session token? ──── no ───► NotAuthenticated (cache.error)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  prepare() ── derived fields (product prices, order total)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate() ─── fails ───► Validation (cache.error, no request)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cache.begin() ──► Backend request ──► cache.insert/update/remove      │
//! │                          │                    │                         │
//! │                          ▼                    ▼                         │
//! │                    cache.fail(msg)     StoreEvent broadcast             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! Cache and session locks are only held between awaits, never across a
//! backend request. Two overlapping requests for the same resource both
//! land; the later response wins.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use shopdesk_core::report::{aggregate_growth, aggregate_sales, customer_events};
use shopdesk_core::report::{GrowthReport, ReportQuery, SalesReport};
use shopdesk_core::types::{Customer, Discount, Order, Product};
use shopdesk_core::{DashboardStats, DiscountOutcome, Money};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::cache::EntityCache;
use crate::config::{ClientConfig, ReportSettings};
use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::resource::Resource;
use crate::session::Session;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Store Events
// =============================================================================

/// A change the UI may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StoreEvent {
    Loaded { resource: &'static str, count: usize },
    Selected { resource: &'static str, id: String },
    Created { resource: &'static str, id: Option<String> },
    Updated { resource: &'static str, id: String },
    Deleted { resource: &'static str, id: String },
    Failed { resource: &'static str, message: String },
    SignedIn { user: Option<String> },
    SignedOut,
}

// =============================================================================
// Caches
// =============================================================================

/// One cache per resource type.
#[derive(Debug, Default)]
pub struct Caches {
    pub products: RwLock<EntityCache<Product>>,
    pub customers: RwLock<EntityCache<Customer>>,
    pub orders: RwLock<EntityCache<Order>>,
    pub discounts: RwLock<EntityCache<Discount>>,
}

impl Caches {
    async fn clear(&self) {
        *self.products.write().await = EntityCache::default();
        *self.customers.write().await = EntityCache::default();
        *self.orders.write().await = EntityCache::default();
        *self.discounts.write().await = EntityCache::default();
    }
}

/// A resource with a slot in [`Caches`].
pub trait Cached: Resource {
    fn cache(caches: &Caches) -> &RwLock<EntityCache<Self>>;
}

impl Cached for Product {
    fn cache(caches: &Caches) -> &RwLock<EntityCache<Self>> {
        &caches.products
    }
}

impl Cached for Customer {
    fn cache(caches: &Caches) -> &RwLock<EntityCache<Self>> {
        &caches.customers
    }
}

impl Cached for Order {
    fn cache(caches: &Caches) -> &RwLock<EntityCache<Self>> {
        &caches.orders
    }
}

impl Cached for Discount {
    fn cache(caches: &Caches) -> &RwLock<EntityCache<Self>> {
        &caches.discounts
    }
}

// =============================================================================
// AppState
// =============================================================================

/// Session, caches and change feed over a [`Backend`].
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct AppState<B: Backend> {
    backend: B,
    session: RwLock<Option<Session>>,
    caches: Caches,
    events: broadcast::Sender<StoreEvent>,
    reports: ReportSettings,
}

impl AppState<ApiClient> {
    /// Builds the store for the configured REST API.
    ///
    /// A configured token signs the store in straight away.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = ApiClient::new(config)?;
        let mut state = AppState::new(client, config.reports.clone());
        state.session = RwLock::new(config.token().map(Session::from_token));
        Ok(state)
    }
}

impl<B: Backend> AppState<B> {
    pub fn new(backend: B, reports: ReportSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        AppState {
            backend,
            session: RwLock::new(None),
            caches: Caches::default(),
            events,
            reports,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn report_settings(&self) -> &ReportSettings {
        &self.reports
    }

    /// Receives every [`StoreEvent`] emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn sign_in(&self, session: Session) {
        let user = session.user_name().map(str::to_string);
        info!(user = user.as_deref().unwrap_or("-"), "Signed in");
        *self.session.write().await = Some(session);
        self.emit(StoreEvent::SignedIn { user });
    }

    /// Drops the session and every cached entity.
    pub async fn sign_out(&self) {
        *self.session.write().await = None;
        self.caches.clear().await;
        info!("Signed out");
        self.emit(StoreEvent::SignedOut);
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    // =========================================================================
    // Generic Operations
    // =========================================================================

    /// A copy of the cache for `T`.
    pub async fn snapshot<T: Cached>(&self) -> EntityCache<T> {
        T::cache(&self.caches).read().await.clone()
    }

    /// Clears the success flag of the cache for `T`.
    pub async fn reset_success<T: Cached>(&self) {
        T::cache(&self.caches).write().await.reset_success();
    }

    /// Records a failed request on the cache for `T` and hands the error back.
    async fn failed<T: Cached>(&self, err: ClientError) -> ClientError {
        self.record_failure::<T>(err, true).await
    }

    /// Like [`Self::failed`] for operations stopped before `begin()`.
    async fn rejected<T: Cached>(&self, err: ClientError) -> ClientError {
        self.record_failure::<T>(err, false).await
    }

    async fn record_failure<T: Cached>(&self, err: ClientError, begun: bool) -> ClientError {
        let message = err.user_message();
        warn!(resource = T::NAME, error = %err, "Store operation failed");
        {
            let mut cache = T::cache(&self.caches).write().await;
            if begun {
                cache.fail(message.clone());
            } else {
                cache.reject(message.clone());
            }
        }
        self.emit(StoreEvent::Failed {
            resource: T::NAME,
            message,
        });
        err
    }

    async fn authorize<T: Cached>(&self) -> ClientResult<String> {
        let token = self.session.read().await.as_ref().map(|s| s.token.clone());
        match token {
            Some(token) => Ok(token),
            None => Err(self.rejected::<T>(ClientError::NotAuthenticated).await),
        }
    }

    /// Derived fields first, then the form checks.
    async fn prepared<T: Cached>(&self, item: &T) -> ClientResult<T> {
        let mut item = item.clone();
        item.prepare();
        match item.validate() {
            Ok(()) => Ok(item),
            Err(e) => Err(self.rejected::<T>(ClientError::Validation(e)).await),
        }
    }

    /// Loads the whole collection, replacing the cache.
    pub async fn fetch<T: Cached>(&self) -> ClientResult<Vec<T>> {
        let token = self.authorize::<T>().await?;
        T::cache(&self.caches).write().await.begin();

        match self.backend.list::<T>(Some(&token)).await {
            Ok(items) => {
                debug!(resource = T::NAME, count = items.len(), "Fetched");
                T::cache(&self.caches).write().await.replace_all(items.clone());
                self.emit(StoreEvent::Loaded {
                    resource: T::NAME,
                    count: items.len(),
                });
                Ok(items)
            }
            Err(e) => Err(self.failed::<T>(e).await),
        }
    }

    /// Loads one entity and makes it the selected one.
    pub async fn get<T: Cached>(&self, id: &str) -> ClientResult<T> {
        let token = self.authorize::<T>().await?;
        T::cache(&self.caches).write().await.begin();

        match self.backend.get::<T>(id, Some(&token)).await {
            Ok(item) => {
                T::cache(&self.caches).write().await.select(item.clone());
                self.emit(StoreEvent::Selected {
                    resource: T::NAME,
                    id: id.to_string(),
                });
                Ok(item)
            }
            Err(e) => Err(self.failed::<T>(e).await),
        }
    }

    /// Creates an entity and appends the stored copy to the cache.
    pub async fn create<T: Cached>(&self, item: &T) -> ClientResult<T> {
        let token = self.authorize::<T>().await?;
        let item = self.prepared(item).await?;
        T::cache(&self.caches).write().await.begin();

        match self.backend.create(&item, Some(&token)).await {
            Ok(created) => {
                let id = created.id().map(str::to_string);
                info!(resource = T::NAME, id = id.as_deref().unwrap_or("-"), "Created");
                T::cache(&self.caches).write().await.insert(created.clone());
                self.emit(StoreEvent::Created {
                    resource: T::NAME,
                    id,
                });
                Ok(created)
            }
            Err(e) => Err(self.failed::<T>(e).await),
        }
    }

    /// Saves changes to an existing entity.
    ///
    /// ## Errors
    /// `MissingId` when the entity has never been created.
    pub async fn update<T: Cached>(&self, item: &T) -> ClientResult<T> {
        let token = self.authorize::<T>().await?;
        let id = match item.id() {
            Some(id) => id.to_string(),
            None => return Err(self.rejected::<T>(ClientError::MissingId(T::NAME)).await),
        };
        let item = self.prepared(item).await?;
        T::cache(&self.caches).write().await.begin();

        match self.backend.update(&id, &item, Some(&token)).await {
            Ok(updated) => {
                info!(resource = T::NAME, %id, "Updated");
                T::cache(&self.caches).write().await.update(updated.clone());
                self.emit(StoreEvent::Updated {
                    resource: T::NAME,
                    id,
                });
                Ok(updated)
            }
            Err(e) => Err(self.failed::<T>(e).await),
        }
    }

    pub async fn delete<T: Cached>(&self, id: &str) -> ClientResult<()> {
        let token = self.authorize::<T>().await?;
        T::cache(&self.caches).write().await.begin();

        match self.backend.delete::<T>(id, Some(&token)).await {
            Ok(()) => {
                info!(resource = T::NAME, %id, "Deleted");
                T::cache(&self.caches).write().await.remove(id);
                self.emit(StoreEvent::Deleted {
                    resource: T::NAME,
                    id: id.to_string(),
                });
                Ok(())
            }
            Err(e) => Err(self.failed::<T>(e).await),
        }
    }
}

// =============================================================================
// Named Operations
// =============================================================================

macro_rules! resource_operations {
    ($ty:ty, $fetch:ident, $get:ident, $create:ident, $update:ident, $delete:ident) => {
        pub async fn $fetch(&self) -> ClientResult<Vec<$ty>> {
            self.fetch::<$ty>().await
        }

        pub async fn $get(&self, id: &str) -> ClientResult<$ty> {
            self.get::<$ty>(id).await
        }

        pub async fn $create(&self, item: &$ty) -> ClientResult<$ty> {
            self.create(item).await
        }

        pub async fn $update(&self, item: &$ty) -> ClientResult<$ty> {
            self.update(item).await
        }

        pub async fn $delete(&self, id: &str) -> ClientResult<()> {
            self.delete::<$ty>(id).await
        }
    };
}

impl<B: Backend> AppState<B> {
    resource_operations!(
        Product,
        fetch_products,
        get_product,
        create_product,
        update_product,
        delete_product
    );
    resource_operations!(
        Customer,
        fetch_customers,
        get_customer,
        create_customer,
        update_customer,
        delete_customer
    );
    resource_operations!(
        Order,
        fetch_orders,
        get_order,
        create_order,
        update_order,
        delete_order
    );
    resource_operations!(
        Discount,
        fetch_discounts,
        get_discount,
        create_discount,
        update_discount,
        delete_discount
    );

    /// Creates or updates depending on whether the product has an id.
    ///
    /// Prices are recomputed from base price, profit and taxes either way.
    pub async fn save_product(&self, product: &Product) -> ClientResult<Product> {
        if product.id.is_some() {
            self.update(product).await
        } else {
            self.create(product).await
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

impl<B: Backend> AppState<B> {
    /// A query over the configured default period.
    pub fn default_query(&self, as_of: NaiveDate) -> ReportQuery {
        ReportQuery::new(self.reports.default_period, as_of)
    }

    /// Sales report over the cached orders.
    pub async fn sales_report(&self, query: &ReportQuery) -> SalesReport {
        let orders = self.caches.orders.read().await;
        let report = aggregate_sales(&orders.items, query);
        info!(
            period = %query.period,
            orders = orders.items.len(),
            buckets = report.buckets.len(),
            "Sales report"
        );
        report
    }

    /// Customer growth report over the cached customers.
    pub async fn growth_report(&self, query: &ReportQuery, seed: Option<u64>) -> GrowthReport {
        let customers = self.caches.customers.read().await;
        let events = customer_events(&customers.items);
        let report = aggregate_growth(&events, query, seed);
        info!(
            period = %query.period,
            customers = customers.items.len(),
            buckets = report.buckets.len(),
            "Growth report"
        );
        report
    }

    /// Home page cards over the cached orders and products.
    pub async fn dashboard(&self, as_of: NaiveDate) -> DashboardStats {
        let orders = self.caches.orders.read().await;
        let products = self.caches.products.read().await;
        DashboardStats::compute(
            &orders.items,
            &products.items,
            as_of,
            self.reports.dashboard_window_days,
        )
    }

    /// Applies the cached discount with `code` (case-insensitive) to `amount`.
    pub async fn apply_discount(
        &self,
        code: &str,
        amount: Money,
        now: DateTime<Utc>,
    ) -> ClientResult<DiscountOutcome> {
        let discounts = self.caches.discounts.read().await;
        let discount = discounts
            .items
            .iter()
            .find(|d| d.code.eq_ignore_ascii_case(code.trim()))
            .ok_or_else(|| ClientError::NotFound {
                resource: Discount::NAME.to_string(),
                id: code.to_string(),
            })?;
        Ok(discount.apply(amount, now)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
