//! # shopdesk-client: Resource Store for ShopDesk
//!
//! Talks to the ShopDesk REST backend and keeps what the admin dashboard
//! shows: the signed-in session and the last-known state of products,
//! customers, orders and discounts.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Resource Store                                    │
//! │                                                                         │
//! │  UI / shopdesk-report                                                   │
//! │        │  fetch_* get_* create_* update_* delete_* reports             │
//! │        ▼                                                                │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │ AppState<B>                                                     │   │
//! │  │   session ── RwLock<Option<Session>>                            │   │
//! │  │   caches  ── EntityCache<Product|Customer|Order|Discount>       │   │
//! │  │   events  ── broadcast::Sender<StoreEvent>                      │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │ B: Backend                              │
//! │                               ▼                                         │
//! │  ApiClient ── reqwest ──► {base_url}/{products|customers|orders|...}   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`] - AppState: session, caches and store operations
//! - [`cache`] - Per-resource cache with loading/error/success status
//! - [`backend`] - The CRUD seam the store talks through
//! - [`http`] - reqwest implementation of the backend
//! - [`resource`] - Which entity lives under which path
//! - [`session`] - Bearer-token session
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Store error types

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod resource;
pub mod session;
pub mod state;

pub use backend::Backend;
pub use cache::EntityCache;
pub use config::{ApiSettings, ClientConfig, ReportSettings};
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use resource::Resource;
pub use session::Session;
pub use state::{AppState, Cached, Caches, StoreEvent};
