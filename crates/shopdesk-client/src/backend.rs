//! # Backend Trait
//!
//! The seam between the store and whatever answers the REST contract.
//!
//! ```text
//! ┌──────────────┐        ┌──────────────────────┐
//! │  AppState<B> │──────► │  B: Backend          │
//! └──────────────┘        └──────────┬───────────┘
//!                                    │
//!                  ┌─────────────────┴─────────────────┐
//!                  ▼                                   ▼
//!          ApiClient (reqwest)               in-memory fakes (tests)
//! ```
//!
//! | Method | Request                  |
//! |--------|--------------------------|
//! | list   | `GET    /{resource}`     |
//! | get    | `GET    /{resource}/{id}`|
//! | create | `POST   /{resource}`     |
//! | update | `PUT    /{resource}/{id}`|
//! | delete | `DELETE /{resource}/{id}`|

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::resource::Resource;

/// CRUD over any [`Resource`].
///
/// `token` is the signed-in staff member's bearer token, if any.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list<T: Resource>(&self, token: Option<&str>) -> ClientResult<Vec<T>>;

    async fn get<T: Resource>(&self, id: &str, token: Option<&str>) -> ClientResult<T>;

    /// Returns the entity as stored, with its backend-assigned id.
    async fn create<T: Resource>(&self, item: &T, token: Option<&str>) -> ClientResult<T>;

    async fn update<T: Resource>(&self, id: &str, item: &T, token: Option<&str>)
        -> ClientResult<T>;

    async fn delete<T: Resource>(&self, id: &str, token: Option<&str>) -> ClientResult<()>;
}
