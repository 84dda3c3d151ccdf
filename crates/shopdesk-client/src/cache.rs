//! # Entity Cache
//!
//! The last-known server state of one entity collection plus request status.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store Operation        On Success                  On Failure         │
//! │  ───────────────        ──────────                  ──────────         │
//! │  fetch (list)      ───► items = response            error = message    │
//! │  get (by id)       ───► selected = response         items untouched    │
//! │  create            ───► items.push(response)                           │
//! │  update            ───► replace by id (+selected)                      │
//! │  delete            ───► remove by id                                   │
//! │                                                                         │
//! │  begin() sets loading and clears success; any success clears error.    │
//! │  loading stays set until every begun request has settled.              │
//! │  The latest successful response for an id wins.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::resource::Resource;

/// Cached items and request status for one resource type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCache<T> {
    pub items: Vec<T>,
    pub selected: Option<T>,
    pub loading: bool,
    /// Message of the last failed request, cleared by the next success.
    pub error: Option<String>,
    /// Set by the last successful create/update/delete.
    pub success: bool,
    /// Requests begun and not yet settled.
    #[serde(skip)]
    in_flight: u32,
}

impl<T> Default for EntityCache<T> {
    fn default() -> Self {
        EntityCache {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
            success: false,
            in_flight: 0,
        }
    }
}

impl<T: Resource> EntityCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a request as in flight.
    pub fn begin(&mut self) {
        self.in_flight = self.in_flight.saturating_add(1);
        self.loading = true;
        self.success = false;
    }

    /// Records a failed request; cached data is left intact.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.finish();
        self.reject(message);
    }

    /// Records an error for an operation that never reached the backend.
    ///
    /// Requests still in flight keep `loading` set.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.success = false;
        self.error = Some(message.into());
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }

    fn settle(&mut self, mutated: bool) {
        self.finish();
        self.error = None;
        self.success = mutated;
    }

    /// Replaces the whole collection.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.settle(false);
    }

    /// Sets the selected entity (detail view) and refreshes its list copy.
    pub fn select(&mut self, item: T) {
        self.upsert(item.clone());
        self.selected = Some(item);
        self.settle(false);
    }

    /// Adds a newly created entity.
    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.settle(true);
    }

    /// Replaces the entity with the same id, and the selected copy if it matches.
    pub fn update(&mut self, item: T) {
        if let Some(selected) = self.selected.as_mut() {
            if selected.id().is_some() && selected.id() == item.id() {
                *selected = item.clone();
            }
        }
        self.upsert(item);
        self.settle(true);
    }

    /// Removes the entity with `id` from the list and the selection.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id() != Some(id));
        if self.selected.as_ref().and_then(|s| s.id()) == Some(id) {
            self.selected = None;
        }
        self.settle(true);
    }

    /// Finds a cached entity by id.
    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    /// Clears the success flag (after the UI has shown it).
    pub fn reset_success(&mut self) {
        self.success = false;
    }

    fn upsert(&mut self, item: T) {
        let existing = item
            .id()
            .and_then(|id| self.items.iter().position(|i| i.id() == Some(id)));
        match existing {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
    }
}
