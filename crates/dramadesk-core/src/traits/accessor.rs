//! Resource accessor trait.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Result;
use crate::error::Error;
use crate::table::ListOrder;
use crate::types::ResourceId;

/// A named, identifiable record type.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name (the table name for table-backed resources).
    const KIND: &'static str;

    /// Cache tag grouping cached reads of this resource.
    const TAG: &'static str;

    /// The immutable identifier of this record.
    fn id(&self) -> &ResourceId;
}

/// Outcome of a single-row read.
///
/// Absence is a successful outcome, distinct from a failed call.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<R> {
    /// Exactly one matching record.
    Found(R),
    /// No record with the requested identifier.
    NotFound,
}

impl<R> Fetched<R> {
    pub fn is_found(&self) -> bool {
        matches!(self, Fetched::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Fetched::NotFound)
    }

    /// Returns the record, if found.
    pub fn found(self) -> Option<R> {
        match self {
            Fetched::Found(r) => Some(r),
            Fetched::NotFound => None,
        }
    }

    pub fn as_ref(&self) -> Fetched<&R> {
        match self {
            Fetched::Found(r) => Fetched::Found(r),
            Fetched::NotFound => Fetched::NotFound,
        }
    }

    pub fn map<T>(self, f: impl FnOnce(R) -> T) -> Fetched<T> {
        match self {
            Fetched::Found(r) => Fetched::Found(f(r)),
            Fetched::NotFound => Fetched::NotFound,
        }
    }

    /// Turn absence into [`Error::NotFound`] for callers that require the record.
    pub fn require(self, resource: &'static str, id: &ResourceId) -> Result<R> {
        self.found()
            .ok_or_else(|| Error::not_found(resource, id.as_str()))
    }
}

impl<R> From<Option<R>> for Fetched<R> {
    fn from(value: Option<R>) -> Self {
        match value {
            Some(r) => Fetched::Found(r),
            None => Fetched::NotFound,
        }
    }
}

/// Uniform CRUD over one resource type, independent of the backend.
///
/// Every failure reported by the backend is returned as-is; nothing is
/// retried or swallowed.
#[async_trait]
pub trait ResourceAccessor: Send + Sync {
    /// The record type served by this accessor.
    type Resource: Resource;
    /// Input of [`create`](Self::create).
    type Draft: Serialize + Send + Sync;
    /// Input of [`update`](Self::update); absent fields are left untouched.
    type Patch: Serialize + Send + Sync;

    /// Ordering applied when [`list`](Self::list) is called without one.
    fn default_order(&self) -> ListOrder {
        ListOrder::default()
    }

    /// List all records.
    async fn list(&self, order: Option<&ListOrder>) -> Result<Vec<Self::Resource>>;

    /// Fetch one record by identifier.
    async fn get_by_id(&self, id: &ResourceId) -> Result<Fetched<Self::Resource>>;

    /// Persist a new record and return it as stored.
    async fn create(&self, draft: &Self::Draft) -> Result<Self::Resource>;

    /// Apply a partial update and return the full updated record.
    ///
    /// Fails with [`Error::NotFound`] if `id` does not exist.
    async fn update(&self, id: &ResourceId, patch: &Self::Patch) -> Result<Self::Resource>;

    /// Remove a record.
    ///
    /// Fails with [`Error::NotFound`] if `id` does not exist, including when
    /// it was already deleted.
    async fn delete(&self, id: &ResourceId) -> Result<bool>;
}
