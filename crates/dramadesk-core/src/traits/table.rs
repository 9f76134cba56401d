//! Table backend trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::table::{Delete, Insert, Row, Select, Update};

/// A query-execution backend over named tables.
///
/// Implementations run exactly one backend call per method and report
/// backend failures as [`Error::Backend`](crate::Error::Backend).
#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Run a select and return the matching rows, ordered and with embeds.
    async fn select(&self, query: &Select) -> Result<Vec<Row>>;

    /// Insert one row and return it as stored, with embeds.
    async fn insert(&self, query: &Insert) -> Result<Row>;

    /// Update the matching rows and return them as stored, with embeds.
    ///
    /// An empty result means no row matched.
    async fn update(&self, query: &Update) -> Result<Vec<Row>>;

    /// Remove the matching rows and return how many were removed.
    async fn delete(&self, query: &Delete) -> Result<usize>;
}

#[async_trait]
impl<T: TableBackend + ?Sized> TableBackend for Arc<T> {
    async fn select(&self, query: &Select) -> Result<Vec<Row>> {
        (**self).select(query).await
    }

    async fn insert(&self, query: &Insert) -> Result<Row> {
        (**self).insert(query).await
    }

    async fn update(&self, query: &Update) -> Result<Vec<Row>> {
        (**self).update(query).await
    }

    async fn delete(&self, query: &Delete) -> Result<usize> {
        (**self).delete(query).await
    }
}
