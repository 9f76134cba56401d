//! Table-backed resource accessor.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use super::query::{Delete, Filter, Insert, ListOrder, Select, Update, from_row, to_row};
use crate::Result;
use crate::error::{BackendError, Error};
use crate::resource::{TableRecord, User};
use crate::subscription::SubscriptionWindow;
use crate::traits::{Fetched, Resource, ResourceAccessor, TableBackend};
use crate::types::ResourceId;

/// [`ResourceAccessor`] over one table of a [`TableBackend`].
///
/// Every operation is exactly one backend call. Reads and mutations embed
/// the record's relations.
pub struct TableResource<R, B> {
    backend: B,
    order: ListOrder,
    _record: PhantomData<fn() -> R>,
}

impl<R: TableRecord, B: TableBackend> TableResource<R, B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            order: ListOrder::default(),
            _record: PhantomData,
        }
    }

    /// Replace the ordering used when `list` is called without one.
    pub fn with_default_order(mut self, order: ListOrder) -> Self {
        self.order = order;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn select(&self) -> Select {
        Select::from(R::KIND).embed(R::EMBED)
    }
}

impl<R, B: Clone> Clone for TableResource<R, B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            order: self.order.clone(),
            _record: PhantomData,
        }
    }
}

impl<R, B: std::fmt::Debug> std::fmt::Debug for TableResource<R, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableResource")
            .field("backend", &self.backend)
            .field("order", &self.order)
            .finish()
    }
}

#[async_trait]
impl<R: TableRecord, B: TableBackend> ResourceAccessor for TableResource<R, B> {
    type Resource = R;
    type Draft = R::Draft;
    type Patch = R::Patch;

    fn default_order(&self) -> ListOrder {
        self.order.clone()
    }

    #[instrument(skip(self), fields(table = R::KIND))]
    async fn list(&self, order: Option<&ListOrder>) -> Result<Vec<R>> {
        let order = order.cloned().unwrap_or_else(|| self.order.clone());
        debug!(order = %order.to_param(), "Listing rows");

        let rows = self.backend.select(&self.select().order(order)).await?;
        rows.into_iter().map(from_row).collect()
    }

    #[instrument(skip(self), fields(table = R::KIND, %id))]
    async fn get_by_id(&self, id: &ResourceId) -> Result<Fetched<R>> {
        debug!("Fetching row");
        let mut rows = self
            .backend
            .select(&self.select().filter(Filter::id(id)))
            .await?;

        match rows.len() {
            0 => Ok(Fetched::NotFound),
            1 => Ok(Fetched::Found(from_row(rows.remove(0))?)),
            n => Err(BackendError::coded(
                "PGRST116",
                format!("JSON object requested, multiple ({}) rows returned", n),
            )
            .into()),
        }
    }

    #[instrument(skip(self, draft), fields(table = R::KIND))]
    async fn create(&self, draft: &R::Draft) -> Result<R> {
        let query = Insert {
            table: R::KIND,
            values: to_row(draft)?,
            embed: R::EMBED.to_vec(),
        };
        let row = self.backend.insert(&query).await?;
        let record: R = from_row(row)?;
        debug!(id = %record.id(), "Created row");
        Ok(record)
    }

    #[instrument(skip(self, patch), fields(table = R::KIND, %id))]
    async fn update(&self, id: &ResourceId, patch: &R::Patch) -> Result<R> {
        let values = to_row(patch)?;
        if values.is_empty() {
            debug!("Empty patch, reading row back");
            return self.get_by_id(id).await?.require(R::KIND, id);
        }

        let query = Update {
            table: R::KIND,
            filter: Filter::id(id),
            values,
            embed: R::EMBED.to_vec(),
        };
        let mut rows = self.backend.update(&query).await?;
        if rows.is_empty() {
            return Err(Error::not_found(R::KIND, id.as_str()));
        }
        debug!("Updated row");
        from_row(rows.swap_remove(0))
    }

    #[instrument(skip(self), fields(table = R::KIND, %id))]
    async fn delete(&self, id: &ResourceId) -> Result<bool> {
        let query = Delete {
            table: R::KIND,
            filter: Filter::id(id),
        };
        match self.backend.delete(&query).await? {
            0 => Err(Error::not_found(R::KIND, id.as_str())),
            _ => {
                debug!("Deleted row");
                Ok(true)
            }
        }
    }
}

// ============================================================================
// Subscription assignment
// ============================================================================

impl<B: TableBackend> TableResource<User, B> {
    /// Assign a subscription package to a user for `duration_days` calendar
    /// days starting now.
    ///
    /// Writes `subscription_id`, `subscription_start` and `subscription_end`
    /// in a single update call.
    pub async fn update_user_subscription(
        &self,
        user_id: &ResourceId,
        subscription_id: &ResourceId,
        duration_days: u32,
    ) -> Result<User> {
        self.update_user_subscription_at(user_id, subscription_id, duration_days, Utc::now())
            .await
    }

    /// [`update_user_subscription`](Self::update_user_subscription) with an
    /// explicit start time.
    #[instrument(skip(self, now), fields(%user_id, %subscription_id))]
    pub async fn update_user_subscription_at(
        &self,
        user_id: &ResourceId,
        subscription_id: &ResourceId,
        duration_days: u32,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let window = SubscriptionWindow::starting_at(now, duration_days)?;
        debug!(start = %window.start, end = %window.end, "Assigning subscription");
        self.update(user_id, &window.assignment(subscription_id.clone()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use serde_json::{Value, json};

    use crate::resource::{Movie, MovieDraft, MoviePatch, SubscriptionPackage};
    use crate::table::Row;

    /// Backend that replays canned results and records the queries it saw.
    #[derive(Default)]
    struct Canned {
        rows: Vec<Row>,
        removed: usize,
        selects: Mutex<Vec<Select>>,
        updates: Mutex<Vec<Update>>,
    }

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[async_trait]
    impl TableBackend for Canned {
        async fn select(&self, query: &Select) -> Result<Vec<Row>> {
            self.selects.lock().unwrap().push(query.clone());
            Ok(self.rows.clone())
        }

        async fn insert(&self, query: &Insert) -> Result<Row> {
            let mut stored = query.values.clone();
            stored.insert("id".into(), json!("m1"));
            stored.insert("created_at".into(), json!("2026-10-18T09:30:00.000Z"));
            Ok(stored)
        }

        async fn update(&self, query: &Update) -> Result<Vec<Row>> {
            self.updates.lock().unwrap().push(query.clone());
            Ok(self.rows.clone())
        }

        async fn delete(&self, _query: &Delete) -> Result<usize> {
            Ok(self.removed)
        }
    }

    fn movie_row(id: &str) -> Row {
        row(json!({"id": id, "title": "X", "created_at": "2026-10-18T09:30:00.000Z"}))
    }

    #[tokio::test]
    async fn list_uses_default_order_and_embeds() {
        let users: TableResource<User, Canned> = TableResource::new(Canned::default());
        users.list(None).await.unwrap();

        let seen = users.backend().selects.lock().unwrap();
        assert_eq!(seen[0].table, "users");
        assert_eq!(seen[0].order, Some(ListOrder::newest_first()));
        assert_eq!(seen[0].embed, User::EMBED.to_vec());
    }

    #[tokio::test]
    async fn get_distinguishes_zero_one_many() {
        let none: TableResource<Movie, _> = TableResource::new(Canned::default());
        let id = ResourceId::new("m1").unwrap();
        assert!(none.get_by_id(&id).await.unwrap().is_not_found());

        let one: TableResource<Movie, _> = TableResource::new(Canned {
            rows: vec![movie_row("m1")],
            ..Default::default()
        });
        assert!(one.get_by_id(&id).await.unwrap().is_found());

        let many: TableResource<Movie, _> = TableResource::new(Canned {
            rows: vec![movie_row("m1"), movie_row("m1")],
            ..Default::default()
        });
        let err = many.get_by_id(&id).await.unwrap_err();
        assert!(matches!(err, Error::Backend(ref b) if b.code.as_deref() == Some("PGRST116")));
    }

    #[tokio::test]
    async fn create_returns_stored_row() {
        let movies: TableResource<Movie, _> = TableResource::new(Canned::default());
        let movie = movies.create(&MovieDraft::new("X")).await.unwrap();
        assert_eq!(movie.id.as_str(), "m1");
        assert_eq!(movie.title, "X");
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_row_fail() {
        let movies: TableResource<Movie, _> = TableResource::new(Canned::default());
        let id = ResourceId::new("gone").unwrap();
        let patch = MoviePatch {
            title: Some("Y".into()),
            ..Default::default()
        };
        assert!(movies.update(&id, &patch).await.unwrap_err().is_not_found());
        assert!(movies.delete(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn subscription_assignment_is_one_update() {
        let users: TableResource<User, _> = TableResource::new(Canned {
            rows: vec![row(json!({
                "id": "u1",
                "email": "a@example.com",
                "subscription_id": "p1",
                "subscription_start": "2026-10-18T09:30:00.000Z",
                "subscription_end": "2026-11-17T09:30:00.000Z",
                "created_at": "2026-09-01T00:00:00.000Z"
            }))],
            ..Default::default()
        });
        let now = crate::types::timestamp::parse("2026-10-18T09:30:00Z").unwrap();
        users
            .update_user_subscription_at(
                &ResourceId::new("u1").unwrap(),
                &ResourceId::new("p1").unwrap(),
                30,
                now,
            )
            .await
            .unwrap();

        let updates = users.backend().updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        let values = &updates[0].values;
        assert_eq!(values["subscription_id"], json!("p1"));
        assert_eq!(values["subscription_start"], json!("2026-10-18T09:30:00.000Z"));
        assert_eq!(values["subscription_end"], json!("2026-11-17T09:30:00.000Z"));
        assert_eq!(updates[0].embed[0].table, SubscriptionPackage::KIND);
    }
}
