//! PostgREST-backed [`TableBackend`].

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use dramadesk_core::Result;
use dramadesk_core::error::{BackendError, Error, InvalidInputError};
use dramadesk_core::table::{
    Delete, ID_COLUMN, Insert, ListOrder, Relation, Row, Select, Update, select_param,
};
use dramadesk_core::traits::TableBackend;
use dramadesk_core::types::BackendUrl;

use crate::client::ApiClient;

const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Tables served by PostgREST under `{base}/rest/v1/`.
#[derive(Debug, Clone)]
pub struct PostgrestTable {
    client: ApiClient,
}

impl PostgrestTable {
    /// Connect to the PostgREST endpoint of `base` using a project key.
    pub fn new(base: BackendUrl, key: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: ApiClient::postgrest(base, key)?,
        })
    }

    pub fn url(&self) -> &BackendUrl {
        self.client.base()
    }

    fn table_url(&self, table: &str) -> String {
        self.client.base().table_url(table)
    }

    /// `order` parameter, with the id as tiebreak so listings are stable.
    fn order_param(order: &ListOrder) -> String {
        if order.column == ID_COLUMN {
            order.to_param()
        } else {
            format!("{},{}.asc", order.to_param(), ID_COLUMN)
        }
    }

    fn strip_embeds(values: &Row, embed: &[Relation]) -> Row {
        let mut values = values.clone();
        for relation in embed {
            values.remove(relation.table);
        }
        values
    }

    async fn rows(
        &self,
        method: Method,
        table: &str,
        params: &[(String, String)],
        body: Option<&Row>,
    ) -> Result<Vec<Row>> {
        let url = self.table_url(table);
        trace!(?params, "PostgREST parameters");

        let mut request = self
            .client
            .request(method, &url)
            .query(params)
            .header(PREFER, RETURN_REPRESENTATION);
        if let Some(body) = body {
            request = request.json(body);
        }

        match self.client.send(request).await? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(row) => Ok(row),
                    _ => Err(Error::from(InvalidInputError::Row {
                        reason: format!("{} returned a non-object row", table),
                    })),
                })
                .collect(),
            Value::Object(row) => Ok(vec![row]),
            Value::Null => Ok(Vec::new()),
            _ => Err(InvalidInputError::Row {
                reason: format!("{} returned an unexpected body", table),
            }
            .into()),
        }
    }
}

#[async_trait]
impl TableBackend for PostgrestTable {
    #[instrument(skip(self, query), fields(table = query.table))]
    async fn select(&self, query: &Select) -> Result<Vec<Row>> {
        let mut params = vec![("select".to_string(), select_param(&query.embed))];
        if let Some(filter) = &query.filter {
            params.push(filter.to_param());
        }
        if let Some(order) = &query.order {
            params.push(("order".to_string(), Self::order_param(order)));
        }

        debug!("PostgREST select");
        self.rows(Method::GET, query.table, &params, None).await
    }

    #[instrument(skip(self, query), fields(table = query.table))]
    async fn insert(&self, query: &Insert) -> Result<Row> {
        let params = vec![("select".to_string(), select_param(&query.embed))];
        let values = Self::strip_embeds(&query.values, &query.embed);

        debug!("PostgREST insert");
        let mut rows = self
            .rows(Method::POST, query.table, &params, Some(&values))
            .await?;
        if rows.is_empty() {
            return Err(BackendError::coded(
                "PGRST204",
                format!("insert into {} returned no row", query.table),
            )
            .into());
        }
        Ok(rows.swap_remove(0))
    }

    #[instrument(skip(self, query), fields(table = query.table))]
    async fn update(&self, query: &Update) -> Result<Vec<Row>> {
        let mut params = vec![("select".to_string(), select_param(&query.embed))];
        params.push(query.filter.to_param());
        let values = Self::strip_embeds(&query.values, &query.embed);

        debug!("PostgREST update");
        self.rows(Method::PATCH, query.table, &params, Some(&values))
            .await
    }

    #[instrument(skip(self, query), fields(table = query.table))]
    async fn delete(&self, query: &Delete) -> Result<usize> {
        let mut params = vec![("select".to_string(), ID_COLUMN.to_string())];
        params.push(query.filter.to_param());

        debug!("PostgREST delete");
        let removed = self.rows(Method::DELETE, query.table, &params, None).await?;
        Ok(removed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_param_adds_id_tiebreak() {
        assert_eq!(
            PostgrestTable::order_param(&ListOrder::default()),
            "created_at.desc,id.asc"
        );
        assert_eq!(PostgrestTable::order_param(&ListOrder::ascending("id")), "id.asc");
    }

    #[test]
    fn table_urls() {
        let table =
            PostgrestTable::new(BackendUrl::new("https://abc.supabase.co").unwrap(), Some("k"))
                .unwrap();
        assert_eq!(table.table_url("movies"), "https://abc.supabase.co/rest/v1/movies");
    }
}
