//! Resolved settings and the backend wrapper.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use dramadesk_core::table::{Delete, Insert, Row, Select, Update};
use dramadesk_core::{BackendUrl, TableBackend, TableRecord, TableResource};
use dramadesk_file::FileTable;
use dramadesk_http::{ApiClient, DramaVideoApi, PostgrestTable};

/// Validated backend settings.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub database_url: Option<BackendUrl>,
    pub database_key: Option<String>,
    pub api_url: Option<BackendUrl>,
    pub api_token: Option<String>,
}

impl Settings {
    /// Open the configured table backend.
    pub fn table(&self) -> Result<CliTable> {
        let url = self.database_url.clone().context(
            "No database configured. Run 'dramadesk config set --database-url URL' first.",
        )?;

        if url.is_local() {
            let table = FileTable::new(url).context("Failed to open file tables")?;
            Ok(CliTable::File(table))
        } else {
            let table = PostgrestTable::new(url, self.database_key.as_deref())
                .context("Failed to create PostgREST client")?;
            Ok(CliTable::Postgrest(table))
        }
    }

    /// Accessor for one table-backed resource.
    pub fn resource<R: TableRecord>(&self) -> Result<TableResource<R, CliTable>> {
        Ok(TableResource::new(self.table()?))
    }

    /// Accessor for the video management service.
    pub fn videos(&self) -> Result<DramaVideoApi> {
        let Some(url) = self.api_url.clone() else {
            bail!("No video API configured. Run 'dramadesk config set --api-url URL' first.");
        };
        let client = ApiClient::new(url, self.api_token.as_deref())
            .context("Failed to create video API client")?;
        Ok(DramaVideoApi::with_memory_cache(client))
    }
}

/// Table backend selected by the database URL scheme.
#[derive(Debug, Clone)]
pub enum CliTable {
    File(FileTable),
    Postgrest(PostgrestTable),
}

#[async_trait]
impl TableBackend for CliTable {
    async fn select(&self, query: &Select) -> dramadesk_core::Result<Vec<Row>> {
        match self {
            CliTable::File(table) => table.select(query).await,
            CliTable::Postgrest(table) => table.select(query).await,
        }
    }

    async fn insert(&self, query: &Insert) -> dramadesk_core::Result<Row> {
        match self {
            CliTable::File(table) => table.insert(query).await,
            CliTable::Postgrest(table) => table.insert(query).await,
        }
    }

    async fn update(&self, query: &Update) -> dramadesk_core::Result<Vec<Row>> {
        match self {
            CliTable::File(table) => table.update(query).await,
            CliTable::Postgrest(table) => table.update(query).await,
        }
    }

    async fn delete(&self, query: &Delete) -> dramadesk_core::Result<usize> {
        match self {
            CliTable::File(table) => table.delete(query).await,
            CliTable::Postgrest(table) => table.delete(query).await,
        }
    }
}

