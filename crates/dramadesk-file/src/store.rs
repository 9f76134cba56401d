//! Filesystem storage for the file-backed tables.
//!
//! Layout under the root directory:
//!
//! ```text
//! tables/<table>.lock        advisory lock serialising access to <table>
//! tables/<table>/<id>.json   one row per file
//! ```

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use serde_json::Value;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use dramadesk_core::Result;
use dramadesk_core::error::{BackendError, Error, InvalidInputError, TransportError};
use dramadesk_core::table::{
    CREATED_AT_COLUMN, Delete, Filter, ID_COLUMN, Insert, Relation, Row, Select, Update,
};
use dramadesk_core::types::{ResourceId, timestamp};

fn map_io(path: &Path) -> impl Fn(io::Error) -> Error + '_ {
    move |err| {
        Error::Transport(TransportError::Io {
            message: format!("{}: {}", path.display(), err),
        })
    }
}

/// Held lock on one table; released on drop.
struct TableLock {
    file: File,
}

impl Drop for TableLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Filesystem-backed table storage.
#[derive(Debug, Clone)]
pub struct TableStore {
    root: PathBuf,
}

impl TableStore {
    /// Create a table store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tables_dir(&self) -> PathBuf {
        self.root.join("tables")
    }

    fn table_dir(&self, table: &str) -> PathBuf {
        self.tables_dir().join(table)
    }

    fn lock_path(&self, table: &str) -> PathBuf {
        self.tables_dir().join(format!("{}.lock", table))
    }

    fn row_path(&self, table: &str, id: &ResourceId) -> PathBuf {
        self.table_dir(table).join(format!("{}.json", id))
    }

    fn lock(&self, table: &str, exclusive: bool) -> Result<TableLock> {
        let path = self.lock_path(table);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(map_io(parent))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(map_io(&path))?;

        if exclusive {
            file.lock_exclusive().map_err(map_io(&path))?;
        } else {
            FileExt::lock_shared(&file).map_err(map_io(&path))?;
        }
        trace!(table, exclusive, "Locked table");

        Ok(TableLock { file })
    }

    // ========================================================================
    // Row I/O
    // ========================================================================

    fn read_row(path: &Path) -> Result<Row> {
        let content = fs::read_to_string(path).map_err(map_io(path))?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(row) => Ok(row),
            _ => Err(InvalidInputError::Row {
                reason: format!("{} does not hold a JSON object", path.display()),
            }
            .into()),
        }
    }

    fn write_row(path: &Path, row: &Row) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(map_io(parent))?;
        }

        let content = serde_json::to_string_pretty(row)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content).map_err(map_io(&temp_path))?;
        fs::rename(&temp_path, path).map_err(map_io(path))?;
        Ok(())
    }

    fn get_row(&self, table: &str, id: &ResourceId) -> Result<Option<Row>> {
        let path = self.row_path(table, id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_row(&path).map(Some)
    }

    /// Rows of `table` matching `filter`, with their file paths.
    fn scan(&self, table: &str, filter: Option<&Filter>) -> Result<Vec<(PathBuf, Row)>> {
        if let Some(filter) = filter.filter(|f| f.column == ID_COLUMN) {
            // Identifiers that cannot name a file cannot match a row.
            let Ok(id) = ResourceId::new(filter.value.as_str()) else {
                return Ok(Vec::new());
            };
            let path = self.row_path(table, &id);
            if !path.exists() {
                return Ok(Vec::new());
            }
            return Ok(vec![(path.clone(), Self::read_row(&path)?)]);
        }

        let dir = self.table_dir(table);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<_> = fs::read_dir(&dir)
            .map_err(map_io(&dir))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        entries.sort();

        let mut rows = Vec::with_capacity(entries.len());
        for path in entries {
            let row = Self::read_row(&path)?;
            if filter.is_none_or(|f| f.matches(&row)) {
                rows.push((path, row));
            }
        }
        Ok(rows)
    }

    /// Resolve each relation into the row, under the related table's name.
    fn embed(&self, row: &mut Row, relations: &[Relation]) -> Result<()> {
        for relation in relations {
            let related = match row.get(relation.foreign_key) {
                Some(Value::String(s)) => ResourceId::new(s.as_str()).ok(),
                Some(Value::Number(n)) => ResourceId::new(n.to_string()).ok(),
                _ => None,
            };
            let embedded = match related {
                Some(id) => self.get_row(relation.table, &id)?.map(Value::Object),
                None => None,
            };
            row.insert(relation.table.to_string(), embedded.unwrap_or(Value::Null));
        }
        Ok(())
    }

    /// Embedded relations are never written back.
    fn strip_embeds(values: &mut Row, relations: &[Relation]) {
        for relation in relations {
            values.remove(relation.table);
        }
    }

    fn row_id(row: &Row) -> Result<ResourceId> {
        match row.get(ID_COLUMN) {
            Some(Value::String(s)) => ResourceId::new(s.as_str()),
            Some(Value::Number(n)) => ResourceId::new(n.to_string()),
            _ => Err(InvalidInputError::Row {
                reason: "row has no usable id".to_string(),
            }
            .into()),
        }
    }

    // ========================================================================
    // Table Operations
    // ========================================================================

    #[instrument(skip(self, query), fields(table = query.table))]
    pub fn select(&self, query: &Select) -> Result<Vec<Row>> {
        let _lock = self.lock(query.table, false)?;

        let mut rows: Vec<Row> = self
            .scan(query.table, query.filter.as_ref())?
            .into_iter()
            .map(|(_, row)| row)
            .collect();

        if let Some(order) = &query.order {
            order.sort_rows(&mut rows);
        }
        for row in &mut rows {
            self.embed(row, &query.embed)?;
        }

        debug!(count = rows.len(), "Selected rows");
        Ok(rows)
    }

    #[instrument(skip(self, query), fields(table = query.table))]
    pub fn insert(&self, query: &Insert) -> Result<Row> {
        let _lock = self.lock(query.table, true)?;

        let mut row = query.values.clone();
        Self::strip_embeds(&mut row, &query.embed);

        let id = match row.get(ID_COLUMN) {
            Some(Value::Null) | None => {
                let id = ResourceId::new(Uuid::new_v4().to_string())?;
                row.insert(ID_COLUMN.to_string(), Value::String(id.to_string()));
                id
            }
            Some(_) => Self::row_id(&row)?,
        };
        if matches!(row.get(CREATED_AT_COLUMN), Some(Value::Null) | None) {
            row.insert(
                CREATED_AT_COLUMN.to_string(),
                Value::String(timestamp::format(&Utc::now())),
            );
        }

        let path = self.row_path(query.table, &id);
        if path.exists() {
            return Err(BackendError::coded(
                "23505",
                format!("duplicate key value violates unique constraint on {}.id", query.table),
            )
            .with_details(Some(format!("Key (id)=({}) already exists.", id)))
            .into());
        }
        Self::write_row(&path, &row)?;

        debug!(%id, "Inserted row");
        self.embed(&mut row, &query.embed)?;
        Ok(row)
    }

    #[instrument(skip(self, query), fields(table = query.table))]
    pub fn update(&self, query: &Update) -> Result<Vec<Row>> {
        let _lock = self.lock(query.table, true)?;

        let mut values = query.values.clone();
        Self::strip_embeds(&mut values, &query.embed);

        let mut updated = Vec::new();
        for (path, mut row) in self.scan(query.table, Some(&query.filter))? {
            if let Some(new_id) = values.get(ID_COLUMN) {
                if row.get(ID_COLUMN) != Some(new_id) {
                    return Err(InvalidInputError::Row {
                        reason: "the id column cannot be changed".to_string(),
                    }
                    .into());
                }
            }

            for (column, value) in &values {
                row.insert(column.clone(), value.clone());
            }
            Self::write_row(&path, &row)?;
            updated.push(row);
        }

        for row in &mut updated {
            self.embed(row, &query.embed)?;
        }

        debug!(count = updated.len(), "Updated rows");
        Ok(updated)
    }

    #[instrument(skip(self, query), fields(table = query.table))]
    pub fn delete(&self, query: &Delete) -> Result<usize> {
        let _lock = self.lock(query.table, true)?;

        let rows = self.scan(query.table, Some(&query.filter))?;
        for (path, _) in &rows {
            fs::remove_file(path).map_err(map_io(path))?;
        }

        debug!(count = rows.len(), "Deleted rows");
        Ok(rows.len())
    }
}
