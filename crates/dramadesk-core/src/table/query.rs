//! Table query descriptions.
//!
//! A query is plain data: the table it targets, an optional `eq` filter,
//! ordering, and the relations to embed in returned rows. Backends translate
//! it to their own call shape (PostgREST query parameters, a directory scan).

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};
use crate::types::{ResourceId, timestamp};

/// A row as exchanged with a table backend: attribute name to JSON value.
pub type Row = Map<String, Value>;

/// Column holding the identifier in every table.
pub const ID_COLUMN: &str = "id";

/// Column holding the creation timestamp in every table.
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Convert a serializable value into a [`Row`].
///
/// # Errors
///
/// Returns an error if the value does not serialize to a JSON object.
pub fn to_row<T: serde::Serialize>(value: &T) -> Result<Row, Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(InvalidInputError::Row {
            reason: format!("expected a JSON object, got {}", type_name(&other)),
        }
        .into()),
    }
}

/// Decode a [`Row`] into a typed value.
pub fn from_row<T: serde::de::DeserializeOwned>(row: Row) -> Result<T, Error> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Ordering of a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOrder {
    /// Column to order by.
    pub column: String,
    /// Ascending when true, descending otherwise.
    pub ascending: bool,
}

impl ListOrder {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }

    /// Newest first by `created_at`.
    pub fn newest_first() -> Self {
        Self::descending(CREATED_AT_COLUMN)
    }

    /// PostgREST `order` parameter value (`created_at.desc`).
    pub fn to_param(&self) -> String {
        format!(
            "{}.{}",
            self.column,
            if self.ascending { "asc" } else { "desc" }
        )
    }

    /// Sort rows in place.
    ///
    /// Nulls and missing values sort last when ascending and first when
    /// descending, as in Postgres. Ties are broken by the `id` column
    /// (ascending) so repeated listings come back in the same order.
    pub fn sort_rows(&self, rows: &mut [Row]) {
        self.sort_rows_by_id_column(rows, ID_COLUMN);
    }

    /// [`sort_rows`](Self::sort_rows) with an explicit identifier column.
    pub fn sort_rows_by_id_column(&self, rows: &mut [Row], id_column: &str) {
        rows.sort_by(|a, b| {
            let primary = compare_values(a.get(&self.column), b.get(&self.column));
            let primary = if self.ascending {
                primary
            } else {
                primary.reverse()
            };
            primary.then_with(|| compare_values(a.get(id_column), b.get(id_column)))
        });
    }
}

impl Default for ListOrder {
    fn default() -> Self {
        Self::newest_first()
    }
}

/// Compare two optional JSON values; null and missing sort after everything.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::String(x), Value::String(y)) => {
                // Timestamps compare as instants and sort before plain text.
                match (timestamp::parse(x), timestamp::parse(y)) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.cmp(y),
                }
            }
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => rank(a).cmp(&rank(b)),
        },
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// An `eq(column, value)` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Filter on the identifier column.
    pub fn id(id: &ResourceId) -> Self {
        Self::eq(ID_COLUMN, id.as_str())
    }

    /// PostgREST filter parameter pair (`("id", "eq.m1")`).
    pub fn to_param(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }

    /// Check whether a row satisfies this filter.
    pub fn matches(&self, row: &Row) -> bool {
        match row.get(&self.column) {
            Some(Value::String(s)) => s == &self.value,
            Some(Value::Number(n)) => n.to_string() == self.value,
            Some(Value::Bool(b)) => b.to_string() == self.value,
            _ => false,
        }
    }
}

/// A many-to-one relation embedded into read results.
///
/// The related row appears under the target table's name, or `null` when the
/// foreign key is empty or dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Table holding the related rows; also the key of the embedded value.
    pub table: &'static str,
    /// Column in the owning row referencing the related row's `id`.
    pub foreign_key: &'static str,
}

impl Relation {
    pub const fn new(table: &'static str, foreign_key: &'static str) -> Self {
        Self { table, foreign_key }
    }
}

/// PostgREST `select` parameter for a set of embeds (`*,subscription_packages(*)`).
pub fn select_param(embed: &[Relation]) -> String {
    let mut select = String::from("*");
    for relation in embed {
        select.push_str(&format!(",{}(*)", relation.table));
    }
    select
}

/// A select query.
#[derive(Debug, Clone)]
pub struct Select {
    pub table: &'static str,
    pub filter: Option<Filter>,
    pub order: Option<ListOrder>,
    pub embed: Vec<Relation>,
}

impl Select {
    pub fn from(table: &'static str) -> Self {
        Self {
            table,
            filter: None,
            order: None,
            embed: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order(mut self, order: ListOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn embed(mut self, relations: &[Relation]) -> Self {
        self.embed = relations.to_vec();
        self
    }
}

/// A single-row insert returning the stored row.
#[derive(Debug, Clone)]
pub struct Insert {
    pub table: &'static str,
    pub values: Row,
    pub embed: Vec<Relation>,
}

/// An update of the rows matching `filter`, returning the mutated rows.
#[derive(Debug, Clone)]
pub struct Update {
    pub table: &'static str,
    pub filter: Filter,
    pub values: Row,
    pub embed: Vec<Relation>,
}

/// A removal of the rows matching `filter`.
#[derive(Debug, Clone)]
pub struct Delete {
    pub table: &'static str,
    pub filter: Filter,
}
