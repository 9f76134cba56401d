//! Table access: query descriptions and the table-backed accessor.

mod query;
mod resource;

pub use query::{
    CREATED_AT_COLUMN, Delete, Filter, ID_COLUMN, Insert, ListOrder, Relation, Row, Select,
    Update, from_row, select_param, to_row,
};
pub use resource::TableResource;
