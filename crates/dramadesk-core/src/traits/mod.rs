//! Core traits for resource access, table backends and cache tags.

mod accessor;
mod cache;
mod table;

pub use accessor::{Fetched, Resource, ResourceAccessor};
pub use cache::{CacheTag, Listener, SubscriptionId, TagCache};
pub use table::TableBackend;
