//! Core dramadesk types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod backend_url;
mod resource_id;
pub mod timestamp;
mod vocabulary;

pub use backend_url::BackendUrl;
pub use resource_id::ResourceId;
pub use vocabulary::{ActivityStatus, ContentType, SubscriptionTier};
