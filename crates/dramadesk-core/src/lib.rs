//! dramadesk-core - Core resource types and accessor traits.

pub mod cache;
pub mod error;
pub mod resource;
pub mod subscription;
pub mod table;
pub mod traits;
pub mod types;

pub use cache::MemoryTagCache;
pub use error::{BackendError, Error, InvalidInputError, TransportError};
pub use resource::{
    DramaVideo, DramaVideoDraft, DramaVideoPatch, Movie, MovieDraft, MoviePatch, StatusChange,
    SubscriptionPackage, SubscriptionPackageDraft, SubscriptionPackagePatch, TableRecord, User,
    UserDraft, UserPatch,
};
pub use subscription::SubscriptionWindow;
pub use table::{ListOrder, TableResource};
pub use traits::{CacheTag, Fetched, Resource, ResourceAccessor, TableBackend, TagCache};
pub use types::{ActivityStatus, BackendUrl, ContentType, ResourceId, SubscriptionTier};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
