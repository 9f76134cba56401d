//! Resource types.
//!
//! Movies, subscription packages and users are table records; drama videos
//! live in the video management service.

mod drama_video;
mod movie;
mod package;
mod user;

pub use drama_video::{DramaVideo, DramaVideoDraft, DramaVideoPatch, StatusChange};
pub use movie::{Movie, MovieDraft, MoviePatch};
pub use package::{SubscriptionPackage, SubscriptionPackageDraft, SubscriptionPackagePatch};
pub use user::{SUBSCRIPTION_RELATION, User, UserDraft, UserPatch};

use serde::Serialize;

use crate::table::Relation;
use crate::traits::Resource;

/// A resource stored in a table.
pub trait TableRecord: Resource {
    /// Input of a create call.
    type Draft: Serialize + Send + Sync;
    /// Input of a partial update; absent fields are omitted from the write.
    type Patch: Serialize + Send + Sync;

    /// Relations embedded into every read of this record.
    const EMBED: &'static [Relation] = &[];
}
