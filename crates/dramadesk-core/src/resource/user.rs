//! User records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{SubscriptionPackage, TableRecord};
use crate::table::Relation;
use crate::traits::Resource;
use crate::types::{ActivityStatus, ResourceId, timestamp};

/// `users.subscription_id` references `subscription_packages.id`.
pub const SUBSCRIPTION_RELATION: Relation =
    Relation::new(SubscriptionPackage::KIND, "subscription_id");

/// A platform user, with the assigned package embedded on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(default)]
    pub subscription_id: Option<ResourceId>,
    #[serde(default, with = "timestamp::option")]
    pub subscription_start: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub subscription_end: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Embedded package; read-only, never written back.
    #[serde(
        rename = "subscription_packages",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub subscription: Option<SubscriptionPackage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Whether the user holds a subscription covering `at`.
    pub fn is_subscribed_at(&self, at: DateTime<Utc>) -> bool {
        match (self.subscription_start, self.subscription_end) {
            (Some(start), Some(end)) => self.subscription_id.is_some() && start <= at && at < end,
            _ => false,
        }
    }
}

impl Resource for User {
    const KIND: &'static str = "users";
    const TAG: &'static str = "User";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl TableRecord for User {
    type Draft = UserDraft;
    type Patch = UserPatch;

    const EMBED: &'static [Relation] = &[SUBSCRIPTION_RELATION];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDraft {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<ResourceId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub subscription_start: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub subscription_end: Option<DateTime<Utc>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
