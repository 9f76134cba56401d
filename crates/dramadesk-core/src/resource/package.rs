//! Subscription package records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::TableRecord;
use crate::traits::Resource;
use crate::types::{ResourceId, SubscriptionTier, timestamp};

/// A subscription package users can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPackage {
    pub id: ResourceId,
    pub name: String,
    pub tier: SubscriptionTier,
    pub price: f64,
    /// Length of a subscription window in calendar days.
    pub duration_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for SubscriptionPackage {
    const KIND: &'static str = "subscription_packages";
    const TAG: &'static str = "SubscriptionPackage";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl TableRecord for SubscriptionPackage {
    type Draft = SubscriptionPackageDraft;
    type Patch = SubscriptionPackagePatch;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPackageDraft {
    pub name: String,
    pub tier: SubscriptionTier,
    pub price: f64,
    pub duration_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPackagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<SubscriptionTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

impl SubscriptionPackagePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
