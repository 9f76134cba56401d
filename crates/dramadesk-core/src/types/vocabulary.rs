//! Fixed vocabularies shared by the resources.
//!
//! Writes are restricted to these values; parsing anything else is an
//! [`InvalidInputError::Vocabulary`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Kind of content a title belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Drama,
    #[default]
    Movie,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::Drama, ContentType::Movie];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Drama => "drama",
            ContentType::Movie => "movie",
        }
    }
}

/// Lifecycle status of users and drama videos.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[default]
    Active,
    Inactive,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 2] = [ActivityStatus::Active, ActivityStatus::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Active => "active",
            ActivityStatus::Inactive => "inactive",
        }
    }

    /// The opposite status.
    pub fn toggled(self) -> Self {
        match self {
            ActivityStatus::Active => ActivityStatus::Inactive,
            ActivityStatus::Inactive => ActivityStatus::Active,
        }
    }
}

/// Subscription package tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionTier {
    #[default]
    Free,
    Basic,
    Premium,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 3] = [
        SubscriptionTier::Free,
        SubscriptionTier::Basic,
        SubscriptionTier::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "Free",
            SubscriptionTier::Basic => "Basic",
            SubscriptionTier::Premium => "Premium",
        }
    }
}

/// Case-insensitive lookup over a vocabulary.
fn parse_in<T: Copy>(
    vocabulary: &'static str,
    expected: &'static str,
    all: &[T],
    as_str: impl Fn(&T) -> &'static str,
    value: &str,
) -> Result<T, Error> {
    all.iter()
        .find(|v| as_str(*v).eq_ignore_ascii_case(value.trim()))
        .copied()
        .ok_or_else(|| {
            InvalidInputError::Vocabulary {
                vocabulary,
                value: value.to_string(),
                expected,
            }
            .into()
        })
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_in("content type", "drama, movie", &Self::ALL, Self::as_str, s)
    }
}

impl FromStr for ActivityStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_in("status", "active, inactive", &Self::ALL, Self::as_str, s)
    }
}

impl FromStr for SubscriptionTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_in(
            "subscription tier",
            "Free, Basic, Premium",
            &Self::ALL,
            Self::as_str,
            s,
        )
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
