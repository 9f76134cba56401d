//! Resource identifier type.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// An opaque resource identifier.
///
/// Identifiers are assigned by the backend on create and never change.
/// They end up in URL path segments and file names, so separators,
/// whitespace and control characters are rejected.
///
/// Numeric identifiers (e.g. `bigint` primary keys) deserialize into their
/// decimal string form.
///
/// # Example
///
/// ```
/// use dramadesk_core::ResourceId;
///
/// let id = ResourceId::new("6f1c2a4e-1d7b-4c55-9a1e-3f0b7d2c9e10").unwrap();
/// assert_eq!(id.as_str(), "6f1c2a4e-1d7b-4c55-9a1e-3f0b7d2c9e10");
/// assert!(ResourceId::new("a/b").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    /// Create a new identifier from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, too long, `.`/`..`, or
    /// contains a character that is unsafe in a path segment.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether a JSON value holds this identifier.
    ///
    /// Numbers compare by their decimal representation.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match value {
            serde_json::Value::String(s) => s == &self.0,
            serde_json::Value::Number(n) => n.to_string() == self.0,
            _ => false,
        }
    }

    fn validate(s: &str) -> Result<(), Error> {
        let reject = |reason: &str| {
            Err(InvalidInputError::ResourceId {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into())
        };

        if s.is_empty() {
            return reject("cannot be empty");
        }

        if s.len() > 256 {
            return reject("exceeds maximum length of 256 characters");
        }

        if s == "." || s == ".." {
            return reject("cannot be '.' or '..'");
        }

        if let Some(c) = s
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#'))
        {
            return reject(&format!("contains invalid character {:?}", c));
        }

        Ok(())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = ResourceId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                ResourceId::new(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                ResourceId::new(v.to_string()).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                ResourceId::new(v.to_string()).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}
