//! Cache-tag invalidation trait.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A label grouping cached reads so a mutation can invalidate them together.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheTag(Cow<'static, str>);

impl CacheTag {
    pub const fn new(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    pub fn owned(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Callback run after a tag has been invalidated.
pub type Listener = Arc<dyn Fn(&CacheTag) + Send + Sync>;

/// Handle returned by [`TagCache::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A shared store of cached reads keyed by request, grouped by tag.
///
/// Queries read through [`lookup`](Self::lookup) and fill with
/// [`store`](Self::store); mutations call [`invalidate`](Self::invalidate)
/// once their response has been received. Last write wins.
pub trait TagCache: Send + Sync {
    /// Returns the cached value for a request key.
    fn lookup(&self, key: &str) -> Option<Value>;

    /// Current invalidation epoch; increases on every invalidation.
    fn epoch(&self) -> u64;

    /// Cache a value under `key`, grouped by `tags`.
    ///
    /// The value is dropped if an invalidation happened since `epoch` was
    /// read, so a response that raced a mutation is never served later.
    fn store(&self, key: &str, value: Value, tags: &[CacheTag], epoch: u64);

    /// Drop every entry carrying `tag` and notify its listeners.
    fn invalidate(&self, tag: &CacheTag);

    /// Register a listener for invalidations of `tag`.
    fn subscribe(&self, tag: &CacheTag, listener: Listener) -> SubscriptionId;

    /// Remove a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
