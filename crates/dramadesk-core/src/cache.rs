//! In-memory tag cache.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::{debug, trace};

use crate::traits::{CacheTag, Listener, SubscriptionId, TagCache};

#[derive(Debug)]
struct Entry {
    value: Value,
    tags: BTreeSet<CacheTag>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Entry>,
    listeners: HashMap<u64, (CacheTag, Listener)>,
    epoch: u64,
}

/// Process-wide [`TagCache`] held in memory.
///
/// Share it between dispatchers through an `Arc`.
#[derive(Default)]
pub struct MemoryTagCache {
    state: RwLock<CacheState>,
    next_subscription: AtomicU64,
}

impl MemoryTagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TagCache for MemoryTagCache {
    fn lookup(&self, key: &str) -> Option<Value> {
        let hit = self.read().entries.get(key).map(|e| e.value.clone());
        trace!(key, hit = hit.is_some(), "Cache lookup");
        hit
    }

    fn epoch(&self) -> u64 {
        self.read().epoch
    }

    fn store(&self, key: &str, value: Value, tags: &[CacheTag], epoch: u64) {
        let mut state = self.write();
        if state.epoch != epoch {
            debug!(key, "Discarding response that raced an invalidation");
            return;
        }
        state.entries.insert(
            key.to_string(),
            Entry {
                value,
                tags: tags.iter().cloned().collect(),
            },
        );
    }

    fn invalidate(&self, tag: &CacheTag) {
        let listeners: Vec<Listener> = {
            let mut state = self.write();
            state.epoch += 1;
            let before = state.entries.len();
            state.entries.retain(|_, entry| !entry.tags.contains(tag));
            debug!(
                %tag,
                dropped = before - state.entries.len(),
                "Invalidated cache tag"
            );
            state
                .listeners
                .values()
                .filter(|(t, _)| t == tag)
                .map(|(_, l)| l.clone())
                .collect()
        };

        for listener in listeners {
            listener(tag);
        }
    }

    fn subscribe(&self, tag: &CacheTag, listener: Listener) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        self.write().listeners.insert(id, (tag.clone(), listener));
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.write().listeners.remove(&id.0);
    }
}

impl std::fmt::Debug for MemoryTagCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("MemoryTagCache")
            .field("entries", &state.entries.len())
            .field("listeners", &state.listeners.len())
            .field("epoch", &state.epoch)
            .finish()
    }
}
