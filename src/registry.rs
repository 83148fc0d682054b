//! Registered providers, kept sorted by descending priority.

use std::cmp::Reverse;
use std::collections::HashMap;

use parking_lot::Mutex;

use crate::cache::{Cache, Verbosity};
use crate::provider::Provider;
use crate::types::{ProviderId, ProviderInfo, Resolved};

/// A registered provider together with its caches.
pub(crate) struct ProviderHolder {
    pub(crate) id: ProviderId,
    pub(crate) provider: Box<dyn Provider>,
    /// Scratch space handed to the provider.
    pub(crate) cache: Cache,
    /// Final answers per key. A stored `None` records a known miss.
    resolved: Mutex<HashMap<String, Option<Resolved>>>,
}

impl ProviderHolder {
    fn new(id: ProviderId, provider: Box<dyn Provider>, verbosity: Verbosity) -> Self {
        Self {
            id,
            provider,
            cache: Cache::new(verbosity),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn priority(&self) -> i32 {
        self.provider.priority()
    }

    /// `None` when the key has not been computed yet, `Some(None)` for a
    /// cached miss.
    pub(crate) fn cached(&self, key: &str) -> Option<Option<Resolved>> {
        self.resolved.lock().get(key).cloned()
    }

    pub(crate) fn store(&self, key: &str, value: Option<Resolved>) {
        self.resolved.lock().insert(key.to_string(), value);
    }

    pub(crate) fn evict(&self, key: &str) {
        self.resolved.lock().remove(key);
    }

    pub(crate) fn clear(&self) {
        self.resolved.lock().clear();
        self.cache.clear();
    }

    pub(crate) fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: self.id,
            priority: self.priority(),
            description: self.provider.description().to_string(),
        }
    }
}

/// Providers in lookup order. Registration is additive; there is no removal.
#[derive(Default)]
pub(crate) struct ProviderRegistry {
    holders: Vec<ProviderHolder>,
    next_id: usize,
}

impl ProviderRegistry {
    /// Add a provider and re-sort. Equal priorities keep registration order.
    pub(crate) fn register(
        &mut self,
        provider: Box<dyn Provider>,
        verbosity: Verbosity,
    ) -> ProviderId {
        let id = ProviderId(self.next_id);
        self.next_id += 1;
        self.holders.push(ProviderHolder::new(id, provider, verbosity));
        self.holders.sort_by_key(|h| Reverse(h.priority()));
        id
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ProviderHolder> {
        self.holders.iter()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.holders.len()
    }
}
