//! Memoising secret resolver

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::traits::{SecretResolver, SecretResult, SecretValue};

/// Wraps a resolver and remembers every successful lookup
///
/// Failed lookups are not cached, so a later call retries the backend.
pub struct CachingSecretResolver {
    inner: Arc<dyn SecretResolver>,
    cache: Mutex<HashMap<String, SecretValue>>,
}

impl CachingSecretResolver {
    pub fn new(inner: Arc<dyn SecretResolver>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &Arc<dyn SecretResolver> {
        &self.inner
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl SecretResolver for CachingSecretResolver {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get_value(&self, name: &str) -> SecretResult<SecretValue> {
        if let Some(hit) = self.cache.lock().get(name) {
            return Ok(hit.clone());
        }

        let value = self.inner.get_value(name)?;
        self.cache.lock().insert(name.to_string(), value.clone());
        Ok(value)
    }
}

impl std::fmt::Debug for CachingSecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingSecretResolver")
            .field("inner", &self.inner.name())
            .field("cached", &self.cached_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MemorySecretStore;

    #[test]
    fn test_cache_hits_skip_backend() {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("key", "value");
        let cache = CachingSecretResolver::new(store.clone());

        assert_eq!(cache.get_value("key").unwrap().value, "value");
        assert_eq!(cache.get_value("key").unwrap().value, "value");
        assert_eq!(store.lookup_count(), 1);
        assert_eq!(cache.name(), "memory");
    }

    #[test]
    fn test_misses_are_not_cached() {
        let store = Arc::new(MemorySecretStore::new());
        let cache = CachingSecretResolver::new(store.clone());

        assert!(cache.get_value("key").is_err());
        store.insert("key", "late");
        assert_eq!(cache.get_value("key").unwrap().value, "late");
        assert_eq!(store.lookup_count(), 2);
    }

    #[test]
    fn test_clear_cache() {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("key", "value");
        let cache = CachingSecretResolver::new(store.clone());

        cache.get_value("key").unwrap();
        assert_eq!(cache.cached_len(), 1);
        cache.clear_cache();
        assert_eq!(cache.cached_len(), 0);
        cache.get_value("key").unwrap();
        assert_eq!(store.lookup_count(), 2);
    }
}
