//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{SecretError, SecretResolver, SecretResult, SecretValue};

/// In-memory secret store for testing and embedding
///
/// Every lookup name is recorded, hit or miss, so callers can verify which
/// keys were requested and in what order.
///
/// # Example
///
/// ```
/// use paramstack_core::secrets::{SecretResolver, MemorySecretStore};
///
/// let store = MemorySecretStore::new();
/// store.insert("DB_PASSWORD", "hunter2");
///
/// let _ = store.get_value("DB_PASSWORD_prod");
/// let _ = store.get_value("DB_PASSWORD");
/// assert_eq!(store.lookups(), vec!["DB_PASSWORD_prod", "DB_PASSWORD"]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
    lookups: RwLock<Vec<String>>,
}

impl MemorySecretStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store with initial values
    pub fn with_secrets(initial: HashMap<String, String>) -> Self {
        Self {
            secrets: RwLock::new(initial),
            lookups: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.secrets.write().insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.secrets.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.secrets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names requested so far, in order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.read().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.read().len()
    }
}

impl SecretResolver for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_value(&self, name: &str) -> SecretResult<SecretValue> {
        self.lookups.write().push(name.to_string());
        self.secrets
            .read()
            .get(name)
            .map(|value| SecretValue::new(value.as_str()))
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get() {
        let store = MemorySecretStore::new();
        assert!(store.is_empty());

        store.insert("key", "value");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_value("key").unwrap(), SecretValue::new("value"));
        assert_eq!(store.get_value("other"), Err(SecretError::NotFound("other".into())));
    }

    #[test]
    fn test_memory_store_records_lookups() {
        let store = MemorySecretStore::with_secrets(HashMap::from([("a".to_string(), "1".to_string())]));
        let _ = store.get_value("b");
        let _ = store.get_value("a");
        assert_eq!(store.lookups(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(store.lookup_count(), 2);
    }

    #[test]
    fn test_memory_store_remove() {
        let store = MemorySecretStore::new();
        store.insert("key", "value");
        assert_eq!(store.remove("key"), Some("value".to_string()));
        assert!(store.get_value("key").is_err());
    }
}
