//! Chained secret resolver with fallback behavior

use std::sync::Arc;

use super::traits::{SecretError, SecretResolver, SecretResult, SecretValue};

/// A secret resolver that chains multiple resolvers together
///
/// Lookups try each resolver in order and return the first value found.
/// If every resolver fails, the last error is returned.
///
/// # Example
///
/// ```
/// use paramstack_core::secrets::{SecretResolver, ChainSecretResolver, MemorySecretStore};
/// use std::sync::Arc;
///
/// let overrides = Arc::new(MemorySecretStore::new());
/// let shared = Arc::new(MemorySecretStore::new());
/// shared.insert("TOKEN", "from-shared");
///
/// // Try overrides first, then fall back to shared
/// let chain = ChainSecretResolver::new(vec![overrides, shared]);
/// assert_eq!(chain.get_value("TOKEN").unwrap().value, "from-shared");
/// ```
pub struct ChainSecretResolver {
    resolvers: Vec<Arc<dyn SecretResolver>>,
}

impl ChainSecretResolver {
    /// Create a new chain
    ///
    /// An empty chain is allowed and never finds anything.
    pub fn new(resolvers: Vec<Arc<dyn SecretResolver>>) -> Self {
        Self { resolvers }
    }

    /// Get the resolvers in this chain
    pub fn resolvers(&self) -> &[Arc<dyn SecretResolver>] {
        &self.resolvers
    }
}

impl SecretResolver for ChainSecretResolver {
    fn name(&self) -> &str {
        "chain"
    }

    fn get_value(&self, name: &str) -> SecretResult<SecretValue> {
        let mut last_error = SecretError::NotFound(name.to_string());
        for resolver in &self.resolvers {
            match resolver.get_value(name) {
                Ok(value) => return Ok(value),
                Err(e) => last_error = e,
            }
        }
        Err(last_error)
    }
}

// Implement Debug manually since Arc<dyn SecretResolver> doesn't implement Debug
impl std::fmt::Debug for ChainSecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.resolvers.iter().map(|r| r.name()).collect();
        f.debug_struct("ChainSecretResolver")
            .field("resolvers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MemorySecretStore;

    struct Unreachable;

    impl SecretResolver for Unreachable {
        fn name(&self) -> &str {
            "unreachable"
        }

        fn get_value(&self, _name: &str) -> SecretResult<SecretValue> {
            Err(SecretError::NotAvailable("connection refused".into()))
        }
    }

    #[test]
    fn test_chain_name() {
        let chain = ChainSecretResolver::new(vec![Arc::new(MemorySecretStore::new())]);
        assert_eq!(chain.name(), "chain");
    }

    #[test]
    fn test_chain_priority() {
        let first = Arc::new(MemorySecretStore::new());
        let second = Arc::new(MemorySecretStore::new());
        first.insert("key", "from_first");
        second.insert("key", "from_second");

        let chain = ChainSecretResolver::new(vec![first, second.clone()]);
        assert_eq!(chain.get_value("key").unwrap().value, "from_first");
        assert_eq!(second.lookup_count(), 0);
    }

    #[test]
    fn test_chain_skips_failing_backend() {
        let store = Arc::new(MemorySecretStore::new());
        store.insert("key", "value");

        let chain = ChainSecretResolver::new(vec![Arc::new(Unreachable), store]);
        assert_eq!(chain.get_value("key").unwrap().value, "value");
    }

    #[test]
    fn test_chain_returns_last_error() {
        let chain = ChainSecretResolver::new(vec![
            Arc::new(MemorySecretStore::new()),
            Arc::new(Unreachable),
        ]);
        assert_eq!(
            chain.get_value("key"),
            Err(SecretError::NotAvailable("connection refused".into()))
        );

        let empty = ChainSecretResolver::new(vec![]);
        assert_eq!(empty.get_value("key"), Err(SecretError::NotFound("key".into())));
    }
}
