//! Secret backend registry for creating resolvers by name

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::keychain_store::KeychainSecretStore;
use super::memory_store::MemorySecretStore;
use super::traits::{SecretError, SecretResolver, SecretResult};

/// Factory that connects a backend for a region
///
/// Returning an error means the backend is unusable for this run.
pub type BackendFactory = Arc<dyn Fn(&str) -> SecretResult<Arc<dyn SecretResolver>> + Send + Sync>;

/// Definition of a registered secret backend
pub struct BackendDefinition {
    /// Unique name for this backend
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factory function to create instances
    pub factory: BackendFactory,
}

impl std::fmt::Debug for BackendDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Backend name that never connects, disabling secret lookups
pub const NO_BACKEND: &str = "none";

fn definition(name: &str, description: &str, factory: BackendFactory) -> (String, BackendDefinition) {
    (
        name.to_string(),
        BackendDefinition {
            name: name.to_string(),
            description: description.to_string(),
            factory,
        },
    )
}

/// Global registry of secret backends
static REGISTRY: Lazy<RwLock<HashMap<String, BackendDefinition>>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Register built-in backends
    let (name, def) = definition(
        "keychain",
        "System keychain (macOS Keychain, Windows Credential Manager, Linux Secret Service)",
        Arc::new(|region: &str| -> SecretResult<Arc<dyn SecretResolver>> {
            Ok(Arc::new(KeychainSecretStore::connect(region)?))
        }),
    );
    map.insert(name, def);

    let (name, def) = definition(
        "memory",
        "Empty in-memory store for testing",
        Arc::new(|_region: &str| -> SecretResult<Arc<dyn SecretResolver>> {
            Ok(Arc::new(MemorySecretStore::new()))
        }),
    );
    map.insert(name, def);

    let (name, def) = definition(
        NO_BACKEND,
        "No secret store; secret-backed parameters fall back to their defaults",
        Arc::new(|_region: &str| -> SecretResult<Arc<dyn SecretResolver>> {
            Err(SecretError::NotAvailable("no secret backend configured".to_string()))
        }),
    );
    map.insert(name, def);

    RwLock::new(map)
});

/// Register a new secret backend, replacing any backend with the same name
///
/// # Example
///
/// ```
/// use paramstack_core::secrets::{register_secret_backend, create_secret_backend, MemorySecretStore, SecretResolver};
/// use std::sync::Arc;
///
/// register_secret_backend(
///     "fixture",
///     "Pre-seeded store",
///     Arc::new(|_region: &str| -> paramstack_core::secrets::SecretResult<Arc<dyn SecretResolver>> {
///         let store = MemorySecretStore::new();
///         store.insert("TOKEN", "abc");
///         Ok(Arc::new(store))
///     }),
/// );
///
/// let backend = create_secret_backend("fixture", "us-east-1").unwrap();
/// assert_eq!(backend.get_value("TOKEN").unwrap().value, "abc");
/// ```
pub fn register_secret_backend(name: &str, description: &str, factory: BackendFactory) {
    let (name, def) = definition(name, description, factory);
    REGISTRY.write().insert(name, def);
}

/// Connect the backend registered as `name` for `region`
pub fn create_secret_backend(name: &str, region: &str) -> SecretResult<Arc<dyn SecretResolver>> {
    // Clone the factory so the lock is not held while the backend connects
    let factory = REGISTRY
        .read()
        .get(name)
        .map(|def| def.factory.clone())
        .ok_or_else(|| SecretError::NotAvailable(format!("unknown secret backend: {}", name)))?;
    factory(region)
}

/// Factory that looks `name` up in the registry when invoked
pub fn named_backend(name: &str) -> BackendFactory {
    let name = name.to_string();
    Arc::new(move |region: &str| create_secret_backend(&name, region))
}

/// List all registered backends as (name, description) pairs, sorted by name
pub fn list_secret_backends() -> Vec<(String, String)> {
    let mut backends: Vec<(String, String)> = REGISTRY
        .read()
        .values()
        .map(|def| (def.name.clone(), def.description.clone()))
        .collect();
    backends.sort();
    backends
}

/// Check if a backend is registered
pub fn has_secret_backend(name: &str) -> bool {
    REGISTRY.read().contains_key(name)
}

/// Unregister a backend (mainly for testing)
pub fn unregister_secret_backend(name: &str) -> bool {
    REGISTRY.write().remove(name).is_some()
}
