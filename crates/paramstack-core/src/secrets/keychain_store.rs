//! System keychain secret store
//!
//! Uses the OS keychain for secret storage:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use keyring::Entry;

use super::traits::{SecretError, SecretResolver, SecretResult, SecretValue};

/// Service name prefix for keychain entries
pub const KEYCHAIN_SERVICE_PREFIX: &str = "paramstack";

/// Secret store backed by the system keychain
///
/// Secrets are namespaced by region: with region `us-east-1` and secret
/// name `DB_PASSWORD`, the keychain entry is service
/// `paramstack/us-east-1`, user `DB_PASSWORD`.
///
/// # Example
///
/// ```no_run
/// use paramstack_core::secrets::{KeychainSecretStore, SecretResolver};
///
/// let store = KeychainSecretStore::connect("us-east-1").unwrap();
/// store.store("DB_PASSWORD", "hunter2").unwrap();
/// assert_eq!(store.get_value("DB_PASSWORD").unwrap().value, "hunter2");
/// ```
#[derive(Debug, Clone)]
pub struct KeychainSecretStore {
    service_name: String,
}

impl KeychainSecretStore {
    /// Open the keychain namespace for `region`
    ///
    /// Fails when the platform keychain cannot be reached, for example on a
    /// headless server without a Secret Service daemon.
    pub fn connect(region: &str) -> SecretResult<Self> {
        if region.is_empty() {
            return Err(SecretError::NotAvailable("region is required".to_string()));
        }
        let store = Self {
            service_name: format!("{}/{}", KEYCHAIN_SERVICE_PREFIX, region),
        };
        // Entry creation fails when no keychain backend is usable
        Entry::new(&store.service_name, "__paramstack_availability_check__")
            .map_err(|e| SecretError::NotAvailable(format!("keychain unavailable: {}", e)))?;
        Ok(store)
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn entry(&self, key: &str) -> SecretResult<Entry> {
        Entry::new(&self.service_name, key)
            .map_err(|e| SecretError::Backend(format!("failed to create keychain entry: {}", e)))
    }

    /// Store a secret (provisioning helper; resolution never writes)
    pub fn store(&self, key: &str, value: &str) -> SecretResult<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| SecretError::Backend(format!("failed to store in keychain: {}", e)))
    }

    /// Delete a secret; deleting a missing secret succeeds
    pub fn delete(&self, key: &str) -> SecretResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SecretError::Backend(format!("failed to delete from keychain: {}", e))),
        }
    }
}

impl SecretResolver for KeychainSecretStore {
    fn name(&self) -> &str {
        "keychain"
    }

    fn get_value(&self, name: &str) -> SecretResult<SecretValue> {
        match self.entry(name)?.get_password() {
            Ok(password) => Ok(SecretValue::new(password)),
            Err(keyring::Error::NoEntry) => Err(SecretError::NotFound(name.to_string())),
            Err(keyring::Error::NoStorageAccess(e)) | Err(keyring::Error::PlatformFailure(e)) => {
                Err(SecretError::NotAvailable(e.to_string()))
            }
            Err(e) => Err(SecretError::Backend(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require a running keychain service
    // They may fail on CI systems without proper keychain setup

    #[test]
    #[ignore] // Requires system keychain
    fn test_store_and_get() {
        let store = KeychainSecretStore::connect("paramstack-test").unwrap();
        let _ = store.delete("test_key");

        store.store("test_key", "test_value").unwrap();
        assert_eq!(store.get_value("test_key").unwrap().value, "test_value");

        store.delete("test_key").unwrap();
        assert_eq!(
            store.get_value("test_key"),
            Err(SecretError::NotFound("test_key".into()))
        );
    }

    #[test]
    fn test_empty_region_rejected() {
        assert!(matches!(
            KeychainSecretStore::connect(""),
            Err(SecretError::NotAvailable(_))
        ));
    }

    #[test]
    #[ignore] // Requires system keychain
    fn test_service_name_includes_region() {
        let store = KeychainSecretStore::connect("eu-west-1").unwrap();
        assert_eq!(store.service_name(), "paramstack/eu-west-1");
        assert_eq!(store.name(), "keychain");
    }
}
