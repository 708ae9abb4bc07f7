//! Core traits and types for secret resolution

use thiserror::Error;

/// A raw secret as returned by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretValue {
    /// The secret text
    pub value: String,
    /// Whether the text is a JSON object (key-value secret)
    pub is_structured: bool,
}

impl SecretValue {
    /// Wrap raw secret text, detecting whether it is a JSON object
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let is_structured = is_json_object(&value);
        Self { value, is_structured }
    }
}

/// Whether `raw` parses as a JSON object
pub fn is_json_object(raw: &str) -> bool {
    serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(raw).is_ok()
}

/// Errors that can occur while talking to a secret backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Secret backend not available: {0}")]
    NotAvailable(String),

    #[error("Secret backend error: {0}")]
    Backend(String),
}

pub type SecretResult<T> = Result<T, SecretError>;

/// Capability to fetch a secret by name
///
/// This is the only thing the resolution engine needs from a secret store.
/// Implementations own their transport, authentication, retries and
/// timeouts; the engine treats every error as "not available from this tier".
///
/// Implementations:
/// - `MemorySecretStore`: in-memory, records lookups
/// - `KeychainSecretStore`: OS keychain, namespaced by region
/// - `CachingSecretResolver`: memoises another resolver
/// - `ChainSecretResolver`: first of several resolvers that answers
///
/// # Example
///
/// ```
/// use paramstack_core::secrets::{SecretResolver, MemorySecretStore};
///
/// let store = MemorySecretStore::new();
/// store.insert("TOKEN_prod", "abc");
/// assert_eq!(store.get_value("TOKEN_prod").unwrap().value, "abc");
/// assert!(store.get_value("TOKEN").is_err());
/// ```
pub trait SecretResolver: Send + Sync {
    /// Human-readable name of this resolver
    fn name(&self) -> &str;

    /// Fetch the secret stored under `name`
    fn get_value(&self, name: &str) -> SecretResult<SecretValue>;
}
