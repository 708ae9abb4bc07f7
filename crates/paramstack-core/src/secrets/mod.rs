//! Secret resolution abstractions and implementations
//!
//! This module provides a pluggable secret backend system with:
//! - `SecretResolver` trait, the get-by-name capability the engine consumes
//! - Built-in implementations: `MemorySecretStore`, `KeychainSecretStore`,
//!   `CachingSecretResolver`, `ChainSecretResolver`
//! - A registry for connecting backends by name and region

mod traits;
mod memory_store;
mod cache;
mod chain_store;
mod keychain_store;
mod registry;

pub use traits::{is_json_object, SecretError, SecretResolver, SecretResult, SecretValue};
pub use memory_store::MemorySecretStore;
pub use cache::CachingSecretResolver;
pub use chain_store::ChainSecretResolver;
pub use keychain_store::{KeychainSecretStore, KEYCHAIN_SERVICE_PREFIX};
pub use registry::{
    create_secret_backend, has_secret_backend, list_secret_backends, named_backend,
    register_secret_backend, unregister_secret_backend, BackendDefinition, BackendFactory, NO_BACKEND,
};
