//! paramstack Core
//!
//! Layered parameter resolution for services and command-line tools.
//! Every registered parameter is resolved once at startup from, in order:
//! an explicit command-line argument, an environment variable of the same
//! name, a secret store (optionally qualified by the deployment stage) and
//! finally its registered default.
//!
//! ```rust
//! use paramstack_core::{ParameterOptions, ParameterRegistry, ResolutionSession};
//! use paramstack_core::sources::MapEnvironment;
//!
//! let mut registry = ParameterRegistry::new();
//! registry.add_int("PORT", 5432, "Database port", false, ParameterOptions::default());
//! registry.add_string("HOST", "", "Database host", true, ParameterOptions::default());
//!
//! let mut session = ResolutionSession::new(registry)
//!     .with_environment(MapEnvironment::new().with("HOST", "db.example.com"));
//!
//! let results = session.resolve().unwrap();
//! assert_eq!(results.int("PORT"), 5432);
//! assert_eq!(results.string("HOST"), "db.example.com");
//! ```
//!
//! ## Secret stores
//!
//! The `secrets` module holds the `SecretResolver` capability, in-memory,
//! caching, chained and OS keychain implementations, and a registry of named
//! backends. A backend that cannot be reached never aborts resolution; it
//! only disables the secret tier for that run.

pub mod value;
pub mod descriptor;
pub mod registry;
pub mod sources;
pub mod secrets;
pub mod logging;
pub mod stage;
pub mod config;
pub mod results;
pub mod error;
pub mod engine;

// Re-export commonly used types
pub use value::{
    Database, DecoderRegistry, JsonDecoder, Record, RecordDecoder, TypeTag, TypedValue,
    Value, ValueError, YamlDecoder,
};

pub use descriptor::{ParameterDescriptor, ParameterOptions};
pub use registry::ParameterRegistry;

pub use sources::{ArgumentSource, EnvironmentSource};

pub use secrets::{
    SecretResolver, SecretValue, SecretError, SecretResult,
    MemorySecretStore, CachingSecretResolver, ChainSecretResolver, KeychainSecretStore,
    register_secret_backend, create_secret_backend, list_secret_backends,
};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger, MemoryLogger};

pub use config::{CoercionPolicy, ParameterManifest, ResolverSettings};

pub use results::{ResolvedValue, Results, ResultsError, ValueSource};
pub use error::{ParamError, ParamResult};
pub use engine::ResolutionSession;
