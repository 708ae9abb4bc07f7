//! Resolution engine
//!
//! A [`ResolutionSession`] owns a finished [`ParameterRegistry`] and resolves
//! every registered parameter exactly once. The first successful
//! [`resolve`](ResolutionSession::resolve) freezes the results and later
//! calls return them without touching any source again.
//!
//! Per parameter the first source that yields a parseable value wins:
//!
//! 1. An explicitly supplied command-line argument. A parse failure is fatal.
//! 2. A non-empty environment variable of the same name.
//! 3. The secret store, for secret-backed parameters. Stage-sensitive
//!    parameters try `{name}_{stage}` before `{name}`.
//! 4. Required parameters without a value are collected and reported together.
//! 5. The registered default.
//!
//! The stage parameter is resolved first so later stage-sensitive lookups can
//! build their qualified names; all other parameters follow in name order.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use paramstack_core::{ParameterOptions, ParameterRegistry, ResolutionSession};
//! use paramstack_core::secrets::MemorySecretStore;
//! use paramstack_core::sources::{MapArguments, MapEnvironment};
//!
//! let mut registry = ParameterRegistry::new();
//! registry.add_string("STAGE", "dev", "Deployment stage", false, ParameterOptions::default());
//! registry.add_string("TOKEN", "", "API token", true, ParameterOptions::stage_secret());
//!
//! let store = Arc::new(MemorySecretStore::new());
//! store.insert("TOKEN_prod", "abc");
//!
//! let mut session = ResolutionSession::new(registry)
//!     .with_arguments(MapArguments::new().with("STAGE", "prod"))
//!     .with_environment(MapEnvironment::new())
//!     .with_secret_resolver(store);
//!
//! let results = session.resolve().unwrap();
//! assert_eq!(results.string("TOKEN"), "abc");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{CoercionPolicy, ResolverSettings};
use crate::descriptor::ParameterDescriptor;
use crate::error::{ParamError, ParamResult};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::registry::ParameterRegistry;
use crate::results::{ResolvedValue, Results, ValueSource};
use crate::secrets::{
    named_backend, BackendFactory, CachingSecretResolver, SecretResolver, SecretResult, NO_BACKEND,
};
use crate::sources::{ArgumentSource, EnvironmentSource, NoArguments, ProcessEnvironment};
use crate::stage::StageContext;
use crate::value::{TypedValue, ValueError};
use crate::{log_debug, log_info, log_warn};

enum State {
    Unparsed,
    Parsed(Results),
}

/// Secret store connected by an earlier run, with the region it serves
struct ConnectedSecrets {
    region: String,
    resolver: Arc<dyn SecretResolver>,
}

/// One resolution run over a registry
pub struct ResolutionSession {
    registry: ParameterRegistry,
    arguments: Box<dyn ArgumentSource>,
    environment: Box<dyn EnvironmentSource>,
    secret_backend: Option<BackendFactory>,
    connected: Option<ConnectedSecrets>,
    settings: ResolverSettings,
    logger: SharedLogger,
    state: State,
}

impl ResolutionSession {
    /// Create a session with no arguments, the process environment, the
    /// backend named by the default settings and a silent logger
    pub fn new(registry: ParameterRegistry) -> Self {
        Self {
            registry,
            arguments: Box::new(NoArguments),
            environment: Box::new(ProcessEnvironment),
            secret_backend: None,
            connected: None,
            settings: ResolverSettings::default(),
            logger: Arc::new(NoOpLogger),
            state: State::Unparsed,
        }
    }

    pub fn with_arguments(mut self, arguments: impl ArgumentSource + 'static) -> Self {
        self.arguments = Box::new(arguments);
        self
    }

    pub fn with_environment(mut self, environment: impl EnvironmentSource + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    /// Use `factory` to connect the secret store once the region is known
    ///
    /// Takes precedence over `settings.secret_backend`.
    pub fn with_secret_backend(mut self, factory: BackendFactory) -> Self {
        self.secret_backend = Some(factory);
        self.connected = None;
        self
    }

    /// Use the globally registered backend called `name`
    pub fn with_named_secret_backend(self, name: &str) -> Self {
        self.with_secret_backend(named_backend(name))
    }

    /// Use an already connected resolver, whatever the region
    pub fn with_secret_resolver(self, resolver: Arc<dyn SecretResolver>) -> Self {
        self.with_secret_backend(Arc::new(move |_region: &str| -> SecretResult<Arc<dyn SecretResolver>> {
            Ok(resolver.clone())
        }))
    }

    pub fn with_settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self.connected = None;
        self
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, State::Parsed(_))
    }

    /// Frozen results of a previous successful run
    pub fn results(&self) -> Option<&Results> {
        match &self.state {
            State::Parsed(results) => Some(results),
            State::Unparsed => None,
        }
    }

    /// Resolve every registered parameter
    ///
    /// Idempotent: once a run has succeeded the same results are returned and
    /// no source is consulted again. A failed run leaves the session
    /// unresolved; the secret store it connected stays open, so a retry
    /// does not reconnect and, with `cache_secrets`, does not refetch keys it
    /// already read.
    pub fn resolve(&mut self) -> ParamResult<Results> {
        if let State::Parsed(results) = &self.state {
            log_debug!(self.logger, "Parameters already resolved, returning cached results");
            return Ok(results.clone());
        }

        let results = self.run()?;
        self.state = State::Parsed(results.clone());
        Ok(results)
    }

    fn run(&mut self) -> ParamResult<Results> {
        let region_name = self.settings.region_parameter.clone();
        if !self.registry.contains(&region_name) {
            self.registry.register(self.settings.bootstrap_descriptor());
        }

        let mut values = BTreeMap::new();
        let mut stage = StageContext::new();
        let mut missing = Vec::new();

        // The region is needed to reach the secret store, so it is never
        // looked up there.
        let region = match self.registry.get(&region_name) {
            Some(descriptor) => self.resolve_parameter(descriptor, None, &stage)?,
            None => None,
        };
        let secrets = match &region {
            Some(resolved) => self.secrets_for(&resolved.value.to_string()),
            None => {
                missing.push(region_name.clone());
                None
            }
        };
        if let Some(resolved) = region {
            values.insert(region_name.clone(), resolved);
        }

        for descriptor in self.resolution_order() {
            if descriptor.name == region_name {
                continue;
            }
            match self.resolve_parameter(descriptor, secrets.as_deref(), &stage)? {
                Some(resolved) => {
                    if descriptor.name == self.settings.stage_parameter {
                        stage.record(&resolved.value);
                    }
                    values.insert(descriptor.name.clone(), resolved);
                }
                None => missing.push(descriptor.name.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(ParamError::MissingRequired(missing));
        }

        log_info!(
            self.logger,
            "Resolved {} parameters (stage: {})",
            values.len(),
            stage.stage().unwrap_or("none")
        );
        Ok(Results::new(values))
    }

    /// Stage parameter first, then everything else by name
    fn resolution_order(&self) -> Vec<&ParameterDescriptor> {
        let stage_name = self.settings.stage_parameter.as_str();
        let mut order: Vec<&ParameterDescriptor> = self.registry.get(stage_name).into_iter().collect();
        order.extend(self.registry.descriptors().filter(|d| d.name != stage_name));
        order
    }

    /// Secret store for `region`, reusing the one a previous run connected
    fn secrets_for(&mut self, region: &str) -> Option<Arc<dyn SecretResolver>> {
        if let Some(connected) = &self.connected {
            if connected.region == region {
                return Some(connected.resolver.clone());
            }
        }

        let resolver = self.connect_secrets(region)?;
        self.connected = Some(ConnectedSecrets {
            region: region.to_string(),
            resolver: resolver.clone(),
        });
        Some(resolver)
    }

    /// Connect the secret store for `region`; failures disable secret tiers
    fn connect_secrets(&self, region: &str) -> Option<Arc<dyn SecretResolver>> {
        let factory = match &self.secret_backend {
            Some(factory) => factory.clone(),
            None if self.settings.secret_backend == NO_BACKEND => {
                log_debug!(self.logger, "No secret backend configured");
                return None;
            }
            None => named_backend(&self.settings.secret_backend),
        };

        match factory(region) {
            Ok(resolver) => {
                log_debug!(self.logger, "Secret backend {} connected for region {}", resolver.name(), region);
                if self.settings.cache_secrets {
                    Some(Arc::new(CachingSecretResolver::new(resolver)))
                } else {
                    Some(resolver)
                }
            }
            Err(e) => {
                log_warn!(
                    self.logger,
                    "Secret backend unavailable for region {}, secret lookups disabled: {}",
                    region,
                    e
                );
                None
            }
        }
    }

    /// Walk the precedence chain for one parameter
    ///
    /// Returns `None` for a required parameter that no source provided.
    fn resolve_parameter(
        &self,
        descriptor: &ParameterDescriptor,
        secrets: Option<&dyn SecretResolver>,
        stage: &StageContext,
    ) -> ParamResult<Option<ResolvedValue>> {
        let name = descriptor.name.as_str();

        if let Some(raw) = self.arguments.explicit_value(name) {
            let mut slot = self.slot(descriptor);
            slot.set(&raw, self.registry.decoders())
                .map_err(|error| ParamError::InvalidArgument {
                    name: name.to_string(),
                    error,
                })?;
            return Ok(Some(self.resolved(descriptor, slot, ValueSource::CommandLine)));
        }

        if let Some(raw) = self.environment.var(name) {
            let mut slot = self.slot(descriptor);
            match slot.set(&raw, self.registry.decoders()) {
                Ok(()) => return Ok(Some(self.resolved(descriptor, slot, ValueSource::Environment))),
                Err(error) => self.coercion_failed(name, ValueSource::Environment, error)?,
            }
        }

        if let (true, Some(secrets)) = (descriptor.options.secrets_enabled, secrets) {
            let mut keys = Vec::with_capacity(2);
            if descriptor.options.stage_sensitive {
                keys.extend(stage.qualified_name(name));
            }
            keys.push(name.to_string());

            for key in keys {
                let secret = match secrets.get_value(&key) {
                    Ok(secret) => secret,
                    Err(e) => {
                        log_debug!(self.logger, "Secret {} not available: {}", key, e);
                        continue;
                    }
                };
                let mut slot = self.slot(descriptor);
                match slot.set(&secret.value, self.registry.decoders()) {
                    Ok(()) => {
                        return Ok(Some(self.resolved(descriptor, slot, ValueSource::Secret { key })));
                    }
                    Err(error) => self.coercion_failed(name, ValueSource::Secret { key }, error)?,
                }
            }
        }

        if descriptor.required {
            log_debug!(self.logger, "{} is required and no source provided it", name);
            return Ok(None);
        }

        Ok(Some(self.resolved(descriptor, self.slot(descriptor), ValueSource::Default)))
    }

    fn slot(&self, descriptor: &ParameterDescriptor) -> TypedValue {
        TypedValue::new(descriptor.default_value.clone())
    }

    fn resolved(&self, descriptor: &ParameterDescriptor, slot: TypedValue, source: ValueSource) -> ResolvedValue {
        log_debug!(
            self.logger,
            "{} ({}) resolved from {}",
            descriptor.name,
            descriptor.declared_type(),
            source
        );
        ResolvedValue {
            value: slot.into_value(),
            source,
        }
    }

    /// Apply the coercion policy to an environment or secret value that did not parse
    fn coercion_failed(&self, name: &str, origin: ValueSource, error: ValueError) -> ParamResult<()> {
        match self.settings.coercion {
            CoercionPolicy::Lenient => {
                log_warn!(self.logger, "Ignoring value of {} from {}: {}", name, origin, error);
                Ok(())
            }
            CoercionPolicy::Strict => Err(ParamError::InvalidSource {
                name: name.to_string(),
                origin,
                error,
            }),
        }
    }
}
