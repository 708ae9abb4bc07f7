//! Resolution engine settings

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::descriptor::ParameterDescriptor;
use crate::secrets::NO_BACKEND;

/// Name of the bootstrap parameter holding the secret store region
pub const REGION_PARAMETER: &str = "AWS-REGION-SECRETS";

/// Region used when the bootstrap parameter is not supplied
pub const DEFAULT_REGION: &str = "us-east-1";

/// Name of the parameter whose value qualifies stage-sensitive secrets
pub const STAGE_PARAMETER: &str = "STAGE";

/// What to do when an environment or secret value does not parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    /// Log a warning and fall through to the next source
    #[default]
    Lenient,
    /// Abort resolution with an error
    Strict,
}

/// Tunables of the resolution engine
///
/// Every field has a default, so a settings document only needs the keys it
/// changes:
///
/// ```
/// use paramstack_core::config::{CoercionPolicy, ResolverSettings};
///
/// let settings = ResolverSettings::from_yaml_str("coercion: strict").unwrap();
/// assert_eq!(settings.coercion, CoercionPolicy::Strict);
/// assert_eq!(settings.stage_parameter, "STAGE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Name of the bootstrap region parameter
    pub region_parameter: String,
    /// Region used when the bootstrap parameter is not supplied
    pub default_region: String,
    /// Name of the stage parameter, resolved before all others
    pub stage_parameter: String,
    /// Handling of unparseable environment and secret values
    pub coercion: CoercionPolicy,
    /// Memoise secret lookups for the lifetime of the backend
    pub cache_secrets: bool,
    /// Registered backend name used when no factory is given explicitly
    pub secret_backend: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            region_parameter: REGION_PARAMETER.to_string(),
            default_region: DEFAULT_REGION.to_string(),
            stage_parameter: STAGE_PARAMETER.to_string(),
            coercion: CoercionPolicy::Lenient,
            cache_secrets: true,
            secret_backend: NO_BACKEND.to_string(),
        }
    }
}

impl ResolverSettings {
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Descriptor of the bootstrap region parameter
    ///
    /// It is never secret-backed: the region is needed to reach the secret
    /// store in the first place.
    pub fn bootstrap_descriptor(&self) -> ParameterDescriptor {
        ParameterDescriptor::new(
            self.region_parameter.as_str(),
            self.default_region.as_str(),
            "The secret store region",
            false,
        )
    }
}
