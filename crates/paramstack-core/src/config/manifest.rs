//! Parameter manifest files (YAML)
//!
//! A manifest declares an application's parameters so a registry can be
//! built without code:
//!
//! ```yaml
//! name: orders
//! description: Order processing service
//! settings:
//!   secret_backend: keychain
//! parameters:
//!   - name: STAGE
//!     default: dev
//!   - name: PORT
//!     type: int
//!     default: 5432
//!   - name: DB_PASSWORD
//!     required: true
//!     stage_sensitive: true
//! commands:
//!   - name: migrate
//!     description: Apply pending migrations
//!     arguments: [version]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::settings::ResolverSettings;
use crate::descriptor::{ParameterDescriptor, ParameterOptions};
use crate::registry::ParameterRegistry;
use crate::value::{parse_value, DecoderRegistry, TypeTag, Value};

/// Manifest file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterManifest {
    /// Application name, shown in usage text
    #[serde(default)]
    pub name: String,

    /// Application description, shown in usage text
    #[serde(default)]
    pub description: String,

    /// Engine settings; defaults apply when omitted
    #[serde(default)]
    pub settings: Option<ResolverSettings>,

    /// Declared parameters
    #[serde(default)]
    pub parameters: Vec<ManifestParameter>,

    /// Subcommands the application accepts, shown in usage text only
    #[serde(default)]
    pub commands: Vec<ManifestCommand>,

    /// Positional arguments accepted without a command, shown in usage text only
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// A documented subcommand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestCommand {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// One parameter entry in a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestParameter {
    pub name: String,

    /// Type name: bool, int, int64, uint, uint64, float64, string or a record kind
    #[serde(rename = "type", default = "default_type_name")]
    pub type_name: String,

    /// Default value; the type's zero value when omitted
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,

    #[serde(default)]
    pub usage: String,

    #[serde(default)]
    pub required: bool,

    /// Consult the secret store
    #[serde(default)]
    pub secret: bool,

    /// Try `{name}_{stage}` first; implies `secret`
    #[serde(default)]
    pub stage_sensitive: bool,
}

fn default_type_name() -> String {
    TypeTag::String.to_string()
}

impl ManifestParameter {
    fn options(&self) -> ParameterOptions {
        ParameterOptions {
            secrets_enabled: self.secret || self.stage_sensitive,
            stage_sensitive: self.stage_sensitive,
        }
    }

    fn default_value(&self, decoders: &DecoderRegistry) -> ConfigResult<Value> {
        let tag = TypeTag::from_name(&self.type_name);
        let raw = match &self.default {
            None | Some(serde_yaml::Value::Null) => zero_literal(&tag).to_string(),
            Some(serde_yaml::Value::String(s)) => s.clone(),
            Some(serde_yaml::Value::Bool(b)) => b.to_string(),
            Some(serde_yaml::Value::Number(n)) => n.to_string(),
            Some(other) => serde_json::to_string(other).map_err(|e| ConfigError::Other(e.to_string()))?,
        };
        parse_value(&tag, &raw, decoders).map_err(|source| ConfigError::InvalidDefault {
            name: self.name.clone(),
            source,
        })
    }
}

fn zero_literal(tag: &TypeTag) -> &'static str {
    match tag {
        TypeTag::Bool => "false",
        TypeTag::Int | TypeTag::Int64 | TypeTag::Uint | TypeTag::Uint64 | TypeTag::Float64 => "0",
        TypeTag::String => "",
        TypeTag::Record(_) => "{}",
    }
}

impl ParameterManifest {
    /// Load a manifest from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Default manifest location for an application
    ///
    /// `<config dir>/paramstack/<app>.yaml`, e.g. `~/.config/paramstack/orders.yaml`.
    pub fn default_path(app: &str) -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("paramstack").join(format!("{}.yaml", app))
    }

    /// Settings declared by the manifest, or the defaults
    pub fn resolver_settings(&self) -> ResolverSettings {
        self.settings.clone().unwrap_or_default()
    }

    /// Build a fresh registry holding the declared parameters
    pub fn to_registry(&self) -> ConfigResult<ParameterRegistry> {
        let mut registry = ParameterRegistry::new();
        self.register_into(&mut registry)?;
        Ok(registry)
    }

    /// Register the declared parameters into an existing registry
    ///
    /// Use this when the manifest refers to record kinds whose decoders the
    /// caller registers first. Defaults are parsed with the declared type.
    /// Nothing is registered if any entry is invalid.
    pub fn register_into(&self, registry: &mut ParameterRegistry) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        let mut descriptors = Vec::with_capacity(self.parameters.len());

        for param in &self.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(ConfigError::DuplicateParameter(param.name.clone()));
            }
            let default = param.default_value(registry.decoders())?;
            descriptors.push(
                ParameterDescriptor::new(param.name.as_str(), default, param.usage.as_str(), param.required)
                    .with_options(param.options()),
            );
        }

        for descriptor in descriptors {
            registry.register(descriptor);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoercionPolicy;
    use std::io::Write;

    const MANIFEST: &str = r#"
name: orders
description: Order processing service
settings:
  coercion: strict
parameters:
  - name: STAGE
    default: dev
  - name: PORT
    type: int
    default: 5432
    usage: Database port
  - name: LOCAL
    type: bool
  - name: RATIO
    type: float64
    default: 0.5
  - name: DB_PASSWORD
    required: true
    stage_sensitive: true
  - name: DATABASE
    type: database
    secret: true
    default:
      Host: localhost
      Port: 5432
commands:
  - name: migrate
    description: Apply pending migrations
    arguments: [version]
arguments: [input]
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = ParameterManifest::from_yaml_str(MANIFEST).unwrap();
        assert_eq!(manifest.name, "orders");
        assert_eq!(manifest.parameters.len(), 6);
        assert_eq!(manifest.resolver_settings().coercion, CoercionPolicy::Strict);
        assert_eq!(manifest.parameters[0].type_name, "string");
        assert_eq!(manifest.commands[0].name, "migrate");
        assert_eq!(manifest.commands[0].arguments, vec!["version"]);
        assert_eq!(manifest.arguments, vec!["input"]);
    }

    #[test]
    fn test_to_registry() {
        let registry = ParameterManifest::from_yaml_str(MANIFEST).unwrap().to_registry().unwrap();

        assert_eq!(registry.get("STAGE").unwrap().default_value, Value::String("dev".into()));
        assert_eq!(registry.get("PORT").unwrap().default_value, Value::Int(5432));
        assert_eq!(registry.get("PORT").unwrap().usage, "Database port");
        assert_eq!(registry.get("LOCAL").unwrap().default_value, Value::Bool(false));
        assert_eq!(registry.get("RATIO").unwrap().default_value, Value::Float64(0.5));

        let password = registry.get("DB_PASSWORD").unwrap();
        assert!(password.required);
        assert_eq!(password.options, ParameterOptions::stage_secret());

        let database = registry.get("DATABASE").unwrap();
        assert_eq!(database.declared_type(), &TypeTag::Record("database".into()));
        match &database.default_value {
            Value::Record(record) => assert_eq!(record.data()["Host"], "localhost"),
            other => panic!("unexpected default {:?}", other),
        }
    }

    #[test]
    fn test_invalid_default_is_rejected() {
        let manifest = ParameterManifest::from_yaml_str(
            "parameters:\n  - name: PORT\n    type: uint\n    default: -1\n",
        )
        .unwrap();
        assert!(matches!(
            manifest.to_registry(),
            Err(ConfigError::InvalidDefault { ref name, .. }) if name == "PORT"
        ));
    }

    #[test]
    fn test_unknown_record_kind_is_rejected() {
        let manifest =
            ParameterManifest::from_yaml_str("parameters:\n  - name: QUEUE\n    type: queue\n").unwrap();
        assert!(matches!(manifest.to_registry(), Err(ConfigError::InvalidDefault { .. })));
    }

    #[test]
    fn test_duplicate_parameter_is_rejected() {
        let manifest = ParameterManifest::from_yaml_str(
            "parameters:\n  - name: HOST\n  - name: HOST\n    type: int\n",
        )
        .unwrap();

        let mut registry = ParameterRegistry::new();
        assert!(matches!(
            manifest.register_into(&mut registry),
            Err(ConfigError::DuplicateParameter(name)) if name == "HOST"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let manifest = ParameterManifest::load(file.path()).unwrap();
        assert_eq!(manifest.description, "Order processing service");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ParameterManifest::load("/nonexistent/paramstack/manifest.yaml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_default_path() {
        let path = ParameterManifest::default_path("orders");
        assert!(path.ends_with("paramstack/orders.yaml"));
    }
}
