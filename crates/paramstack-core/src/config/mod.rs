//! Resolver settings and parameter manifests
//!
//! - `ResolverSettings`: tunables of the resolution engine, YAML-loadable
//! - `ParameterManifest`: YAML file declaring an application's parameters

mod error;
mod settings;
mod manifest;

pub use error::{ConfigError, ConfigResult};
pub use settings::{CoercionPolicy, ResolverSettings, DEFAULT_REGION, REGION_PARAMETER, STAGE_PARAMETER};
pub use manifest::{ManifestCommand, ManifestParameter, ParameterManifest};
