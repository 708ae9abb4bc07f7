//! Parameter descriptors

use crate::value::{TypeTag, Value};

/// Secret-store behaviour of a parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterOptions {
    /// Whether the secret store is consulted for this parameter
    pub secrets_enabled: bool,
    /// Whether `{name}_{stage}` is tried before `{name}` in the secret store
    pub stage_sensitive: bool,
}

impl ParameterOptions {
    /// Plain secret lookup by name
    pub fn secret() -> Self {
        Self {
            secrets_enabled: true,
            stage_sensitive: false,
        }
    }

    /// Secret lookup qualified by the current stage, falling back to the plain name
    pub fn stage_secret() -> Self {
        Self {
            secrets_enabled: true,
            stage_sensitive: true,
        }
    }
}

/// Registered metadata for one configurable value
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// Name used verbatim for the flag, the environment variable and the secret key
    pub name: String,
    pub default_value: Value,
    pub usage: String,
    pub required: bool,
    pub options: ParameterOptions,
    declared_type: TypeTag,
}

impl ParameterDescriptor {
    pub fn new(
        name: impl Into<String>,
        default_value: impl Into<Value>,
        usage: impl Into<String>,
        required: bool,
    ) -> Self {
        let default_value = default_value.into();
        Self {
            name: name.into(),
            declared_type: default_value.type_tag(),
            default_value,
            usage: usage.into(),
            required,
            options: ParameterOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParameterOptions) -> Self {
        self.options = options;
        self
    }

    /// Type every source value for this parameter is parsed as
    pub fn declared_type(&self) -> &TypeTag {
        &self.declared_type
    }
}
