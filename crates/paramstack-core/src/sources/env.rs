//! Environment variable sources

use std::collections::HashMap;
use std::env;

use super::EnvironmentSource;

/// Reads variables from the process environment
///
/// Names are used verbatim: no prefixing, no case mapping. Unset, empty and
/// non-UTF-8 variables are all reported as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self
    }
}

impl EnvironmentSource for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        match env::var(name) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }
}

/// Environment variables held in a map, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvironmentSource for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).filter(|v| !v.is_empty()).cloned()
    }
}
