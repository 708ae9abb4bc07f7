//! In-memory argument sources

use std::collections::HashMap;

use super::ArgumentSource;

/// An argument source where nothing was supplied
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArguments;

impl ArgumentSource for NoArguments {
    fn explicit_value(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Explicit arguments held in a map
///
/// Every entry counts as explicitly supplied, including empty strings.
///
/// # Example
///
/// ```
/// use paramstack_core::sources::{ArgumentSource, MapArguments};
///
/// let args = MapArguments::new().with("STAGE", "prod");
/// assert_eq!(args.explicit_value("STAGE"), Some("prod".to_string()));
/// assert_eq!(args.explicit_value("HOST"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapArguments {
    values: HashMap<String, String>,
}

impl MapArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }
}

impl ArgumentSource for MapArguments {
    fn explicit_value(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}
