//! Parameter registry
//!
//! Collects descriptors before resolution. Registration is last-write-wins:
//! registering a name twice silently replaces the earlier descriptor.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::descriptor::{ParameterDescriptor, ParameterOptions};
use crate::value::{Database, DecoderRegistry, Record, RecordDecoder, Value, ValueError, DATABASE_KIND};

/// Name-to-descriptor map plus the record decoders its types need
#[derive(Debug, Clone, Default)]
pub struct ParameterRegistry {
    descriptors: BTreeMap<String, ParameterDescriptor>,
    decoders: DecoderRegistry,
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one with the same name
    pub fn register(&mut self, descriptor: ParameterDescriptor) {
        self.descriptors.insert(descriptor.name.clone(), descriptor);
    }

    /// Register a record decoder so parameters of its kind can be parsed
    pub fn register_decoder(&mut self, decoder: Arc<dyn RecordDecoder>) {
        self.decoders.register(decoder);
    }

    /// Alias for [`add_string`](Self::add_string)
    pub fn add(&mut self, name: &str, default: &str, usage: &str, required: bool, options: ParameterOptions) {
        self.add_string(name, default, usage, required, options);
    }

    pub fn add_string(&mut self, name: &str, default: &str, usage: &str, required: bool, options: ParameterOptions) {
        self.add_value(name, default, usage, required, options);
    }

    pub fn add_bool(&mut self, name: &str, default: bool, usage: &str, required: bool, options: ParameterOptions) {
        self.add_value(name, default, usage, required, options);
    }

    pub fn add_int(&mut self, name: &str, default: i32, usage: &str, required: bool, options: ParameterOptions) {
        self.add_value(name, default, usage, required, options);
    }

    pub fn add_int64(&mut self, name: &str, default: i64, usage: &str, required: bool, options: ParameterOptions) {
        self.add_value(name, default, usage, required, options);
    }

    pub fn add_uint(&mut self, name: &str, default: u32, usage: &str, required: bool, options: ParameterOptions) {
        self.add_value(name, default, usage, required, options);
    }

    pub fn add_uint64(&mut self, name: &str, default: u64, usage: &str, required: bool, options: ParameterOptions) {
        self.add_value(name, default, usage, required, options);
    }

    pub fn add_float64(&mut self, name: &str, default: f64, usage: &str, required: bool, options: ParameterOptions) {
        self.add_value(name, default, usage, required, options);
    }

    pub fn add_database(
        &mut self,
        name: &str,
        default: &Database,
        usage: &str,
        required: bool,
        options: ParameterOptions,
    ) -> Result<(), ValueError> {
        let record = Record::from_payload(DATABASE_KIND, default)?;
        self.add_record(name, record, usage, required, options)
    }

    /// Register a structured parameter
    ///
    /// Fails if no decoder is registered for the record's kind, since none of
    /// its source values could ever be parsed.
    pub fn add_record(
        &mut self,
        name: &str,
        default: Record,
        usage: &str,
        required: bool,
        options: ParameterOptions,
    ) -> Result<(), ValueError> {
        if !self.decoders.contains(default.kind()) {
            return Err(ValueError::UnknownKind(default.kind().to_string()));
        }
        self.add_value(name, default, usage, required, options);
        Ok(())
    }

    fn add_value(
        &mut self,
        name: &str,
        default: impl Into<Value>,
        usage: &str,
        required: bool,
        options: ParameterOptions,
    ) {
        self.register(ParameterDescriptor::new(name, default, usage, required).with_options(options));
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.descriptors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Registered names in lexicographic order
    pub fn names(&self) -> Vec<String> {
        self.descriptors.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Owned copy of every descriptor, sorted by name
    pub fn snapshot(&self) -> Vec<ParameterDescriptor> {
        self.descriptors.values().cloned().collect()
    }

    pub fn decoders(&self) -> &DecoderRegistry {
        &self.decoders
    }

    pub(crate) fn descriptors(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.descriptors.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeTag;

    #[test]
    fn test_typed_adders() {
        let mut registry = ParameterRegistry::new();
        registry.add("ADD", "default", "string alias", false, ParameterOptions::default());
        registry.add_bool("LOCAL", false, "", false, ParameterOptions::default());
        registry.add_int("PORT", 5432, "", false, ParameterOptions::default());
        registry.add_int64("INT64", 50, "", false, ParameterOptions::default());
        registry.add_uint("UINT", 50, "", false, ParameterOptions::default());
        registry.add_uint64("UINT64", 50, "", false, ParameterOptions::default());
        registry.add_float64("RATIO", 50.5, "", false, ParameterOptions::default());

        assert_eq!(registry.len(), 7);
        assert_eq!(registry.get("ADD").unwrap().declared_type(), &TypeTag::String);
        assert_eq!(registry.get("LOCAL").unwrap().declared_type(), &TypeTag::Bool);
        assert_eq!(registry.get("UINT64").unwrap().default_value, Value::Uint64(50));
        assert_eq!(registry.get("RATIO").unwrap().declared_type(), &TypeTag::Float64);
    }

    #[test]
    fn test_reregistration_last_write_wins() {
        let mut registry = ParameterRegistry::new();
        registry.add_string("HOST", "a", "first", false, ParameterOptions::default());
        registry.add_int("HOST", 1, "second", true, ParameterOptions::secret());

        assert_eq!(registry.len(), 1);
        let host = registry.get("HOST").unwrap();
        assert_eq!(host.usage, "second");
        assert_eq!(host.declared_type(), &TypeTag::Int);
        assert!(host.options.secrets_enabled);
    }

    #[test]
    fn test_snapshot_is_sorted_copy() {
        let mut registry = ParameterRegistry::new();
        registry.add_string("ZETA", "", "", false, ParameterOptions::default());
        registry.add_string("ALPHA", "", "", true, ParameterOptions::default());

        let mut snapshot = registry.snapshot();
        assert_eq!(snapshot[0].name, "ALPHA");
        assert_eq!(snapshot[1].name, "ZETA");

        snapshot[0].required = false;
        assert!(registry.get("ALPHA").unwrap().required);
    }

    #[test]
    fn test_add_database() {
        let mut registry = ParameterRegistry::new();
        registry
            .add_database("DB", &Database::default(), "", false, ParameterOptions::secret())
            .unwrap();
        assert_eq!(
            registry.get("DB").unwrap().declared_type(),
            &TypeTag::Record("database".into())
        );
    }

    #[test]
    fn test_add_record_requires_decoder() {
        let mut registry = ParameterRegistry::new();
        let err = registry
            .add_record("QUEUE", Record::new("queue", serde_json::json!({})), "", false, ParameterOptions::default())
            .unwrap_err();
        assert_eq!(err, ValueError::UnknownKind("queue".into()));
        assert!(!registry.contains("QUEUE"));
    }
}
