//! Structured record values and their per-kind decoders

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

use super::database::Database;
use super::{TypeTag, ValueError};

/// A decoded structured value, kept in normalised JSON form
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: String,
    data: serde_json::Value,
}

impl Record {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// Build a record from any serializable payload
    pub fn from_payload<T: Serialize>(kind: impl Into<String>, payload: &T) -> Result<Self, ValueError> {
        let kind = kind.into();
        let data = serde_json::to_value(payload)
            .map_err(|e| ValueError::parse(TypeTag::Record(kind.clone()), "", e.to_string()))?;
        Ok(Self { kind, data })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    /// Deserialize the record into a typed payload
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

/// Decoder for one record kind
///
/// Decoders validate the raw text against their payload shape and return the
/// normalised JSON form that is stored in the [`Record`].
pub trait RecordDecoder: Send + Sync {
    /// Kind name, used as the declared type name
    fn kind(&self) -> &str;

    /// Decode raw text into normalised record data
    fn decode(&self, raw: &str) -> Result<serde_json::Value, ValueError>;
}

/// Decodes JSON text into the payload type `T`
pub struct JsonDecoder<T> {
    kind: String,
    _payload: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            _payload: PhantomData,
        }
    }
}

impl<T: DeserializeOwned + Serialize> RecordDecoder for JsonDecoder<T> {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn decode(&self, raw: &str) -> Result<serde_json::Value, ValueError> {
        let tag = || TypeTag::Record(self.kind.clone());
        let payload: T = serde_json::from_str(raw).map_err(|e| ValueError::parse(tag(), raw, e.to_string()))?;
        serde_json::to_value(&payload).map_err(|e| ValueError::parse(tag(), raw, e.to_string()))
    }
}

/// Decodes YAML (and therefore also JSON) text into the payload type `T`
pub struct YamlDecoder<T> {
    kind: String,
    _payload: PhantomData<fn() -> T>,
}

impl<T> YamlDecoder<T> {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            _payload: PhantomData,
        }
    }
}

impl<T: DeserializeOwned + Serialize> RecordDecoder for YamlDecoder<T> {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn decode(&self, raw: &str) -> Result<serde_json::Value, ValueError> {
        let tag = || TypeTag::Record(self.kind.clone());
        let payload: T = serde_yaml::from_str(raw).map_err(|e| ValueError::parse(tag(), raw, e.to_string()))?;
        serde_json::to_value(&payload).map_err(|e| ValueError::parse(tag(), raw, e.to_string()))
    }
}

/// Kind name of the built-in database connection record
pub const DATABASE_KIND: &str = "database";

static BUILTIN_DECODERS: Lazy<HashMap<String, Arc<dyn RecordDecoder>>> = Lazy::new(|| {
    let mut m: HashMap<String, Arc<dyn RecordDecoder>> = HashMap::new();
    m.insert(
        DATABASE_KIND.to_string(),
        Arc::new(JsonDecoder::<Database>::new(DATABASE_KIND)),
    );
    m
});

/// Kind-to-decoder table used while parsing record values
#[derive(Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn RecordDecoder>>,
}

impl DecoderRegistry {
    /// Create a registry holding the built-in kinds
    pub fn new() -> Self {
        Self {
            decoders: BUILTIN_DECODERS.clone(),
        }
    }

    /// Register (or replace) the decoder for its kind
    pub fn register(&mut self, decoder: Arc<dyn RecordDecoder>) {
        self.decoders.insert(decoder.kind().to_string(), decoder);
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.decoders.contains_key(kind)
    }

    /// Registered kind names, sorted
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.decoders.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    pub fn decode(&self, kind: &str, raw: &str) -> Result<Record, ValueError> {
        let decoder = self
            .decoders
            .get(kind)
            .ok_or_else(|| ValueError::UnknownKind(kind.to_string()))?;
        Ok(Record::new(kind, decoder.decode(raw)?))
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Queue {
        url: String,
        #[serde(default)]
        fifo: bool,
    }

    #[test]
    fn test_builtin_database_kind() {
        let registry = DecoderRegistry::new();
        assert!(registry.contains(DATABASE_KIND));

        let record = registry
            .decode(
                DATABASE_KIND,
                r#"{"Provider":"postgres","Host":"db","Port":5432,"Database":"app","User":"u","Password":"p"}"#,
            )
            .unwrap();
        let db: Database = record.decode().unwrap();
        assert_eq!(db.host, "db");
        assert_eq!(db.port, 5432);
    }

    #[test]
    fn test_database_rejects_malformed_json() {
        let registry = DecoderRegistry::new();
        let err = registry.decode(DATABASE_KIND, "{not json").unwrap_err();
        assert!(matches!(err, ValueError::Parse { .. }));
    }

    #[test]
    fn test_register_yaml_kind() {
        let mut registry = DecoderRegistry::new();
        registry.register(Arc::new(YamlDecoder::<Queue>::new("queue")));

        let record = registry.decode("queue", "url: https://sqs/q1\nfifo: true").unwrap();
        assert_eq!(record.kind(), "queue");
        assert_eq!(
            record.decode::<Queue>().unwrap(),
            Queue { url: "https://sqs/q1".into(), fifo: true }
        );

        // JSON is accepted by the YAML decoder as well
        let record = registry.decode("queue", r#"{"url": "https://sqs/q2"}"#).unwrap();
        assert_eq!(record.data()["fifo"], serde_json::Value::Bool(false));
    }

    #[test]
    fn test_unknown_kind() {
        let registry = DecoderRegistry::new();
        assert_eq!(
            registry.decode("queue", "{}").unwrap_err(),
            ValueError::UnknownKind("queue".into())
        );
    }

    #[test]
    fn test_kinds_sorted() {
        let mut registry = DecoderRegistry::new();
        registry.register(Arc::new(JsonDecoder::<Queue>::new("cache")));
        assert_eq!(registry.kinds(), vec!["cache".to_string(), "database".to_string()]);
    }
}
