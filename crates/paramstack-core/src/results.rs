//! Read-only view over resolved parameter values
//!
//! Each supported type has two accessors: a checked `try_*` accessor that
//! reports a missing key or a type mismatch, and a plain accessor that
//! panics in those cases. Use the plain accessors only for parameters you
//! registered yourself with the matching type.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::value::{Database, Record, Value, DATABASE_KIND};

/// Where a resolved value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    CommandLine,
    Environment,
    /// Secret store, with the key that answered
    Secret { key: String },
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::CommandLine => f.write_str("command line"),
            ValueSource::Environment => f.write_str("environment"),
            ValueSource::Secret { key } => write!(f, "secret store ({})", key),
            ValueSource::Default => f.write_str("default"),
        }
    }
}

/// A resolved value with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    pub value: Value,
    pub source: ValueSource,
}

/// Errors from the checked accessors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultsError {
    #[error("parameter {0} was not resolved")]
    KeyNotFound(String),

    #[error("the {key} parameter isn't type {expected} (it is {actual})")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("the {key} parameter could not be decoded: {message}")]
    Decode { key: String, message: String },
}

impl ResultsError {
    fn mismatch(key: &str, expected: &str, actual: &Value) -> Self {
        Self::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            actual: actual.type_tag().to_string(),
        }
    }
}

macro_rules! accessors {
    ($(#[$doc:meta])* $name:ident, $try_name:ident, $variant:ident, $ret:ty, $expected:expr, |$v:ident| $conv:expr) => {
        $(#[$doc])*
        pub fn $try_name(&self, key: &str) -> Result<$ret, ResultsError> {
            match self.lookup(key)? {
                Value::$variant($v) => Ok($conv),
                other => Err(ResultsError::mismatch(key, $expected, other)),
            }
        }

        $(#[$doc])*
        ///
        /// # Panics
        ///
        /// If the key was not resolved or holds another type.
        #[track_caller]
        pub fn $name(&self, key: &str) -> $ret {
            match self.$try_name(key) {
                Ok(v) => v,
                Err(e) => panic!("{}", e),
            }
        }
    };
}

/// Frozen, immutable mapping from parameter name to resolved value
///
/// Cloning is cheap: clones share the same underlying map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results {
    values: Arc<BTreeMap<String, ResolvedValue>>,
}

impl Results {
    pub(crate) fn new(values: BTreeMap<String, ResolvedValue>) -> Self {
        Self {
            values: Arc::new(values),
        }
    }

    fn lookup(&self, key: &str) -> Result<&Value, ResultsError> {
        self.values
            .get(key)
            .map(|resolved| &resolved.value)
            .ok_or_else(|| ResultsError::KeyNotFound(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).map(|resolved| &resolved.value)
    }

    /// Which source provided the value of `key`
    pub fn source(&self, key: &str) -> Option<&ValueSource> {
        self.values.get(key).map(|resolved| &resolved.source)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Resolved names in lexicographic order
    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.values.iter().map(|(name, resolved)| (name.as_str(), resolved))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    accessors!(
        /// String value of `key`
        string, try_string, String, &str, "string", |v| v.as_str()
    );
    accessors!(
        /// Bool value of `key`
        bool, try_bool, Bool, bool, "bool", |v| *v
    );
    accessors!(
        /// 32-bit signed value of `key`
        int, try_int, Int, i32, "int", |v| *v
    );
    accessors!(
        /// 64-bit signed value of `key`
        int64, try_int64, Int64, i64, "int64", |v| *v
    );
    accessors!(
        /// 32-bit unsigned value of `key`
        uint, try_uint, Uint, u32, "uint", |v| *v
    );
    accessors!(
        /// 64-bit unsigned value of `key`
        uint64, try_uint64, Uint64, u64, "uint64", |v| *v
    );
    accessors!(
        /// Float value of `key`
        float64, try_float64, Float64, f64, "float64", |v| *v
    );
    accessors!(
        /// Structured record of `key`, of any kind
        record, try_record, Record, &Record, "record", |v| v
    );

    /// Structured record of `key` decoded into `T`
    pub fn try_record_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, ResultsError> {
        self.try_record(key)?.decode().map_err(|e| ResultsError::Decode {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Database connection record of `key`
    pub fn try_database(&self, key: &str) -> Result<Database, ResultsError> {
        match self.lookup(key)? {
            Value::Record(record) if record.kind() == DATABASE_KIND => self.try_record_as(key),
            other => Err(ResultsError::mismatch(key, DATABASE_KIND, other)),
        }
    }

    /// Database connection record of `key`
    ///
    /// # Panics
    ///
    /// If the key was not resolved or is not a database record.
    #[track_caller]
    pub fn database(&self, key: &str) -> Database {
        match self.try_database(key) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }

    /// All values as a JSON object keyed by parameter name
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .values
            .iter()
            .map(|(name, resolved)| {
                let value = serde_json::to_value(&resolved.value).unwrap_or(serde_json::Value::Null);
                (name.clone(), value)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}
