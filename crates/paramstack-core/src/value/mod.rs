//! Typed parameter values
//!
//! Every parameter has a declared [`TypeTag`] that is fixed at registration.
//! Raw strings coming from the command line, the environment or a secret
//! store are parsed into a [`Value`] of that type through [`TypedValue::set`].

mod parse;
mod record;
mod database;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use database::{Database, DatabaseError};
pub use parse::parse_value;
pub use record::{DecoderRegistry, JsonDecoder, Record, RecordDecoder, YamlDecoder, DATABASE_KIND};

/// Declared type of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    /// 32-bit signed integer
    Int,
    Int64,
    /// 32-bit unsigned integer
    Uint,
    Uint64,
    Float64,
    String,
    /// Structured record decoded by the decoder registered for this kind
    Record(String),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Int64 => "int64",
            TypeTag::Uint => "uint",
            TypeTag::Uint64 => "uint64",
            TypeTag::Float64 => "float64",
            TypeTag::String => "string",
            TypeTag::Record(kind) => kind,
        }
    }

    /// Parse a type name as written in manifests
    ///
    /// Unknown names are treated as record kinds, so they must have a decoder
    /// registered before any value of that type can be parsed.
    pub fn from_name(name: &str) -> Self {
        match name {
            "bool" => TypeTag::Bool,
            "int" => TypeTag::Int,
            "int64" => TypeTag::Int64,
            "uint" => TypeTag::Uint,
            "uint64" => TypeTag::Uint64,
            "float64" => TypeTag::Float64,
            "string" => TypeTag::String,
            other => TypeTag::Record(other.to_string()),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter value of one of the supported kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Int64(i64),
    Uint(u32),
    Uint64(u64),
    Float64(f64),
    String(String),
    Record(Record),
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Int64(_) => TypeTag::Int64,
            Value::Uint(_) => TypeTag::Uint,
            Value::Uint64(_) => TypeTag::Uint64,
            Value::Float64(_) => TypeTag::Float64,
            Value::String(_) => TypeTag::String,
            Value::Record(record) => TypeTag::Record(record.kind().to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Uint64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Record(record) => write!(f, "{}", record.data()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

/// Errors raised while turning a raw string into a typed value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("invalid {expected} value {raw:?}: {reason}")]
    Parse {
        expected: TypeTag,
        raw: String,
        reason: String,
    },

    #[error("{expected} value {raw:?} out of range")]
    Range { expected: TypeTag, raw: String },

    #[error("no decoder registered for record kind {0:?}")]
    UnknownKind(String),
}

impl ValueError {
    pub fn parse(expected: TypeTag, raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            expected,
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn range(expected: TypeTag, raw: impl Into<String>) -> Self {
        Self::Range {
            expected,
            raw: raw.into(),
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, ValueError::Range { .. })
    }
}

/// A value slot for one parameter and one source attempt
///
/// Starts out holding the default payload and unset. A successful
/// [`set`](TypedValue::set) replaces the payload and marks the slot as
/// explicitly set, even when the new value equals the default. A failed
/// `set` leaves the slot untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    value: Value,
    explicitly_set: bool,
}

impl TypedValue {
    pub fn new(default: Value) -> Self {
        Self {
            value: default,
            explicitly_set: false,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.value.type_tag()
    }

    /// Parse `raw` with this slot's type and store the result
    pub fn set(&mut self, raw: &str, decoders: &DecoderRegistry) -> Result<(), ValueError> {
        let parsed = parse_value(&self.value.type_tag(), raw, decoders)?;
        self.value = parsed;
        self.explicitly_set = true;
        Ok(())
    }

    pub fn get(&self) -> &Value {
        &self.value
    }

    pub fn is_set(&self) -> bool {
        self.explicitly_set
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_names() {
        assert_eq!(TypeTag::Int64.to_string(), "int64");
        assert_eq!(TypeTag::Record("database".into()).to_string(), "database");
        assert_eq!(TypeTag::from_name("uint"), TypeTag::Uint);
        assert_eq!(TypeTag::from_name("queue"), TypeTag::Record("queue".into()));
    }

    #[test]
    fn test_value_type_tag() {
        assert_eq!(Value::from(5i32).type_tag(), TypeTag::Int);
        assert_eq!(Value::from(5u64).type_tag(), TypeTag::Uint64);
        assert_eq!(Value::from("x").type_tag(), TypeTag::String);
    }

    #[test]
    fn test_typed_value_set_marks_explicit() {
        let decoders = DecoderRegistry::new();
        let mut slot = TypedValue::new(Value::Int(5432));
        assert!(!slot.is_set());

        // Same as the default still counts as explicitly set
        slot.set("5432", &decoders).unwrap();
        assert!(slot.is_set());
        assert_eq!(slot.get(), &Value::Int(5432));
    }

    #[test]
    fn test_typed_value_failed_set_keeps_state() {
        let decoders = DecoderRegistry::new();
        let mut slot = TypedValue::new(Value::Bool(false));

        let err = slot.set("maybe", &decoders).unwrap_err();
        assert!(matches!(err, ValueError::Parse { .. }));
        assert!(!slot.is_set());
        assert_eq!(slot.get(), &Value::Bool(false));
    }

    #[test]
    fn test_typed_value_range_error() {
        let decoders = DecoderRegistry::new();
        let mut slot = TypedValue::new(Value::Uint(1));

        let err = slot.set("4294967296", &decoders).unwrap_err();
        assert!(err.is_range());
        assert_eq!(slot.into_value(), Value::Uint(1));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Float64(100.1).to_string(), "100.1");
        assert_eq!(Value::String("prod".into()).to_string(), "prod");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }
}
