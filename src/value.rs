//! Values returned by generated methods
//!
//! A `Value` is either a literal (nil, bool, number, text, symbol, list, map)
//! or a type descriptor. Type descriptors request random generation; used
//! without `generate` they are returned as-is.
//!
//! ## Serialized form
//!
//! ```yaml
//! returnValue: 42                 # literal
//! returnValue: {type: integer}    # type descriptor
//! returnValue: {symbol: ready}    # symbol literal
//! ```

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A literal or type descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawValue", into = "RawValue")]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Atomic identifier token
    Symbol(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// A reference to a kind of value rather than an instance of it
    Type(TypeDescriptor),
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Text content of a string or symbol
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Type(_) => "type",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{:?}", fl),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(s) => write!(f, ":{}", s),
            Value::List(items) => {
                let strs: Vec<_> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", strs.join(", "))
            }
            Value::Map(m) => {
                let pairs: Vec<_> = m.iter().map(|(k, v)| format!("{:?} => {}", k, v)).collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Value::Type(t) => write!(f, "{}", t.class_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<TypeDescriptor> for Value {
    fn from(t: TypeDescriptor) -> Self {
        Value::Type(t)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Kinds of value a type descriptor can name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Integer,
    String,
    Symbol,
    Float,
    Boolean,
    List,
    Map,
    /// Any other named type
    Named(String),
}

impl TypeDescriptor {
    /// Name used in the serialized `{type: ...}` form
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Integer => "integer",
            TypeDescriptor::String => "string",
            TypeDescriptor::Symbol => "symbol",
            TypeDescriptor::Float => "float",
            TypeDescriptor::Boolean => "boolean",
            TypeDescriptor::List => "list",
            TypeDescriptor::Map => "map",
            TypeDescriptor::Named(n) => n,
        }
    }

    /// Capitalized identity, as returned by a method whose type is not generated
    pub fn class_name(&self) -> String {
        match self {
            TypeDescriptor::Named(n) => n.clone(),
            other => crate::util::to_pascal_case(other.name()),
        }
    }
}

impl From<&str> for TypeDescriptor {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "integer" | "int" => TypeDescriptor::Integer,
            "string" | "str" | "text" => TypeDescriptor::String,
            "symbol" => TypeDescriptor::Symbol,
            "float" => TypeDescriptor::Float,
            "boolean" | "bool" => TypeDescriptor::Boolean,
            "list" | "array" => TypeDescriptor::List,
            "map" | "hash" => TypeDescriptor::Map,
            _ => TypeDescriptor::Named(s.to_string()),
        }
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Wire shape of `Value`: plain YAML/JSON nodes, with single-key
// `{type: ..}` and `{symbol: ..}` maps promoted to their variants.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<RawValue>),
    Map(BTreeMap<String, RawValue>),
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => Value::Nil,
            RawValue::Bool(b) => Value::Bool(b),
            RawValue::Int(i) => Value::Int(i),
            RawValue::Float(f) => Value::Float(f),
            RawValue::String(s) => Value::String(s),
            RawValue::List(items) => Value::List(items.into_iter().map(Value::from).collect()),
            RawValue::Map(m) => {
                if m.len() == 1 {
                    if let Some(RawValue::String(name)) = m.get("type") {
                        return Value::Type(TypeDescriptor::from(name.as_str()));
                    }
                    if let Some(RawValue::String(name)) = m.get("symbol") {
                        return Value::Symbol(name.clone());
                    }
                }
                Value::Map(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Nil => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Int(i) => RawValue::Int(i),
            Value::Float(f) => RawValue::Float(f),
            Value::String(s) => RawValue::String(s),
            Value::Symbol(s) => tagged("symbol", s),
            Value::List(items) => RawValue::List(items.into_iter().map(RawValue::from).collect()),
            Value::Map(m) => RawValue::Map(m.into_iter().map(|(k, v)| (k, v.into())).collect()),
            Value::Type(t) => tagged("type", t.name().to_string()),
        }
    }
}

fn tagged(key: &str, name: String) -> RawValue {
    RawValue::Map(BTreeMap::from([(key.to_string(), RawValue::String(name))]))
}

impl JsonSchema for Value {
    fn schema_name() -> Cow<'static, str> {
        "Value".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        RawValue::json_schema(generator)
    }
}
