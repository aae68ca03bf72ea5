//! Attribute values attached to documents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A frontmatter attribute value.
///
/// Values are opaque to the indexer but must be usable as index keys, so the
/// set of shapes is closed and equality is total:
/// - `Int(n)` equals `Float(f)` when `f` is integral and `n as f64 == f`
/// - `NaN` equals `NaN`, and `-0.0` equals `0.0`
///
/// Serialized untagged so the cache holds plain JSON values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum AttrValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AttrValue>),
    Map(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// Short name of the value's shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integral floats collapse onto their integer value so both hash alike.
    fn numeric_key(&self) -> Option<NumericKey> {
        match *self {
            Self::Int(n) => Some(NumericKey::Int(n)),
            Self::Float(f) => Some(float_key(f)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NumericKey {
    Int(i64),
    Bits(u64),
}

fn float_key(f: f64) -> NumericKey {
    if f.is_nan() {
        return NumericKey::Bits(f64::NAN.to_bits());
    }
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return NumericKey::Int(f as i64);
    }
    NumericKey::Bits(f.to_bits())
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.numeric_key(), other.numeric_key()) {
            return a == b;
        }
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AttrValue {}

impl Hash for AttrValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Int(n) => {
                0u8.hash(state);
                NumericKey::Int(*n).hash(state);
            }
            Self::Float(f) => {
                0u8.hash(state);
                float_key(*f).hash(state);
            }
            Self::Null => 1u8.hash(state),
            Self::Bool(b) => {
                2u8.hash(state);
                b.hash(state);
            }
            Self::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Self::List(items) => {
                4u8.hash(state);
                items.hash(state);
            }
            Self::Map(map) => {
                5u8.hash(state);
                map.hash(state);
            }
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
            Self::List(_) | Self::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{json}")
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_yaml::Value> for AttrValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    // u64 beyond i64::MAX and real floats both land here
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Map(
                map.into_iter().map(|(k, v)| (yaml_key_to_string(k), Self::from(v))).collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other).unwrap_or_default().trim().to_string(),
    }
}
