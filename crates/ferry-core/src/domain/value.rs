//! Value model: the dynamic records that flow through the engine.
//!
//! The engine does not know the static types of the records it moves around,
//! so every argument and every result is a `Value`. Callables capture their
//! own state as ordinary serde fields and only speak `Value` at the edges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed record.
///
/// `Pair` is the two-element tuple that keyed operations (`PairFunction`,
/// reduce-by-key, ...) are built on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Pair(Box<Value>, Box<Value>),
    List(Vec<Value>),
    /// A named structure. Records without a registered codec are rebuilt
    /// field by field (see `registry::InstantiationStrategy`).
    Record {
        type_name: String,
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    pub fn pair(left: impl Into<Value>, right: impl Into<Value>) -> Self {
        Value::Pair(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn record(type_name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Value::Record {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Short name of the variant, used in coercion errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Pair(..) => "pair",
            Value::List(_) => "list",
            Value::Record { .. } => "record",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_pair(self) -> Result<(Value, Value), Value> {
        match self {
            Value::Pair(left, right) => Ok((*left, *right)),
            other => Err(other),
        }
    }

    pub fn into_list(self) -> Result<Vec<Value>, Value> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(other),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
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

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<L: Into<Value>, R: Into<Value>> From<(L, R)> for Value {
    fn from((left, right): (L, R)) -> Self {
        Value::pair(left, right)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Pair(l, r) => write!(f, "({l}, {r})"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Record { type_name, fields } => {
                write!(f, "{type_name} {{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {name}: {value}")?;
                }
                write!(f, " }}")
            }
        }
    }
}
