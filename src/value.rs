//! Runtime values and the primitive token converter.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Primitive kinds a single command-line token can convert into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Bool,
    Int,
    Float,
    Str,
    Path,
}

/// Failure to convert one token into a primitive value.
#[derive(Debug, Clone, Error)]
#[error("invalid {expected} value '{token}'")]
pub struct TokenError {
    pub token: String,
    pub expected: &'static str,
}

impl Scalar {
    /// Human-readable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::Int => "int",
            Scalar::Float => "float",
            Scalar::Str => "str",
            Scalar::Path => "path",
        }
    }

    /// Convert a single textual token into a primitive value.
    ///
    /// `Str` and `Path` never fail; `Int`/`Float` use the stdlib `FromStr`
    /// impls; `Bool` accepts `true`/`false`.
    pub fn parse_token(self, token: &str) -> Result<Value, TokenError> {
        let fail = || TokenError {
            token: token.to_string(),
            expected: self.name(),
        };
        match self {
            Scalar::Bool => token.parse::<bool>().map(Value::Bool).map_err(|_| fail()),
            Scalar::Int => token.parse::<i64>().map(Value::Int).map_err(|_| fail()),
            Scalar::Float => token.parse::<f64>().map(Value::Float).map_err(|_| fail()),
            Scalar::Str => Ok(Value::Str(token.to_string())),
            Scalar::Path => Ok(Value::Path(PathBuf::from(token))),
        }
    }
}

/// A dynamically typed argument value.
///
/// `None` is the absent sentinel: it is what an omitted flag without a
/// declared default binds to, and post-parse conversions pass it through
/// untouched.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Path(PathBuf),
    List(Vec<Value>),
    /// Insertion-ordered with duplicates collapsed; equality ignores order.
    Set(Vec<Value>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn path(p: impl Into<PathBuf>) -> Self {
        Value::Path(p.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Build a set value, collapsing duplicates while keeping first-seen order.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Shared absent sentinel for accessors that hand out references.
    pub(crate) fn absent() -> &'static Value {
        static ABSENT: Value = Value::None;
        &ABSENT
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Elements of a list or set value.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// The primitive kind of a scalar value, if it is one.
    pub fn scalar_kind(&self) -> Option<Scalar> {
        match self {
            Value::Bool(_) => Some(Scalar::Bool),
            Value::Int(_) => Some(Scalar::Int),
            Value::Float(_) => Some(Scalar::Float),
            Value::Str(_) => Some(Scalar::Str),
            Value::Path(_) => Some(Scalar::Path),
            Value::None | Value::List(_) | Value::Set(_) => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::List(items) | Value::Set(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}
