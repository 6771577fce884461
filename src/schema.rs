//! The closed type universe and declared signatures.
//!
//! Rust has no runtime reflection over function parameters, so the shapes the
//! dispatcher understands are a closed tagged variant (`TypeExpr`) declared
//! alongside the callable, and exhaustively matched during dispatch.

use crate::value::{Scalar, Value};

/// A (possibly nested) type expression for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Scalar(Scalar),
    List(Box<TypeExpr>),
    Set(Box<TypeExpr>),
    Optional(Box<TypeExpr>),
    /// Closed set of allowed literal values. All members must share one
    /// primitive kind.
    Literal(Vec<Value>),
    /// Union of two or more concrete member types, tried in declaration order.
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn boolean() -> Self {
        TypeExpr::Scalar(Scalar::Bool)
    }

    pub fn int() -> Self {
        TypeExpr::Scalar(Scalar::Int)
    }

    pub fn float() -> Self {
        TypeExpr::Scalar(Scalar::Float)
    }

    pub fn string() -> Self {
        TypeExpr::Scalar(Scalar::Str)
    }

    pub fn path() -> Self {
        TypeExpr::Scalar(Scalar::Path)
    }

    pub fn list(element: TypeExpr) -> Self {
        TypeExpr::List(Box::new(element))
    }

    pub fn set(element: TypeExpr) -> Self {
        TypeExpr::Set(Box::new(element))
    }

    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::Optional(Box::new(inner))
    }

    pub fn literal(values: impl IntoIterator<Item = Value>) -> Self {
        TypeExpr::Literal(values.into_iter().collect())
    }

    /// Shorthand for the common string-literal enum.
    pub fn literal_strs<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        TypeExpr::Literal(values.into_iter().map(Value::str).collect())
    }

    pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        TypeExpr::Union(members.into_iter().collect())
    }
}

/// How a parameter can be supplied at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Fillable positionally or by keyword at the call site.
    Positional,
    /// Exclusively CLI-sourced unless listed in `ignore_keys`.
    KeywordOnly,
}

/// One declared parameter of the target callable.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
    pub default: Option<Value>,
    pub kind: ParamKind,
}

/// The declared parameter list of the target callable, in order.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a positional parameter without a default.
    pub fn arg(mut self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            default: None,
            kind: ParamKind::Positional,
        });
        self
    }

    /// Declare a positional parameter with a default value.
    pub fn arg_default(mut self, name: impl Into<String>, ty: TypeExpr, default: Value) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            default: Some(default),
            kind: ParamKind::Positional,
        });
        self
    }

    /// Declare a keyword-only parameter without a default.
    pub fn kwarg(mut self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            default: None,
            kind: ParamKind::KeywordOnly,
        });
        self
    }

    /// Declare a keyword-only parameter with a default value.
    pub fn kwarg_default(mut self, name: impl Into<String>, ty: TypeExpr, default: Value) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            default: Some(default),
            kind: ParamKind::KeywordOnly,
        });
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// One field of a plain-record type bound in record mode.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: TypeExpr,
    pub default: Option<Value>,
    pub help: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            help: None,
        }
    }

    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }
}

/// A named plain-record type whose fields are flattened into the flag
/// namespace and reconstructed after parsing.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub name: String,
    fields: Vec<Field>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}
