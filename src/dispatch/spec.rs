//! Argument specifications — the output of dispatching one type.

use crate::convert::expand_glob;
use crate::value::{Scalar, TokenError, Value};

/// Whether a flag consumes a single token or one-or-more tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    Multi,
}

/// Store action for boolean flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagAction {
    /// Presence of the flag stores `true` (default `false`).
    StoreTrue,
    /// Presence of the flag stores `false` (default `true`).
    StoreFalse,
}

/// Converts one raw token into a typed value.
#[derive(Debug, Clone)]
pub enum TokenParser {
    /// Primitive conversion for one scalar kind.
    Scalar(Scalar),
    /// Expand the token as a filesystem glob pattern and map each match
    /// through the scalar converter, yielding a list per token.
    Glob(Scalar),
    /// Try each member parser in declaration order; first success wins.
    Union(Vec<TokenParser>),
}

impl TokenParser {
    pub fn parse(&self, token: &str) -> Result<Value, TokenError> {
        match self {
            TokenParser::Scalar(scalar) => scalar.parse_token(token),
            TokenParser::Glob(scalar) => expand_glob(token, *scalar),
            TokenParser::Union(members) => {
                for member in members {
                    if let Ok(value) = member.parse(token) {
                        return Ok(value);
                    }
                }
                Err(TokenError {
                    token: token.to_string(),
                    expected: "union member",
                })
            }
        }
    }
}

/// Concrete argument specification for one parameter.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    /// External flag name; may differ from the parameter name after renaming.
    pub name: String,
    pub parser: TokenParser,
    /// Value used when the flag is absent; `Value::None` when unset.
    pub default: Value,
    pub required: bool,
    pub arity: Arity,
    /// Closed set of allowed values, for literal-enum dispatch only.
    pub choices: Option<Vec<Value>>,
    /// Set for boolean flags only.
    pub action: Option<FlagAction>,
}
