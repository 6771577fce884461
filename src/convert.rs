//! Post-parse conversion pipeline.
//!
//! Conversions run on successfully parsed values, in registration order, keyed
//! by the original parameter name. An absent value (`Value::None`) passes
//! through untouched so optional parameters keep their none semantics.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::BindError;
use crate::value::{Scalar, TokenError, Value};

/// A caller-supplied value transform.
pub type ConverterFn = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// One post-parse transform.
#[derive(Clone)]
pub enum Conversion {
    /// Wrap a parsed list into a set value, collapsing duplicates.
    CollectSet,
    /// Splice nested lists into one flat list; non-list elements are kept.
    Flatten,
    /// Apply a caller-supplied converter.
    Custom(ConverterFn),
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversion::CollectSet => write!(f, "CollectSet"),
            Conversion::Flatten => write!(f, "Flatten"),
            Conversion::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl Conversion {
    fn apply(&self, name: &str, value: Value) -> Result<Value, BindError> {
        match self {
            Conversion::CollectSet => match value {
                Value::List(items) => Ok(Value::set(items)),
                Value::Set(_) => Ok(value),
                other => Err(BindError::Conversion {
                    name: name.to_string(),
                    message: format!("cannot collect non-list value '{other}' into a set"),
                }),
            },
            Conversion::Flatten => match value {
                Value::List(items) => {
                    let mut flat = Vec::new();
                    for item in items {
                        match item {
                            Value::List(inner) => flat.extend(inner),
                            other => flat.push(other),
                        }
                    }
                    Ok(Value::List(flat))
                }
                other => Ok(other),
            },
            Conversion::Custom(func) => func(value).map_err(|message| BindError::Conversion {
                name: name.to_string(),
                message,
            }),
        }
    }
}

/// Ordered conversions per original parameter name.
#[derive(Debug, Clone, Default)]
pub struct ConversionPipeline {
    steps: BTreeMap<String, Vec<Conversion>>,
}

impl ConversionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a conversion to `key`'s chain.
    pub fn register(&mut self, key: &str, conversion: Conversion) {
        tracing::debug!("registering post-parse conversion for {key}: {conversion:?}");
        self.steps
            .entry(key.to_string())
            .or_default()
            .push(conversion);
    }

    /// Run every registered chain over `values`, left to right.
    ///
    /// Keys bound to `Value::None` are skipped entirely.
    pub fn apply(&self, values: &mut BTreeMap<String, Value>) -> Result<(), BindError> {
        for (key, chain) in &self.steps {
            let Some(initial) = values.get(key) else {
                continue;
            };
            if initial.is_none() {
                continue;
            }
            let mut value = initial.clone();
            for conversion in chain {
                value = conversion.apply(key, value)?;
            }
            values.insert(key.clone(), value);
        }
        Ok(())
    }
}

/// Expand a token as a filesystem glob pattern, mapping each match through the
/// scalar converter. Yields a list value per token.
pub fn expand_glob(pattern: &str, scalar: Scalar) -> Result<Value, TokenError> {
    let paths = glob::glob(pattern).map_err(|_| TokenError {
        token: pattern.to_string(),
        expected: "glob pattern",
    })?;
    let mut matches = Vec::new();
    for entry in paths.flatten() {
        matches.push(scalar.parse_token(&entry.to_string_lossy())?);
    }
    Ok(Value::List(matches))
}
