//! Binder configuration — the decorator-equivalent options surface.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::convert::ConverterFn;
use crate::schema::TypeExpr;
use crate::value::Value;

/// A caller-supplied value converter plus its declared input type.
///
/// The dispatcher dispatches on the input type and registers the converter as
/// a post-parse step, so the converter receives the already-parsed inner value
/// and its return value becomes the parameter's final bound value.
#[derive(Clone)]
pub struct CustomConverter {
    pub input: Option<TypeExpr>,
    pub func: ConverterFn,
}

impl CustomConverter {
    pub fn new(
        input: TypeExpr,
        func: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            input: Some(input),
            func: Arc::new(func),
        }
    }

    /// Converter without a declared input type. Dispatch warns and assumes
    /// the input is a plain string.
    pub fn assuming_str(
        func: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            input: None,
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for CustomConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomConverter")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

/// Configuration for a binder, threaded explicitly instead of living in
/// process-wide state.
#[derive(Debug, Clone)]
pub struct BindOptions {
    /// Parameter names excluded from parsing; sourced only from call-time
    /// arguments.
    pub ignore_keys: BTreeSet<String>,
    /// Parameter names exempted from plural-to-singular flag renaming.
    pub ignore_rename: BTreeSet<String>,
    /// Extra flag spellings per parameter name. Leading dashes are accepted
    /// and stripped; single characters become short flags.
    pub aliases: BTreeMap<String, Vec<String>>,
    /// Parameter names whose string/path values are glob-expanded.
    pub use_glob: BTreeSet<String>,
    /// Custom value converters per parameter name.
    pub use_custom: BTreeMap<String, CustomConverter>,
    /// Ignore unrecognized flags instead of failing.
    pub partial_parse: bool,
    /// When false, the whole dispatch/parse/bind apparatus is bypassed and
    /// the callable runs on call-time arguments alone.
    pub enabled: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            ignore_keys: BTreeSet::new(),
            ignore_rename: BTreeSet::new(),
            aliases: BTreeMap::new(),
            use_glob: BTreeSet::new(),
            use_custom: BTreeMap::new(),
            partial_parse: false,
            enabled: true,
        }
    }
}
