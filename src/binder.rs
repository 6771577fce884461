//! Invocation binder — ties dispatch, parsing and call-time arguments
//! together and invokes the target callable.
//!
//! ```text
//! Signature → Dispatch → Register → Parse → Unmap → Convert → Bind → call
//! ```
//!
//! Each parameter's value comes from exactly one source: the command line or
//! the call site. Ignored parameters are exclusively call-site sourced;
//! everything else is CLI-sourced with call-site values acting as defaults,
//! and supplying both is a conflict.

use std::collections::{BTreeMap, BTreeSet};

use crate::assembler::FlagAssembler;
use crate::convert::ConversionPipeline;
use crate::dispatch::Dispatcher;
use crate::error::BindError;
use crate::options::{BindOptions, CustomConverter};
use crate::registry::NameRegistry;
use crate::schema::{ParamKind, Signature};
use crate::value::Value;

/// Arguments supplied directly at the call site.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pos(mut self, value: Value) -> Self {
        self.positional.push(value);
        self
    }

    pub fn kw(mut self, name: impl Into<String>, value: Value) -> Self {
        self.keyword.insert(name.into(), value);
        self
    }
}

/// The final values the callable is invoked with, keyed by parameter name.
#[derive(Debug, Clone, Default)]
pub struct Bound {
    values: BTreeMap<String, Value>,
}

impl Bound {
    pub fn get(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(Value::absent())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).as_bool()
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).as_i64()
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).as_str()
    }

    pub fn get_slice(&self, name: &str) -> Option<&[Value]> {
        self.get(name).as_slice()
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

/// Binds a declared signature to process input and invokes a callable.
///
/// All state is created fresh per invocation and discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    signature: Signature,
    options: BindOptions,
}

impl Binder {
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            options: BindOptions::default(),
        }
    }

    pub fn options(mut self, options: BindOptions) -> Self {
        self.options = options;
        self
    }

    /// Exclude parameters from parsing; they must be supplied at the call
    /// site instead.
    pub fn ignore_keys<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.options.ignore_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Exempt parameters from plural-to-singular flag renaming.
    pub fn ignore_rename<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.options
            .ignore_rename
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Extra flag spellings for one parameter.
    pub fn alias<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        spellings: impl IntoIterator<Item = S>,
    ) -> Self {
        self.options
            .aliases
            .entry(name.into())
            .or_default()
            .extend(spellings.into_iter().map(Into::into));
        self
    }

    /// Glob-expand the string/path values of these parameters.
    pub fn use_glob<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.options.use_glob.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Register a custom value converter for one parameter.
    pub fn use_custom(mut self, name: impl Into<String>, converter: CustomConverter) -> Self {
        self.options.use_custom.insert(name.into(), converter);
        self
    }

    /// Ignore unrecognized flags instead of failing.
    pub fn partial_parse(mut self, on: bool) -> Self {
        self.options.partial_parse = on;
        self
    }

    /// When disabled, the callable runs on call-time arguments alone.
    pub fn enabled(mut self, on: bool) -> Self {
        self.options.enabled = on;
        self
    }

    /// Parse the real process arguments and invoke the callable.
    ///
    /// User-input errors terminate the process with clap's usage message and
    /// a non-zero status.
    pub fn call<R>(
        self,
        call_args: CallArgs,
        func: impl FnOnce(Bound) -> R,
    ) -> Result<R, BindError> {
        let argv: Vec<String> = std::env::args().skip(1).collect();
        self.call_from(argv, call_args, func)
    }

    /// Like [`Binder::call`] with an explicit argv slice (no binary name).
    pub fn call_from<R>(
        self,
        argv: impl IntoIterator<Item = impl Into<String>>,
        call_args: CallArgs,
        func: impl FnOnce(Bound) -> R,
    ) -> Result<R, BindError> {
        match self.try_call_from(argv, call_args, func) {
            Err(BindError::Usage(err)) => err.exit(),
            other => other,
        }
    }

    /// Like [`Binder::call_from`], but surfaces user-input errors as
    /// [`BindError::Usage`] instead of terminating the process.
    pub fn try_call_from<R>(
        self,
        argv: impl IntoIterator<Item = impl Into<String>>,
        call_args: CallArgs,
        func: impl FnOnce(Bound) -> R,
    ) -> Result<R, BindError> {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let overrides = self.merge_overrides(&call_args)?;

        if !self.options.enabled {
            return Ok(func(self.bind_direct(overrides)));
        }

        let mut registry = NameRegistry::new();
        let mut conversions = ConversionPipeline::new();
        let mut assembler = FlagAssembler::new(self.options.partial_parse);

        let params = self.signature.params();
        let positional: Vec<_> = params
            .iter()
            .filter(|p| p.kind == ParamKind::Positional)
            .collect();
        let num_non_default = positional
            .iter()
            .take_while(|p| p.default.is_none())
            .count();

        {
            let mut dispatcher =
                Dispatcher::new(&mut registry, &mut conversions, &self.options);

            for (i, param) in positional.iter().enumerate() {
                if self.options.ignore_keys.contains(&param.name) {
                    continue;
                }
                let default = overrides
                    .get(&param.name)
                    .cloned()
                    .or_else(|| param.default.clone())
                    .unwrap_or(Value::None);
                let required = i < num_non_default && default.is_none();
                let spec = dispatcher.dispatch(&param.name, &param.ty, &default, required)?;
                let aliases = self
                    .options
                    .aliases
                    .get(&param.name)
                    .cloned()
                    .unwrap_or_default();
                assembler.register(spec, aliases, None);
            }

            for param in params.iter().filter(|p| p.kind == ParamKind::KeywordOnly) {
                if self.options.ignore_keys.contains(&param.name) {
                    continue;
                }
                if call_args.keyword.contains_key(&param.name) {
                    return Err(BindError::KeywordOnlyOverride {
                        name: param.name.clone(),
                    });
                }
                let default = param.default.clone().unwrap_or(Value::None);
                let required = param.default.is_none();
                let spec = dispatcher.dispatch(&param.name, &param.ty, &default, required)?;
                let aliases = self
                    .options
                    .aliases
                    .get(&param.name)
                    .cloned()
                    .unwrap_or_default();
                assembler.register(spec, aliases, None);
            }
        }

        // Ignored parameters bind from call-time values, positionally in
        // declaration order, falling back to keyword values.
        let mut ignored_values: BTreeMap<String, Value> = BTreeMap::new();
        let ignored: Vec<&str> = params
            .iter()
            .filter(|p| self.options.ignore_keys.contains(&p.name))
            .map(|p| p.name.as_str())
            .collect();
        for (i, name) in ignored.iter().enumerate() {
            let value = call_args
                .positional
                .get(i)
                .or_else(|| call_args.keyword.get(*name));
            match value {
                Some(value) => {
                    ignored_values.insert(name.to_string(), value.clone());
                }
                None => {
                    return Err(BindError::MissingIgnored {
                        name: name.to_string(),
                    })
                }
            }
        }

        // Nothing to parse: the callable runs on call-time values alone.
        if assembler.is_empty() {
            let mut overrides = overrides;
            overrides.extend(ignored_values);
            return Ok(func(self.bind_direct(overrides)));
        }

        let parsed = assembler.parse(&argv)?;
        let from_cli: BTreeSet<String> = parsed
            .from_cli
            .iter()
            .map(|name| registry.resolve(name))
            .collect();
        let mut values = registry.unmap(parsed.values);
        conversions.apply(&mut values)?;

        // Exactly one source per parameter: a call-site override plus a
        // command-line value for the same name is ambiguous.
        for (name, call_value) in &overrides {
            if from_cli.contains(name) {
                return Err(BindError::DuplicateSource {
                    name: name.clone(),
                    call_site: call_value.clone(),
                    cli: values.get(name).cloned().unwrap_or(Value::None),
                });
            }
        }

        values.extend(ignored_values);
        Ok(func(Bound { values }))
    }

    /// Merge positional and keyword call-time values into one per-parameter
    /// override map, rejecting conflicting or unknown overrides.
    fn merge_overrides(&self, call_args: &CallArgs) -> Result<BTreeMap<String, Value>, BindError> {
        let params = self.signature.params();
        let positional: Vec<_> = params
            .iter()
            .filter(|p| p.kind == ParamKind::Positional)
            .collect();

        if call_args.positional.len() > positional.len() {
            return Err(BindError::TooManyPositional {
                given: call_args.positional.len(),
                accepted: positional.len(),
            });
        }

        let mut overrides: BTreeMap<String, Value> = positional
            .iter()
            .zip(call_args.positional.iter())
            .map(|(param, value)| (param.name.clone(), value.clone()))
            .collect();

        for (name, value) in &call_args.keyword {
            if overrides.contains_key(name) {
                return Err(BindError::DuplicateOverride { name: name.clone() });
            }
            if !params.iter().any(|p| p.name == *name) {
                return Err(BindError::UnknownParameter { name: name.clone() });
            }
            overrides.insert(name.clone(), value.clone());
        }
        Ok(overrides)
    }

    /// Bind without parsing: declared defaults overlaid with call-time
    /// values. Used when the binder is disabled or nothing was set up.
    fn bind_direct(&self, overrides: BTreeMap<String, Value>) -> Bound {
        let mut values: BTreeMap<String, Value> = self
            .signature
            .params()
            .iter()
            .filter_map(|p| p.default.clone().map(|d| (p.name.clone(), d)))
            .collect();
        values.extend(overrides);
        Bound { values }
    }
}
