//! Record mode — bind a group of plain-record types instead of a signature.
//!
//! Every field of every bound record is flattened into one shared flag
//! namespace, parsed once, and each record is then reconstructed from its own
//! subset of fields. A field name declared by two records is a hard collision
//! error.

use std::collections::BTreeMap;

use crate::assembler::FlagAssembler;
use crate::convert::ConversionPipeline;
use crate::dispatch::Dispatcher;
use crate::error::BindError;
use crate::options::{BindOptions, CustomConverter};
use crate::registry::NameRegistry;
use crate::schema::RecordSchema;
use crate::value::Value;

/// One reconstructed record: its schema name plus field values.
#[derive(Debug, Clone)]
pub struct RecordValues {
    schema: String,
    values: BTreeMap<String, Value>,
}

impl RecordValues {
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn get(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(Value::absent())
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

/// Reconstructed records: positional in declaration order, then keyword.
#[derive(Debug, Clone)]
pub struct RecordArgs {
    pub positional: Vec<RecordValues>,
    pub keyword: BTreeMap<String, RecordValues>,
}

/// Binds one or more record schemas to process input. Record mode is
/// exclusively CLI-sourced; there are no call-time overrides.
#[derive(Debug, Clone, Default)]
pub struct RecordBinder {
    positional: Vec<RecordSchema>,
    keyword: BTreeMap<String, RecordSchema>,
    options: BindOptions,
}

impl RecordBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a record positionally.
    pub fn record(mut self, schema: RecordSchema) -> Self {
        self.positional.push(schema);
        self
    }

    /// Bind a record under a keyword name.
    pub fn keyword_record(mut self, name: impl Into<String>, schema: RecordSchema) -> Self {
        self.keyword.insert(name.into(), schema);
        self
    }

    pub fn options(mut self, options: BindOptions) -> Self {
        self.options = options;
        self
    }

    /// Exempt fields from plural-to-singular flag renaming.
    pub fn ignore_rename<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.options
            .ignore_rename
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Extra flag spellings for one field.
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

    /// Glob-expand the string/path values of these fields.
    pub fn use_glob<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.options.use_glob.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Register a custom value converter for one field.
    pub fn use_custom(mut self, name: impl Into<String>, converter: CustomConverter) -> Self {
        self.options.use_custom.insert(name.into(), converter);
        self
    }

    /// Ignore unrecognized flags instead of failing.
    pub fn partial_parse(mut self, on: bool) -> Self {
        self.options.partial_parse = on;
        self
    }

    /// When disabled, records are built from declared field defaults alone.
    pub fn enabled(mut self, on: bool) -> Self {
        self.options.enabled = on;
        self
    }

    /// Parse the real process arguments and invoke the callable.
    pub fn call<R>(self, func: impl FnOnce(RecordArgs) -> R) -> Result<R, BindError> {
        let argv: Vec<String> = std::env::args().skip(1).collect();
        self.call_from(argv, func)
    }

    /// Like [`RecordBinder::call`] with an explicit argv slice.
    pub fn call_from<R>(
        self,
        argv: impl IntoIterator<Item = impl Into<String>>,
        func: impl FnOnce(RecordArgs) -> R,
    ) -> Result<R, BindError> {
        match self.try_call_from(argv, func) {
            Err(BindError::Usage(err)) => err.exit(),
            other => other,
        }
    }

    /// Like [`RecordBinder::call_from`], but surfaces user-input errors as
    /// [`BindError::Usage`] instead of terminating the process.
    pub fn try_call_from<R>(
        self,
        argv: impl IntoIterator<Item = impl Into<String>>,
        func: impl FnOnce(RecordArgs) -> R,
    ) -> Result<R, BindError> {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();

        // Field names share one flag namespace across all bound records.
        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for schema in self.schemas() {
            for field in schema.fields() {
                if let Some(first) = owners.insert(field.name.as_str(), schema.name.as_str()) {
                    return Err(BindError::DuplicateRecordField {
                        field: field.name.clone(),
                        first: first.to_string(),
                        second: schema.name.clone(),
                    });
                }
            }
        }

        if !self.options.enabled {
            let values = self.bind_defaults();
            return Ok(func(self.project(values)));
        }

        let mut registry = NameRegistry::new();
        let mut conversions = ConversionPipeline::new();
        let mut assembler = FlagAssembler::new(self.options.partial_parse);

        {
            let mut dispatcher =
                Dispatcher::new(&mut registry, &mut conversions, &self.options);
            for schema in self.schemas() {
                for field in schema.fields() {
                    let default = field.default.clone().unwrap_or(Value::None);
                    let required = field.default.is_none();
                    let spec = dispatcher.dispatch(&field.name, &field.ty, &default, required)?;
                    let aliases = self
                        .options
                        .aliases
                        .get(&field.name)
                        .cloned()
                        .unwrap_or_default();
                    assembler.register(spec, aliases, field.help.clone());
                }
            }
        }

        let parsed = assembler.parse(&argv)?;
        let mut values = registry.unmap(parsed.values);
        conversions.apply(&mut values)?;

        Ok(func(self.project(values)))
    }

    fn schemas(&self) -> impl Iterator<Item = &RecordSchema> {
        self.positional.iter().chain(self.keyword.values())
    }

    fn bind_defaults(&self) -> BTreeMap<String, Value> {
        self.schemas()
            .flat_map(|schema| schema.fields())
            .map(|field| {
                (
                    field.name.clone(),
                    field.default.clone().unwrap_or(Value::None),
                )
            })
            .collect()
    }

    /// Reconstruct each record from its own subset of the shared namespace.
    fn project(&self, values: BTreeMap<String, Value>) -> RecordArgs {
        let project_one = |schema: &RecordSchema| RecordValues {
            schema: schema.name.clone(),
            values: schema
                .fields()
                .iter()
                .map(|field| {
                    (
                        field.name.clone(),
                        values.get(&field.name).cloned().unwrap_or(Value::None),
                    )
                })
                .collect(),
        };

        RecordArgs {
            positional: self.positional.iter().map(project_one).collect(),
            keyword: self
                .keyword
                .iter()
                .map(|(name, schema)| (name.clone(), project_one(schema)))
                .collect(),
        }
    }
}
