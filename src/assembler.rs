//! Flag assembler — registers argument specs with clap and parses argv.
//!
//! clap is the "flag registration + parse" capability: it supplies long-form
//! flags, one-or-more arity, store-true/store-false actions, closed choice
//! sets with validation, and the usage-error failure mode. This module only
//! translates `ArgSpec`s into clap's builder API and pulls typed values back
//! out of the match result.

use std::collections::{BTreeMap, BTreeSet};

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};

use crate::dispatch::{ArgSpec, Arity, FlagAction};
use crate::error::BindError;
use crate::value::Value;

/// One registered flag: the dispatched spec plus presentation extras.
#[derive(Debug, Clone)]
struct RegisteredArg {
    spec: ArgSpec,
    aliases: Vec<String>,
    help: Option<String>,
}

/// Parse output: typed values per external flag name, plus which flags were
/// actually supplied on the command line (needed for duplicate-source checks).
#[derive(Debug, Clone)]
pub struct ParsedValues {
    pub values: BTreeMap<String, Value>,
    pub from_cli: BTreeSet<String>,
}

/// Collects argument specs and performs one parse over an argv slice.
#[derive(Debug, Clone, Default)]
pub struct FlagAssembler {
    args: Vec<RegisteredArg>,
    partial: bool,
}

impl FlagAssembler {
    pub fn new(partial: bool) -> Self {
        Self {
            args: Vec::new(),
            partial,
        }
    }

    pub fn register(&mut self, spec: ArgSpec, aliases: Vec<String>, help: Option<String>) {
        self.args.push(RegisteredArg {
            spec,
            aliases,
            help,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("argbind")
            .no_binary_name(true)
            .ignore_errors(self.partial);

        for reg in &self.args {
            let spec = &reg.spec;
            let mut arg = Arg::new(spec.name.clone()).long(spec.name.clone());

            for alias in &reg.aliases {
                let stripped = alias.trim_start_matches('-');
                let mut chars = stripped.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => arg = arg.short(c),
                    _ => arg = arg.alias(stripped.to_string()),
                }
            }
            if let Some(help) = &reg.help {
                arg = arg.help(help.clone());
            }

            arg = match spec.action {
                Some(FlagAction::StoreTrue) => arg.action(ArgAction::SetTrue),
                Some(FlagAction::StoreFalse) => arg.action(ArgAction::SetFalse),
                None => {
                    let parser = spec.parser.clone();
                    let choices = spec.choices.clone();
                    let value_parser =
                        clap::builder::ValueParser::new(move |token: &str| -> Result<Value, String> {
                            let value = parser.parse(token).map_err(|e| e.to_string())?;
                            if let Some(choices) = &choices {
                                if !choices.iter().any(|choice| *choice == value) {
                                    let rendered: Vec<String> =
                                        choices.iter().map(|c| format!("'{c}'")).collect();
                                    return Err(format!(
                                        "invalid choice '{token}' (choose from {})",
                                        rendered.join(", ")
                                    ));
                                }
                            }
                            Ok(value)
                        });
                    let arg = arg.value_parser(value_parser).action(ArgAction::Set);
                    match spec.arity {
                        Arity::Multi => arg.num_args(1..),
                        Arity::Single => arg.num_args(1),
                    }
                }
            };
            arg = arg.required(spec.required);

            cmd = cmd.arg(arg);
        }
        cmd
    }

    /// Parse the argv slice (flags only, no binary name).
    ///
    /// Flags absent from the input bind to their spec's default, or to
    /// `Value::None` when no default is resolvable.
    pub fn parse(&self, argv: &[String]) -> Result<ParsedValues, BindError> {
        let matches = self.command().try_get_matches_from(argv)?;

        let mut values = BTreeMap::new();
        let mut from_cli = BTreeSet::new();
        for reg in &self.args {
            let name = &reg.spec.name;
            if matches.value_source(name) == Some(ValueSource::CommandLine) {
                from_cli.insert(name.clone());
            }

            let value = if reg.spec.action.is_some() {
                Value::Bool(matches.get_flag(name))
            } else {
                match reg.spec.arity {
                    Arity::Multi => match matches.get_many::<Value>(name) {
                        Some(items) => Value::List(items.cloned().collect()),
                        None => reg.spec.default.clone(),
                    },
                    Arity::Single => match matches.get_one::<Value>(name) {
                        Some(value) => value.clone(),
                        None => reg.spec.default.clone(),
                    },
                }
            };
            values.insert(name.clone(), value);
        }

        Ok(ParsedValues { values, from_cli })
    }
}
