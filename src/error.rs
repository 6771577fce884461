//! Error taxonomy for signature binding.
//!
//! Configuration errors and invocation conflicts are raised eagerly as
//! `BindError` values; user-input errors (unknown flag, missing required flag,
//! token conversion failure) surface through the flag capability as
//! `BindError::Usage` and terminate the process in the non-`try` entry points.

use thiserror::Error;

use crate::value::Value;

/// Errors raised while configuring, parsing for, or invoking a callable.
#[derive(Debug, Error)]
pub enum BindError {
    /// A bool-typed parameter was declared with a non-bool default.
    #[error("argument {name}: default value '{value}' is not a bool")]
    BadBoolDefault { name: String, value: Value },

    /// Literal members did not share exactly one primitive kind.
    #[error("argument {name}: literal members must share one primitive type, got {detail}")]
    MixedLiteral { name: String, detail: String },

    /// A union shape the dispatcher does not support.
    #[error("argument {name}: unsupported union: {detail}")]
    UnsupportedUnion { name: String, detail: String },

    /// More positional call-time values than declared positional parameters.
    #[error("received {given} positional call-time arguments, signature only accepts {accepted}")]
    TooManyPositional { given: usize, accepted: usize },

    /// The same parameter was overridden positionally and by keyword.
    #[error("received override for argument {name} by positional and keyword argument")]
    DuplicateOverride { name: String },

    /// A call-time keyword override named no declared parameter.
    #[error("no declared parameter named {name} matches the call-time override")]
    UnknownParameter { name: String },

    /// A keyword-only parameter received a call-time keyword value without
    /// being ignored.
    #[error(
        "received a call-time value for keyword-only argument {name}; \
         keyword-only arguments are CLI-sourced unless listed in ignore_keys"
    )]
    KeywordOnlyOverride { name: String },

    /// An ignored parameter had no call-time value to bind.
    #[error("missing a call-time value for ignored argument {name}")]
    MissingIgnored { name: String },

    /// A parameter value arrived both from the command line and the call site.
    #[error(
        "received multiple inputs for argument {name}: '{call_site}' via the call site \
         and '{cli}' via the command line; consider adding '{name}' to ignore_keys"
    )]
    DuplicateSource {
        name: String,
        call_site: Value,
        cli: Value,
    },

    /// Two record schemas declared the same field name.
    #[error("record field {field} is declared by both {first} and {second}")]
    DuplicateRecordField {
        field: String,
        first: String,
        second: String,
    },

    /// A post-parse conversion rejected the parsed value.
    #[error("post-parse conversion for {name} failed: {message}")]
    Conversion { name: String, message: String },

    /// The flag capability rejected the process input. Carries clap's usage
    /// rendering; the non-`try` entry points exit the process with it.
    #[error(transparent)]
    Usage(#[from] clap::Error),
}
