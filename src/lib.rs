//! Signature-driven command-line binding.
//!
//! `argbind` compiles a declared callable signature into a flag parser,
//! parses process input, converts the raw tokens back into typed values, and
//! invokes the callable:
//!
//! ```text
//! Signature → Dispatch → Register → Parse → Unmap → Convert → Bind
//! ```
//!
//! The core is the type-to-argument dispatch engine: a recursive mapping from
//! a (possibly nested) [`TypeExpr`] to a concrete argument specification,
//! handling containers, optionals, literal enums, unions, boolean flags,
//! custom converters, and the flag renames those imply.
//!
//! ```no_run
//! use argbind::{Binder, CallArgs, Signature, TypeExpr, Value};
//!
//! let signature = Signature::new().arg_default("value", TypeExpr::int(), Value::Int(0));
//! let result = Binder::new(signature)
//!     .call(CallArgs::new(), |bound| bound.get_i64("value").unwrap_or(0))?;
//! # Ok::<(), argbind::BindError>(())
//! ```

pub mod assembler;
pub mod binder;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod options;
pub mod record;
pub mod registry;
pub mod schema;
pub mod value;

pub use binder::{Binder, Bound, CallArgs};
pub use dispatch::{ArgSpec, Arity, Dispatcher, FlagAction, TokenParser};
pub use error::BindError;
pub use options::{BindOptions, CustomConverter};
pub use record::{RecordArgs, RecordBinder, RecordValues};
pub use registry::NameRegistry;
pub use schema::{Field, Param, ParamKind, RecordSchema, Signature, TypeExpr};
pub use value::{Scalar, TokenError, Value};
