//! The type-to-argument dispatch engine.
//!
//! ```text
//! TypeExpr → dispatch → ArgSpec (+ rename registrations + conversion steps)
//! ```
//!
//! Dispatch is recursive: containers, optionals, literals and unions dispatch
//! their inner types through the same entry point, then wrap or overlay the
//! result.

mod dispatcher;
mod spec;

pub use dispatcher::Dispatcher;
pub use spec::{ArgSpec, Arity, FlagAction, TokenParser};
